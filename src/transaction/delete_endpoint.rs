//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, auth::UserID, database_id::TransactionId,
    transaction::core::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with 204 No Content.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_transaction(transaction_id, user_id, &connection) {
        Ok(rows_affected) if rows_affected != 0 => StatusCode::NO_CONTENT.into_response(),
        Ok(_) => Error::DeleteMissingTransaction.into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}

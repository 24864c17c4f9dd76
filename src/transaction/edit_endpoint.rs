//! Defines the endpoint for updating a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    database_id::TransactionId,
    transaction::core::{NewTransaction, update_transaction},
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for editing a transaction, responds with the updated transaction.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Json(new_transaction): Json<NewTransaction>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match update_transaction(transaction_id, user_id, &new_transaction, &connection) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => {
            tracing::warn!("Could not update transaction {transaction_id}: {error}");
            error.into_response()
        }
    }
}

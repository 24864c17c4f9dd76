//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    timezone::local_today,
    transaction::core::{NewTransaction, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction dated today in the local
/// timezone, responds with the created transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserID>,
    Json(new_transaction): Json<NewTransaction>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_transaction(user_id, &new_transaction, today, &connection) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => {
            tracing::warn!("Could not create transaction for user {user_id}: {error}");
            error.into_response()
        }
    }
}

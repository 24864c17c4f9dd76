//! Defines the endpoints for listing transactions and the months that have transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::UserID,
    transaction::core::{get_transaction_months, get_transactions, get_transactions_in_month},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Optionally restricts a transaction listing to a single month.
///
/// Either both fields or neither must be given.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The year, e.g. 2026.
    pub year: Option<i32>,
    /// The month number, 1 to 12.
    pub month: Option<u8>,
}

/// A route handler that responds with the user's transactions, newest first.
///
/// With `?year=&month=` only the transactions dated in that month are listed.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let transactions = match (query.year, query.month) {
        (Some(year), Some(month)) => get_transactions_in_month(user_id, year, month, &connection),
        (None, None) => get_transactions(user_id, &connection),
        _ => Err(Error::InvalidMonth),
    };

    match transactions {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler that responds with the months in which the user has
/// transactions, newest first.
pub async fn list_transaction_months_endpoint(
    State(state): State<ListTransactionsState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_transaction_months(user_id, &connection) {
        Ok(months) => Json(months).into_response(),
        Err(error) => error.into_response(),
    }
}

//! Defines the endpoint for the monthly summary.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::{UserID, get_user_by_id},
    payment_method::get_payment_methods,
    summary::aggregation::{SummaryReport, compute_summary},
    timezone::local_today,
    transaction::get_transactions,
};

/// Compute the summary for `user_id` of the month containing `reference_date`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist, or an [Error::SqlError]
/// if the user's transactions or payment methods could not be loaded.
pub fn get_summary(
    user_id: UserID,
    reference_date: Date,
    connection: &Connection,
) -> Result<SummaryReport, Error> {
    get_user_by_id(user_id, connection)?;

    let transactions = get_transactions(user_id, connection)?;
    let payment_methods = get_payment_methods(user_id, connection)?;

    Ok(compute_summary(
        &transactions,
        &payment_methods,
        reference_date,
    ))
}

/// The state needed to build a summary.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading transactions and payment methods.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the summary of the current month.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
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

    match get_summary(user_id, today, &connection) {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => {
            tracing::error!("Could not compute summary for user {user_id}: {error}");
            error.into_response()
        }
    }
}

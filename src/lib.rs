//! An expense tracker for recording personal income and expenses.
//!
//! Users register, log in, define payment methods (cash, credit or debit
//! cards) and record transactions against them. A summary of the current
//! month (income, fixed and variable expenses, balance and per payment method
//! balances) is derived from the recorded transactions.
//!
//! This library provides a JSON REST API backed by a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod amount;
mod app_state;
mod auth;
mod database_id;
mod db;
pub mod endpoints;
mod logging;
mod payment_method;
mod routing;
mod summary;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use amount::Amount;
pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, ValidatedPassword, count_users, create_user, get_user_by_id,
};
pub use database_id::{PaymentMethodId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use payment_method::{CardProcessor, MethodType, PaymentMethod};
pub use routing::build_router;
pub use summary::{SummaryReport, compute_summary, get_summary};
pub use timezone::get_local_offset;
pub use transaction::{
    Category, NewTransaction, RepeatInterval, Transaction, TransactionMonth, TransactionType,
    create_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid combination of username and password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The request did not carry a valid auth cookie.
    #[error("you must be logged in to access this resource")]
    NotLoggedIn,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// There was an error parsing the date in the cookie or creating the new
    /// expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format expiry cookie date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The password and its confirmation did not match during registration.
    #[error("passwords must match")]
    PasswordMismatch,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used as a username.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// The specified username is already taken.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// An empty string was used to name a payment method.
    #[error("payment method name cannot be empty")]
    EmptyPaymentMethodName,

    /// The user already has a payment method with the specified name.
    #[error("the payment method \"{0}\" already exists")]
    DuplicatePaymentMethodName(String),

    /// A card processor was given for a cash payment method.
    #[error("cash payment methods cannot have a card processor")]
    CashWithProcessor,

    /// The payment method ID used for a transaction does not refer to one of
    /// the user's payment methods.
    #[error("the payment method ID {0} does not refer to a valid payment method")]
    InvalidPaymentMethod(PaymentMethodId),

    /// The category cannot be used with the transaction type, e.g. an expense
    /// tagged as earned income.
    #[error("the category \"{0}\" cannot be used for {1} transactions")]
    InvalidCategory(Category, TransactionType),

    /// A negative, overly precise or too large amount was given.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The year and month do not form a valid calendar month.
    #[error("invalid month, expected both a year and a month between 1 and 12")]
    InvalidMonth,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a payment method that does not exist
    #[error("tried to update a payment method that is not in the database")]
    UpdateMissingPaymentMethod,

    /// Tried to delete a payment method that does not exist
    #[error("tried to delete a payment method that is not in the database")]
    DeleteMissingPaymentMethod,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::NotLoggedIn | Error::CookieMissing => {
                StatusCode::UNAUTHORIZED
            }
            Error::TooWeak(_)
            | Error::PasswordMismatch
            | Error::EmptyUsername
            | Error::DuplicateUsername(_)
            | Error::EmptyPaymentMethodName
            | Error::DuplicatePaymentMethodName(_)
            | Error::CashWithProcessor
            | Error::InvalidPaymentMethod(_)
            | Error::InvalidCategory(_, _)
            | Error::InvalidAmount(_)
            | Error::InvalidMonth => StatusCode::BAD_REQUEST,
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingPaymentMethod
            | Error::DeleteMissingPaymentMethod => StatusCode::NOT_FOUND,
            Error::InvalidDateFormat(_, _)
            | Error::HashingError(_)
            | Error::SqlError(_)
            | Error::InvalidTimezoneError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use serde_json::Value;

    use crate::Error;

    async fn response_json(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn client_errors_include_message() {
        let (status, body) =
            response_json(Error::DuplicatePaymentMethodName("Visa".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "the payment method \"Visa\" already exists");
    }

    #[tokio::test]
    async fn not_found_errors_map_to_404() {
        let (status, _) = response_json(Error::DeleteMissingTransaction).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) =
            response_json(Error::SqlError(rusqlite::Error::InvalidQuery)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().unwrap().contains("SQL"));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}

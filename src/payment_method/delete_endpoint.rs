//! Defines the endpoint for deleting a payment method.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, auth::UserID, database_id::PaymentMethodId,
    payment_method::core::delete_payment_method,
};

/// The state needed to delete a payment method.
#[derive(Debug, Clone)]
pub struct DeletePaymentMethodState {
    /// The database connection for managing payment methods.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeletePaymentMethodState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a payment method, responds with 204 No Content.
///
/// Transactions that used the payment method are kept and lose their payment method.
pub async fn delete_payment_method_endpoint(
    State(state): State<DeletePaymentMethodState>,
    Extension(user_id): Extension<UserID>,
    Path(payment_method_id): Path<PaymentMethodId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_payment_method(payment_method_id, user_id, &connection) {
        Ok(rows_affected) if rows_affected != 0 => StatusCode::NO_CONTENT.into_response(),
        Ok(_) => Error::DeleteMissingPaymentMethod.into_response(),
        Err(error) => {
            tracing::error!("Could not delete payment method {payment_method_id}: {error}");
            error.into_response()
        }
    }
}

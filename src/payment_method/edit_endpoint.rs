//! Defines the endpoint for updating a payment method.
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
    database_id::PaymentMethodId,
    payment_method::core::{NewPaymentMethod, update_payment_method},
};

/// The state needed to edit a payment method.
#[derive(Debug, Clone)]
pub struct EditPaymentMethodState {
    /// The database connection for managing payment methods.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPaymentMethodState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing a payment method's details, responds with the
/// updated payment method.
pub async fn edit_payment_method_endpoint(
    State(state): State<EditPaymentMethodState>,
    Extension(user_id): Extension<UserID>,
    Path(payment_method_id): Path<PaymentMethodId>,
    Json(new_method): Json<NewPaymentMethod>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match update_payment_method(payment_method_id, user_id, &new_method, &connection) {
        Ok(method) => Json(method).into_response(),
        Err(error) => {
            tracing::warn!("Could not update payment method {payment_method_id}: {error}");
            error.into_response()
        }
    }
}

//! Defines the endpoint for creating a new payment method.
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
    payment_method::core::{NewPaymentMethod, create_payment_method},
};

/// The state needed to create a payment method.
#[derive(Debug, Clone)]
pub struct CreatePaymentMethodState {
    /// The database connection for managing payment methods.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePaymentMethodState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new payment method, responds with the
/// created payment method.
pub async fn create_payment_method_endpoint(
    State(state): State<CreatePaymentMethodState>,
    Extension(user_id): Extension<UserID>,
    Json(new_method): Json<NewPaymentMethod>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_payment_method(user_id, &new_method, &connection) {
        Ok(method) => (StatusCode::CREATED, Json(method)).into_response(),
        Err(error) => {
            tracing::warn!("Could not create payment method for user {user_id}: {error}");
            error.into_response()
        }
    }
}

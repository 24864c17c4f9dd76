//! Defines the endpoint for listing the logged in user's payment methods.
use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, auth::UserID, payment_method::core::get_payment_methods};

/// The state needed to list payment methods.
#[derive(Debug, Clone)]
pub struct ListPaymentMethodsState {
    /// The database connection for managing payment methods.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListPaymentMethodsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with a JSON array of the user's payment methods.
pub async fn list_payment_methods_endpoint(
    State(state): State<ListPaymentMethodsState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_payment_methods(user_id, &connection) {
        Ok(methods) => Json(methods).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};

    use crate::{
        payment_method::{
            PaymentMethod,
            list_endpoint::{ListPaymentMethodsState, list_payment_methods_endpoint},
        },
        test_utils::{get_test_connection, must_create_test_user, parse_json_body},
    };

    #[tokio::test]
    async fn lists_default_cash_method() {
        let connection = get_test_connection();
        let user = must_create_test_user("alice", &connection);
        let state = ListPaymentMethodsState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = list_payment_methods_endpoint(State(state), Extension(user.id)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let methods: Vec<PaymentMethod> = parse_json_body(response).await;
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "Cash");
    }
}

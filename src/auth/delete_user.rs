//! Defines the endpoint for deleting the logged in user.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserID, cookie::invalidate_auth_cookie, delete_user},
};

/// The state needed for deleting a user.
#[derive(Debug, Clone)]
pub struct DeleteUserState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// Whether auth cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteUserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            secure_cookies: state.secure_cookies,
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<DeleteUserState> for Key {
    fn from_ref(state: &DeleteUserState) -> Self {
        state.cookie_key.clone()
    }
}

/// A route handler for deleting the logged in user along with their payment
/// methods and transactions. The auth cookie is invalidated on success.
pub async fn delete_user_endpoint(
    State(state): State<DeleteUserState>,
    Extension(user_id): Extension<UserID>,
    jar: PrivateCookieJar,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_user(user_id, &connection) {
        Ok(0) => Error::NotFound.into_response(),
        Ok(_) => {
            tracing::debug!("deleted user {user_id}");
            let jar = invalidate_auth_cookie(jar, state.secure_cookies);
            (StatusCode::NO_CONTENT, jar).into_response()
        }
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod delete_user_endpoint_tests {
    use axum::{Extension, Router, http::StatusCode, routing::delete};
    use axum_test::TestServer;

    use crate::{
        Error,
        auth::{UserID, delete_user::delete_user_endpoint, get_user_by_id},
        endpoints,
        test_utils::{get_test_state, must_create_user, server_with_state},
    };

    #[tokio::test]
    async fn delete_user_succeeds() {
        let state = get_test_state();
        let user = must_create_user(&state, "alice");
        let app = Router::new()
            .route(endpoints::USERS, delete(delete_user_endpoint))
            .layer(Extension(user.id));
        let server: TestServer = server_with_state(app, state.clone());

        let response = server.delete(endpoints::USERS).await;

        response.assert_status(StatusCode::NO_CONTENT);
        assert_eq!(
            get_user_by_id(user.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_missing_user_returns_not_found() {
        let state = get_test_state();
        let app = Router::new()
            .route(endpoints::USERS, delete(delete_user_endpoint))
            .layer(Extension(UserID::new(999)));
        let server = server_with_state(app, state);

        let response = server.delete(endpoints::USERS).await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}

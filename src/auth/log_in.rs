//! This file defines the route for handling log-in requests.
//! The auth module handles the lower level authentication and cookie auth logic.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        UserProfile,
        cookie::{REMEMBER_ME_COOKIE_DURATION, set_auth_cookie},
        get_user_by_username,
    },
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// Whether auth cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            secure_cookies: state.secure_cookies,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials sent by a client to log in.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// The username to log in as.
    pub username: String,
    /// The plain text password entered by the user.
    pub password: String,
    /// Whether to keep the user logged in for a week.
    #[serde(default)]
    pub remember_me: bool,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request the auth cookie is set and the user's
/// profile is returned.
///
/// # Errors
///
/// Returns an [Error::InvalidCredentials] (401) if the username is unknown or
/// the password is incorrect. Both cases produce the same response.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Json(user_data): Json<LogInData>,
) -> Response {
    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match get_user_by_username(&user_data.username, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                tracing::warn!("log-in attempt for unknown user {}", user_data.username);
                return Error::InvalidCredentials.into_response();
            }
            Err(error) => return error.into_response(),
        }
    };

    match user.password_hash.verify(&user_data.password) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("incorrect password for user {}", user.id);
            return Error::InvalidCredentials.into_response();
        }
        Err(error) => return Error::HashingError(error.to_string()).into_response(),
    }

    let cookie_duration = if user_data.remember_me {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    match set_auth_cookie(jar, user.id, cookie_duration, state.secure_cookies) {
        Ok(jar) => (jar, Json(UserProfile::from(&user))).into_response(),
        Err(error) => error.into_response(),
    }
}

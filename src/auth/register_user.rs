//! The registration endpoint for creating new users.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    auth::{UserProfile, cookie::set_auth_cookie, create_user},
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// Whether auth cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,
    /// The database connection users are inserted into.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            secure_cookies: state.secure_cookies,
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The details a client sends to register a new user.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    /// The name the user will log in with.
    pub username: String,
    /// An optional contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// The plain text password.
    pub password: String,
    /// The password typed a second time.
    pub confirmation: String,
}

/// Create a new user, log them in and respond with their profile.
///
/// The user's default "Cash" payment method is created along with the user.
///
/// # Errors
///
/// Responds with a 400 if the username is empty or taken, the passwords do
/// not match or the password is too weak.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Json(user_data): Json<RegisterForm>,
) -> Response {
    if user_data.password != user_data.confirmation {
        return Error::PasswordMismatch.into_response();
    }

    let validated_password =
        match ValidatedPassword::new(&user_data.password, &[user_data.username.trim()]) {
            Ok(password) => password,
            Err(error) => {
                tracing::warn!("rejected registration for {}: {error}", user_data.username);
                return error.into_response();
            }
        };

    let password_hash = match PasswordHash::new(validated_password, state.password_hash_cost) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return error.into_response();
        }
    };

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match create_user(
            &user_data.username,
            user_data.email.as_deref(),
            password_hash,
            &connection,
        ) {
            Ok(user) => user,
            Err(error) => return error.into_response(),
        }
    };

    tracing::debug!("registered user {} with ID {}", user.username, user.id);

    match set_auth_cookie(jar, user.id, state.cookie_duration, state.secure_cookies) {
        Ok(jar) => (StatusCode::CREATED, jar, Json(UserProfile::from(&user))).into_response(),
        Err(error) => {
            tracing::error!("An error occurred while setting the auth cookie: {error}");
            error.into_response()
        }
    }
}

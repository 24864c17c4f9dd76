//! Log-out route handler that invalidates authentication cookies.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{AppState, auth::cookie::invalidate_auth_cookie};

/// The state needed to log out.
#[derive(Debug, Clone)]
pub struct LogOutState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// Whether auth cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
}

impl FromRef<AppState> for LogOutState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            secure_cookies: state.secure_cookies,
        }
    }
}

impl FromRef<LogOutState> for Key {
    fn from_ref(state: &LogOutState) -> Self {
        state.cookie_key.clone()
    }
}

/// Invalidate the auth cookie.
///
/// This is safe to call without being logged in.
pub async fn get_log_out(State(state): State<LogOutState>, jar: PrivateCookieJar) -> Response {
    let jar = invalidate_auth_cookie(jar, state.secure_cookies);

    (StatusCode::NO_CONTENT, jar).into_response()
}

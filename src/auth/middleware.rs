//! Authentication middleware that validates cookies and extends sessions.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use time::Duration;

use crate::{
    AppState, Error,
    auth::cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// Whether auth cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            secure_cookies: state.secure_cookies,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid authorization cookie.
///
/// The user ID is placed into the request and the request executed normally
/// if the cookie is valid, otherwise a 401 JSON error is returned. After the
/// request has been handled the session is extended by the cookie duration.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
///
/// **Note**: The app state must contain an `axum_extra::extract::cookie::Key` for decrypting and verifying the cookie contents.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}.");
            return Error::NotLoggedIn.into_response();
        }
    };
    let user_id = match get_token_from_cookies(&jar) {
        Ok(token) => token.user_id,
        Err(error) => {
            tracing::warn!("Rejected request to {}: {error}", parts.uri);
            return Error::NotLoggedIn.into_response();
        }
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();

    // The handler may have replaced the auth cookie, e.g. when deleting the user.
    if parts.headers.contains_key(SET_COOKIE) {
        return Response::from_parts(parts, body);
    }

    let jar = match extend_auth_cookie_duration_if_needed(
        jar.clone(),
        state.cookie_duration,
        state.secure_cookies,
    ) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending cookie duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

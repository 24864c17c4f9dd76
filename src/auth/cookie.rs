//! Defines functions for handling user authentication with cookies.
//!
//! A logged in user carries a single private (encrypted) cookie holding a
//! JSON [Token] with their user ID and the time the session expires.
//! Cookies are marked `Secure` unless the server is configured otherwise,
//! e.g. for plain HTTP on a private network.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::UserID};

pub(crate) const COOKIE_TOKEN: &str = "token";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);
/// How long a session lasts when the user asks to be remembered.
pub(crate) const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// A token for authorization and authentication.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub(crate) struct Token {
    pub user_id: UserID,
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

fn build_token_cookie(value: String, expiry: OffsetDateTime, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_TOKEN, value))
        .expires(expiry)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .build()
}

/// Add an auth cookie to the cookie jar, indicating that a user is logged in and authenticated.
///
/// Sets the initial expiry of the cookie to `duration` from the current time.
/// You can use [DEFAULT_COOKIE_DURATION] for the default duration.
/// The cookie is only sent over HTTPS if `secure` is true.
///
/// # Errors
///
/// Returns an [Error::InvalidDateFormat] if the expiry would overflow or the
/// token could not be serialized.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    secure: bool,
) -> Result<PrivateCookieJar, Error> {
    let now = OffsetDateTime::now_utc();
    let expires_at = now.checked_add(duration).ok_or_else(|| {
        Error::InvalidDateFormat("expiry overflowed".to_owned(), format!("{now} + {duration}"))
    })?;

    set_token(jar, Token { user_id, expires_at }, secure)
}

fn set_token(
    jar: PrivateCookieJar,
    token: Token,
    secure: bool,
) -> Result<PrivateCookieJar, Error> {
    let token_string = serde_json::to_string(&token).map_err(|error| {
        Error::InvalidDateFormat(error.to_string(), token.expires_at.to_string())
    })?;

    Ok(jar.add(build_token_cookie(token_string, token.expires_at, secure)))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar, secure: bool) -> PrivateCookieJar {
    let mut cookie =
        build_token_cookie("deleted".to_owned(), OffsetDateTime::UNIX_EPOCH, secure);
    cookie.set_max_age(Duration::ZERO);

    jar.add(cookie)
}

/// Get the auth token from the cookie jar.
///
/// # Errors
///
/// Returns an:
/// - [Error::CookieMissing] if there is no auth cookie in `jar`,
/// - [Error::NotLoggedIn] if the cookie holds an invalid or expired token.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;

    let token: Token = serde_json::from_str(cookie.value_trimmed()).map_err(|error| {
        tracing::debug!("could not parse auth token: {error}");
        Error::NotLoggedIn
    })?;

    if token.expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::NotLoggedIn);
    }

    Ok(token)
}

/// Set the expiry of the auth cookie in `jar` to the latest of UTC now
/// plus `duration` and the cookie's expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns:
/// - [Error::CookieMissing] or [Error::NotLoggedIn] if there is no valid token in the cookie jar.
/// - [Error::InvalidDateFormat] if extending the cookie by `duration` would overflow the date time.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    secure: bool,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;

    let now = OffsetDateTime::now_utc();
    let new_expiry = now.checked_add(duration).ok_or_else(|| {
        Error::InvalidDateFormat("expiry overflowed".to_owned(), format!("{now} + {duration}"))
    })?;

    set_token(
        jar,
        Token {
            user_id: token.user_id,
            expires_at: max(token.expires_at, new_expiry),
        },
        secure,
    )
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, UtcOffset, macros::datetime};

    use crate::{
        Error,
        auth::{
            UserID,
            cookie::{
                COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, Token,
                extend_auth_cookie_duration_if_needed, get_token_from_cookies,
                invalidate_auth_cookie, set_auth_cookie, set_token,
            },
        },
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    /// Test helper macro to assert that two date times are within one second
    /// of each other. Used instead of a function so that the file and line
    /// number of the caller is included in the error message instead of the
    /// helper.
    macro_rules! assert_date_time_close {
        ($left:expr, $right:expr) => {
            assert!(
                ($left - $right).abs() < Duration::seconds(1),
                "got date time {:?}, want {:?}",
                $left,
                $right
            );
        };
    }

    #[test]
    fn token_serializes_expiry_as_timestamp() {
        let token = Token {
            user_id: UserID::new(1),
            expires_at: datetime!(2025-12-21 00:00:00).assume_offset(UtcOffset::UTC),
        };

        let json = serde_json::to_string(&token).unwrap();

        assert_eq!(json, r#"{"user_id":1,"expires_at":1766275200}"#);
        assert_eq!(serde_json::from_str::<Token>(&json).unwrap(), token);
    }

    #[test]
    fn can_set_cookie() {
        let user_id = UserID::new(1);

        let jar = set_auth_cookie(get_jar(), user_id, DEFAULT_COOKIE_DURATION, true).unwrap();
        let token = get_token_from_cookies(&jar).unwrap();
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(token.user_id, user_id);
        assert_date_time_close!(
            token.expires_at,
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION
        );
        assert_date_time_close!(cookie.expires_datetime().unwrap(), token.expires_at);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn secure_attribute_follows_setting() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), DEFAULT_COOKIE_DURATION, false)
            .unwrap();
        assert_eq!(jar.get(COOKIE_TOKEN).unwrap().secure(), Some(false));

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(10), false).unwrap();
        assert_eq!(jar.get(COOKIE_TOKEN).unwrap().secure(), Some(false));

        let jar = invalidate_auth_cookie(jar, false);
        assert_eq!(jar.get(COOKIE_TOKEN).unwrap().secure(), Some(false));
    }

    #[test]
    fn get_token_fails_on_empty_jar() {
        assert_eq!(get_token_from_cookies(&get_jar()), Err(Error::CookieMissing));
    }

    #[test]
    fn get_token_fails_on_expired_token() {
        let token = Token {
            user_id: UserID::new(1),
            expires_at: OffsetDateTime::now_utc() - Duration::seconds(1),
        };
        let jar = set_token(get_jar(), token, true).unwrap();

        assert_eq!(get_token_from_cookies(&jar), Err(Error::NotLoggedIn));
    }

    #[test]
    fn can_extend_cookie_duration() {
        let jar =
            set_auth_cookie(get_jar(), UserID::new(1), DEFAULT_COOKIE_DURATION, true).unwrap();

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(10), true).unwrap();
        let token = get_token_from_cookies(&jar).unwrap();

        assert_date_time_close!(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(10)
        );
    }

    #[test]
    fn cookie_duration_does_not_shrink() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::days(7), true).unwrap();
        let want = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::seconds(5), true).unwrap();

        assert_eq!(get_token_from_cookies(&jar).unwrap().expires_at, want);
    }

    #[test]
    fn invalidate_auth_cookie_succeeds() {
        let jar =
            set_auth_cookie(get_jar(), UserID::new(1), DEFAULT_COOKIE_DURATION, true).unwrap();

        let jar = invalidate_auth_cookie(jar, true);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(get_token_from_cookies(&jar), Err(Error::NotLoggedIn));
    }
}

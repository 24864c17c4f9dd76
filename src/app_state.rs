//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error, PasswordHash, auth::DEFAULT_COOKIE_DURATION, db::initialize,
    timezone::get_local_offset,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// Whether auth cookies carry the `Secure` attribute.
    /// Browsers will not send secure cookies over plain HTTP.
    pub secure_cookies: bool,

    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or `local_timezone` is not a
    /// known timezone.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            secure_cookies: true,
            password_hash_cost: PasswordHash::DEFAULT_COST,
            local_timezone: local_timezone.to_owned(),
            db_connection: connection,
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

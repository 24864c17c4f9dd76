//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, Row, TransactionBehavior, Transaction as SqlTransaction};
use serde::{Deserialize, Serialize};

use crate::{
    Error, PasswordHash,
    payment_method::{NewPaymentMethod, create_payment_method},
};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name the user logs in with, unique across all users.
    pub username: String,
    /// An optional contact email.
    pub email: Option<String>,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// The public details of a user that are safe to send to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's ID.
    pub id: UserID,
    /// The user's username.
    pub username: String,
    /// The user's email, if they gave one.
    pub email: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database along with their default
/// "Cash" payment method.
///
/// The user and the payment method are created in a single transaction, so
/// either both exist afterwards or neither does. Leading and trailing
/// whitespace is removed from `username` and an empty `email` is stored as
/// no email.
///
/// # Errors
///
/// Returns an:
/// - [Error::EmptyUsername] if `username` is empty or only whitespace,
/// - [Error::DuplicateUsername] if another user already has `username`,
/// - or [Error::SqlError] if some other SQL error occurred.
pub fn create_user(
    username: &str,
    email: Option<&str>,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::EmptyUsername);
    }

    let email = email
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_owned);

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let id = transaction
        .query_row(
            "INSERT INTO user (username, email, password) VALUES (?1, ?2, ?3) RETURNING id",
            (username, &email, password_hash.as_ref()),
            |row| row.get(0).map(UserID::new),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateUsername(username.to_owned()),
            error => error.into(),
        })?;

    create_payment_method(id, &NewPaymentMethod::default_cash(), &transaction)?;

    transaction.commit()?;

    Ok(User {
        id,
        username: username.to_owned(),
        email,
        password_hash,
    })
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, email, password FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user from the database with the username `username`.
///
/// # Errors
///
/// This function will return an error if:
/// - `username` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, email, password FROM user WHERE username = :username")?
        .query_row(&[(":username", &username.trim())], map_user_row)
        .map_err(|error| error.into())
}

/// Delete a user along with all of their payment methods and transactions.
///
/// Returns the number of users deleted, which is zero if `user_id` does not
/// belong to a registered user.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn delete_user(user_id: UserID, connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM user WHERE id = ?1", [user_id.as_i64()])
        .map_err(Error::from)
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    let count: i64 = connection.query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))?;

    usize::try_from(count)
        .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, count).into())
}

//! Defines the payment method models and their database queries.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::UserID,
    database_id::{PaymentMethodId, RowsAffected},
};

// ============================================================================
// MODELS
// ============================================================================

/// The kind of payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodType {
    /// Physical money.
    Cash,
    /// A credit card.
    Credit,
    /// A debit card.
    Debit,
}

impl MethodType {
    fn as_str(&self) -> &'static str {
        match self {
            MethodType::Cash => "cash",
            MethodType::Credit => "credit",
            MethodType::Debit => "debit",
        }
    }
}

impl Display for MethodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for MethodType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MethodType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "cash" => Ok(MethodType::Cash),
            "credit" => Ok(MethodType::Credit),
            "debit" => Ok(MethodType::Debit),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// The company that processes card payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardProcessor {
    /// No processor, e.g. for cash.
    #[default]
    None,
    /// Visa.
    Visa,
    /// Mastercard.
    Mastercard,
    /// American Express, also accepted as "am".
    #[serde(alias = "am")]
    AmericanExpress,
    /// Discovery.
    Discovery,
}

impl CardProcessor {
    fn as_str(&self) -> &'static str {
        match self {
            CardProcessor::None => "none",
            CardProcessor::Visa => "visa",
            CardProcessor::Mastercard => "mastercard",
            CardProcessor::AmericanExpress => "american_express",
            CardProcessor::Discovery => "discovery",
        }
    }
}

impl Display for CardProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for CardProcessor {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CardProcessor {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "none" => Ok(CardProcessor::None),
            "visa" => Ok(CardProcessor::Visa),
            "mastercard" => Ok(CardProcessor::Mastercard),
            "american_express" => Ok(CardProcessor::AmericanExpress),
            "discovery" => Ok(CardProcessor::Discovery),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A way a user pays for things or receives money, e.g. a wallet or a credit card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// The ID of the payment method.
    pub id: PaymentMethodId,
    /// The display name, unique among the owner's payment methods.
    pub name: String,
    /// Whether this is cash or a card.
    #[serde(rename = "type")]
    pub method_type: MethodType,
    /// The card processor, [CardProcessor::None] for cash.
    pub processor: CardProcessor,
}

/// The data for creating or replacing a payment method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPaymentMethod {
    /// The display name.
    pub name: String,
    /// Whether this is cash or a card.
    #[serde(rename = "type")]
    pub method_type: MethodType,
    /// The card processor, defaults to none.
    #[serde(default)]
    pub processor: CardProcessor,
}

impl NewPaymentMethod {
    /// The "Cash" payment method every user starts with.
    pub fn default_cash() -> Self {
        Self {
            name: "Cash".to_owned(),
            method_type: MethodType::Cash,
            processor: CardProcessor::None,
        }
    }

    /// Check the payment method and return its trimmed name.
    ///
    /// # Errors
    ///
    /// Returns an:
    /// - [Error::EmptyPaymentMethodName] if the name is empty or only whitespace,
    /// - [Error::CashWithProcessor] if a cash method has a card processor.
    fn validated_name(&self) -> Result<&str, Error> {
        let name = self.name.trim();

        if name.is_empty() {
            return Err(Error::EmptyPaymentMethodName);
        }

        if self.method_type == MethodType::Cash && self.processor != CardProcessor::None {
            return Err(Error::CashWithProcessor);
        }

        Ok(name)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the payment method table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_payment_method_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS payment_method (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                method_type TEXT NOT NULL,
                processor TEXT NOT NULL,
                UNIQUE(user_id, name),
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a payment method.
pub fn map_payment_method_row(row: &Row) -> Result<PaymentMethod, rusqlite::Error> {
    Ok(PaymentMethod {
        id: row.get(0)?,
        name: row.get(1)?,
        method_type: row.get(2)?,
        processor: row.get(3)?,
    })
}

fn map_unique_violation(error: rusqlite::Error, name: &str) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicatePaymentMethodName(name.to_owned()),
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::NotFound,
        error => error.into(),
    }
}

/// Create a new payment method for the user `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyPaymentMethodName] or [Error::CashWithProcessor] if `new_method` is invalid,
/// - [Error::DuplicatePaymentMethodName] if the user already has a method with the same name,
/// - [Error::NotFound] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_payment_method(
    user_id: UserID,
    new_method: &NewPaymentMethod,
    connection: &Connection,
) -> Result<PaymentMethod, Error> {
    let name = new_method.validated_name()?;

    connection
        .prepare(
            "INSERT INTO payment_method (user_id, name, method_type, processor)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, method_type, processor",
        )?
        .query_row(
            (
                user_id.as_i64(),
                name,
                new_method.method_type,
                new_method.processor,
            ),
            map_payment_method_row,
        )
        .map_err(|error| map_unique_violation(error, name))
}

/// Get all of the payment methods belonging to `user_id`, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_payment_methods(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<PaymentMethod>, Error> {
    connection
        .prepare(
            "SELECT id, name, method_type, processor FROM payment_method
             WHERE user_id = :user_id ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_payment_method_row)?
        .map(|maybe_method| maybe_method.map_err(Error::from))
        .collect()
}

/// Retrieve one of the user's payment methods by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of `user_id`'s payment methods,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_payment_method(
    id: PaymentMethodId,
    user_id: UserID,
    connection: &Connection,
) -> Result<PaymentMethod, Error> {
    let payment_method = connection
        .prepare(
            "SELECT id, name, method_type, processor FROM payment_method
             WHERE id = :id AND user_id = :user_id",
        )?
        .query_one(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_payment_method_row,
        )?;

    Ok(payment_method)
}

/// Replace the name, type and processor of one of the user's payment methods.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyPaymentMethodName] or [Error::CashWithProcessor] if `new_method` is invalid,
/// - [Error::UpdateMissingPaymentMethod] if `id` does not refer to one of `user_id`'s payment methods,
/// - [Error::DuplicatePaymentMethodName] if the new name is used by another of the user's methods,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_payment_method(
    id: PaymentMethodId,
    user_id: UserID,
    new_method: &NewPaymentMethod,
    connection: &Connection,
) -> Result<PaymentMethod, Error> {
    let name = new_method.validated_name()?;

    connection
        .prepare(
            "UPDATE payment_method
             SET name = ?1, method_type = ?2, processor = ?3
             WHERE id = ?4 AND user_id = ?5
             RETURNING id, name, method_type, processor",
        )?
        .query_row(
            (
                name,
                new_method.method_type,
                new_method.processor,
                id,
                user_id.as_i64(),
            ),
            map_payment_method_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingPaymentMethod,
            error => map_unique_violation(error, name),
        })
}

/// Delete one of the user's payment methods.
///
/// Transactions that used the payment method are kept with no payment method.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn delete_payment_method(
    id: PaymentMethodId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM payment_method WHERE id = :id AND user_id = :user_id",
            &[(":id", &id), (":user_id", &user_id.as_i64())],
        )
        .map_err(Error::from)
}

// ============================================================================
// TESTS
// ============================================================================

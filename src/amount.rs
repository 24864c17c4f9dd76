//! A fixed-point monetary amount with two decimal places.
//!
//! Amounts are stored in the database as an integer number of cents so that
//! sums are exact.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A non-negative amount of money with exactly two decimal places.
///
/// Serializes as a decimal string, e.g. `"12.50"`, and deserializes from
/// either a string or a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places kept for every amount.
    pub const SCALE: u32 = 2;

    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, Self::SCALE));

    /// The largest amount that can be recorded, 99,999,999.99.
    pub const MAX: Self = Self(Decimal::from_parts(0x540B_E3FF, 2, 0, false, Self::SCALE));

    /// Create an amount from a decimal number.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidAmount] if `value` is negative, has more than
    /// two decimal places or is larger than [Amount::MAX].
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::InvalidAmount("amount cannot be negative".to_owned()));
        }

        if value.normalize().scale() > Self::SCALE {
            return Err(Error::InvalidAmount(
                "amount can have at most two decimal places".to_owned(),
            ));
        }

        if value > Self::MAX.0 {
            return Err(Error::InvalidAmount(format!(
                "amount cannot be larger than {}",
                Self::MAX
            )));
        }

        let mut value = value;
        value.rescale(Self::SCALE);
        value.set_sign_positive(true);

        Ok(Self(value))
    }

    /// Create an amount from a whole number of cents.
    pub(crate) fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, Self::SCALE))
    }

    /// The amount as a whole number of cents.
    pub(crate) fn cents(&self) -> i64 {
        // Amounts are bounded by `Amount::MAX` so the mantissa always fits in an i64.
        self.0.mantissa() as i64
    }

    /// The amount as a decimal number.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.cents()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Self::from_cents)
    }
}

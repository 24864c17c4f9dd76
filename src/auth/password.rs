//! Password validation and hashing.
//!
//! `ValidatedPassword` wraps a string and ensures it is a strong password.
//! `PasswordHash` converts a `ValidatedPassword` into a salted and hashed password.

use std::fmt::Display;

use bcrypt::{BcryptError, hash, verify};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that has been validated, but not yet hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Create and validate a new password from a string.
    ///
    /// `user_inputs` are strings the user has entered elsewhere, e.g. their
    /// username, that should not make up a large part of the password.
    ///
    /// # Errors
    ///
    /// Returns an [Error::TooWeak] if the password is considered too weak.
    /// The error message explains why and suggests how to make it stronger.
    pub fn new(raw_password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, user_inputs);

        match analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => Err(Error::TooWeak(
                analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }

    /// Create a new `ValidatedPassword` without any validation.
    ///
    /// The caller should ensure that `raw_password` is a secure password.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default bcrypt cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a validated password with the bcrypt `cost`.
    ///
    /// A cost of at least 12 is recommended, use [PasswordHash::DEFAULT_COST]
    /// outside of tests.
    ///
    /// # Errors
    ///
    /// Returns an [Error::HashingError] if the password could not be hashed.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap an existing password hash, e.g. one loaded from the database.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;
/// The ID of a payment method.
pub type PaymentMethodId = DatabaseId;
/// The ID of a transaction.
pub type TransactionId = DatabaseId;
/// The number of rows changed by an update or delete.
pub type RowsAffected = usize;

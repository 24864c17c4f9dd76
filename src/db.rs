//! Sets up the application's database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, auth::create_user_table, payment_method::create_payment_method_table,
    transaction::create_transaction_table,
};

/// Create all of the database tables and indexes for the application.
///
/// Foreign key enforcement is switched on for `connection` first, since
/// cascading user deletes and clearing deleted payment methods on
/// transactions rely on it. Calling this on an initialized database is a
/// no-op.
///
/// # Errors
/// This function may return a [Error::SqlError] if an SQL error occurs.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_payment_method_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

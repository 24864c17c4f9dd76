//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its categories and repeat intervals
//! - Database functions for storing, querying, and managing transactions
//! - The JSON endpoints for transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    Category, NewTransaction, RepeatInterval, Transaction, TransactionMonth, TransactionType,
    create_transaction, create_transaction_table, get_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::{list_transaction_months_endpoint, list_transactions_endpoint};

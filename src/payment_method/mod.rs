//! Payment methods: the cash and cards a user spends from or is paid into.
//!
//! This module contains the `PaymentMethod` model, its database queries and
//! the JSON endpoints for managing a user's payment methods.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    CardProcessor, MethodType, NewPaymentMethod, PaymentMethod, create_payment_method,
    create_payment_method_table, get_payment_method, get_payment_methods,
};
pub use create_endpoint::create_payment_method_endpoint;
pub use delete_endpoint::delete_payment_method_endpoint;
pub use edit_endpoint::edit_payment_method_endpoint;
pub use list_endpoint::list_payment_methods_endpoint;

//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// The route for registering a new user or deleting the logged in user.
pub const USERS: &str = "/api/users";
/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for logging out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for listing and creating payment methods.
pub const PAYMENT_METHODS: &str = "/api/payment_methods";
/// The route for editing or deleting a single payment method.
pub const PAYMENT_METHOD: &str = "/api/payment_methods/{payment_method_id}";
/// The route for listing and creating transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for editing or deleting a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for listing the months that have transactions.
pub const TRANSACTION_MONTHS: &str = "/api/transaction_months";
/// The route for the summary of the current month.
pub const SUMMARY: &str = "/api/summary";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

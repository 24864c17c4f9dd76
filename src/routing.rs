//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};

use crate::{
    AppState, Error,
    auth::{auth_guard, delete_user_endpoint, get_log_out, post_log_in, register_user},
    endpoints,
    payment_method::{
        create_payment_method_endpoint, delete_payment_method_endpoint,
        edit_payment_method_endpoint, list_payment_methods_endpoint,
    },
    summary::get_summary_endpoint,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        list_transaction_months_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out));

    let protected_routes = Router::new()
        .route(endpoints::USERS, delete(delete_user_endpoint))
        .route(
            endpoints::PAYMENT_METHODS,
            get(list_payment_methods_endpoint).post(create_payment_method_endpoint),
        )
        .route(
            endpoints::PAYMENT_METHOD,
            put(edit_payment_method_endpoint).delete(delete_payment_method_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_MONTHS,
            get(list_transaction_months_endpoint),
        )
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}

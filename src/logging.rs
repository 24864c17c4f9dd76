//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// The number of characters of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED_FIELDS: [&str; 2] = ["password", "confirmation"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords in request bodies that parse as JSON are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    let body_text = String::from_utf8_lossy(&body_bytes);

    log_request(&parts, &redact_passwords(&body_text));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

/// Replace the value of any password field in a JSON object with asterisks.
///
/// Text that is not a JSON object is returned unchanged.
fn redact_passwords(json_text: &str) -> String {
    let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(json_text) else {
        return json_text.to_owned();
    };

    for field in REDACTED_FIELDS {
        if let Some(value) = object.get_mut(field) {
            *value = Value::String("********".to_owned());
        }
    }

    Value::Object(object).to_string()
}

fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Received request: {parts:#?}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {parts:#?}\nbody: {body:?}"),
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {parts:#?}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {parts:#?}\nbody: {body:?}"),
    }
}

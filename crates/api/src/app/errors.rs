use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crudkit_store::StoreError;

/// Failure body: `{ "error": <message> }`.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

/// Informational body: `{ "message": <message> }` (404s and delete confirmations).
pub fn json_message(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "message": message.into() }))).into_response()
}

pub fn not_found(kind: &str) -> Response {
    json_message(StatusCode::NOT_FOUND, format!("{kind} not found"))
}

/// Validation failures are the caller's fault (400); everything else the
/// store reports, including a malformed id, is a 500 with the raw text.
pub fn store_error_to_response(kind: &str, err: StoreError) -> Response {
    match err {
        StoreError::Validation(v) => json_error(StatusCode::BAD_REQUEST, v.to_string()),
        other => {
            tracing::error!(kind, error = %other, "store operation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

/// Unparseable or non-JSON request bodies.
pub fn body_rejection_to_response(rejection: JsonRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

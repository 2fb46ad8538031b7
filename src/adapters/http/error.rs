//! JSON error body shared by every endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error body: `{ "code": "...", "message": "..." }`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Logs server-side failures before they are flattened into a 500 body.
pub(super) fn log_if_internal(status: StatusCode, message: &str) {
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), error = %message, "Request failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_without_details_when_none() {
        let json = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "Not found")).unwrap();
        assert_eq!(json, serde_json::json!({ "code": "NOT_FOUND", "message": "Not found" }));
    }

    #[test]
    fn serializes_details_when_present() {
        let body = ErrorResponse::with_details("VALIDATION_FAILED", "Invalid", serde_json::json!({ "field": "email" }));
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["details"]["field"], "email");
    }
}

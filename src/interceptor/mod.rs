//! The error-handling interceptor.
//!
//! Translates framework-level error signals into HTTP responses. The
//! built-in mapping below is only the default; supply
//! [`BootstrapOptions::error_handler`](crate::factory::BootstrapOptions)
//! to replace it wholesale.

use crate::logging::Logger;
use crate::validation::{FieldIssue, join_messages};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// The default error-to-response mapping, replaceable via bootstrap
/// options.
pub trait ErrorHandler: Send + Sync {
    /// No route matched `path`. `ignored` is true for paths in the
    /// ignored-paths set (favicon and similar browser-automatic
    /// requests), which should stay out of warning-level logs.
    fn not_found(&self, path: &str, ignored: bool) -> Response;

    /// A request failed validation. `issues` is empty when no
    /// field-level breakdown could be extracted; `raw_message` is the
    /// fallback for that case.
    fn validation(&self, raw_message: &str, issues: &[FieldIssue]) -> Response;

    /// Anything else.
    fn internal(&self, message: &str) -> Response;
}

pub struct DefaultErrorHandler {
    logger: Logger,
}

impl DefaultErrorHandler {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl ErrorHandler for DefaultErrorHandler {
    fn not_found(&self, path: &str, ignored: bool) -> Response {
        if ignored {
            return StatusCode::NOT_FOUND.into_response();
        }
        self.logger.warn(&format!("Route not found: {}", path));
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Route not found", "path": path })),
        )
            .into_response()
    }

    fn validation(&self, raw_message: &str, issues: &[FieldIssue]) -> Response {
        let message = if issues.is_empty() {
            raw_message.to_string()
        } else {
            join_messages(issues)
        };
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Validation error",
                "message": message,
                "details": issues,
            })),
        )
            .into_response()
    }

    fn internal(&self, message: &str) -> Response {
        self.logger.error(message);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_joins_field_issues() {
        let handler = DefaultErrorHandler::new(Logger::default());
        let issues = vec![FieldIssue::new(["email"], "Invalid email")];
        let response = handler.validation("unused", &issues);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_falls_back_to_raw_message() {
        let handler = DefaultErrorHandler::new(Logger::default());
        let response = handler.validation("body is not JSON", &[]);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with a consistent shape for callers.

use crate::storage::StorageError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Client error type surfaced to callers of remote and session operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Api(ApiError),

    #[error("No session token received")]
    MissingSessionToken,

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Normalized remote failure: `{message, errors}` plus the HTTP status when
/// one was received.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
    pub errors: Map<String, Value>,
}

impl ApiError {
    /// Build from a non-success response body.
    ///
    /// The message is taken from the body's `message`, then `error`, then
    /// the operation's fallback. A JSON object body is kept as `errors`.
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        let errors = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        let message = ["message", "error"]
            .iter()
            .find_map(|key| errors.get(*key).and_then(Value::as_str))
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string();

        Self {
            status: Some(status),
            message,
            errors,
        }
    }

    /// Build from a failure that never produced a response.
    pub fn transport(cause: impl std::fmt::Display, fallback: &str) -> Self {
        Self {
            status: None,
            message: format!("{}: {}", fallback, cause),
            errors: Map::new(),
        }
    }

    /// First message the server reported for `field` (Rails style
    /// `{"email": ["has already been taken"]}`).
    pub fn first_field_error(&self, field: &str) -> Option<&str> {
        match self.errors.get(field)? {
            Value::Array(items) => items.first().and_then(Value::as_str),
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl AppError {
    /// True when the server rejected the presented credentials (HTTP 401).
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, AppError::Api(e) if e.status == Some(401))
    }

    /// User-facing message.
    pub fn message(&self) -> String {
        match self {
            AppError::Api(e) => e.message.clone(),
            other => other.to_string(),
        }
    }

    /// Server-provided field errors, empty for local failures.
    pub fn field_errors(&self) -> Map<String, Value> {
        match self {
            AppError::Api(e) => e.errors.clone(),
            _ => Map::new(),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::Api(err)
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_prefers_message_then_error() {
        let err = ApiError::from_response(422, r#"{"message":"Bad","error":"Worse"}"#, "Failed");
        assert_eq!(err.message, "Bad");

        let err = ApiError::from_response(401, r#"{"error":"Invalid credentials"}"#, "Failed");
        assert_eq!(err.message, "Invalid credentials");
        assert_eq!(err.errors.get("error").and_then(Value::as_str), Some("Invalid credentials"));
    }

    #[test]
    fn test_non_json_body_uses_fallback() {
        let err = ApiError::from_response(500, "<html>oops</html>", "Login failed");
        assert_eq!(err.message, "Login failed");
        assert!(err.errors.is_empty());
        assert_eq!(err.status, Some(500));
    }

    #[test]
    fn test_first_field_error() {
        let err = ApiError::from_response(
            422,
            r#"{"email":["has already been taken"],"password":"is too short"}"#,
            "Registration failed",
        );
        assert_eq!(err.first_field_error("email"), Some("has already been taken"));
        assert_eq!(err.first_field_error("password"), Some("is too short"));
        assert_eq!(err.first_field_error("first_name"), None);
    }

    #[test]
    fn test_is_auth_rejected() {
        let err = AppError::Api(ApiError::from_response(401, "{}", "Failed"));
        assert!(err.is_auth_rejected());

        let err = AppError::Api(ApiError::from_response(403, "{}", "Failed"));
        assert!(!err.is_auth_rejected());

        assert!(!AppError::MissingSessionToken.is_auth_rejected());
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = ApiError::transport("connection refused", "Failed to fetch categories");
        assert_eq!(err.status, None);
        assert_eq!(err.message, "Failed to fetch categories: connection refused");
    }
}

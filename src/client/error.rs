//! Client-side error types.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::FieldError;

/// Error body as seen by the client.
///
/// Mirrors the server's `{ code, message, details }` body, with `code`
/// optional so that bodies produced by other layers (proxies, the framework's
/// own rejections) still parse as long as they carry a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Machine-readable code, when the server sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Field-level validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ErrorPayload {
    /// Creates a payload carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            details: None,
        }
    }

    /// Builds the payload for a non-2xx response.
    ///
    /// Uses the server's body when it parses, otherwise the status text.
    #[must_use]
    pub fn from_response_body(status: StatusCode, body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|_| {
            Self::message(status.canonical_reason().unwrap_or("Request failed"))
        })
    }
}

/// Errors returned by the HTTP client adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {}", .payload.message)]
    Api {
        /// Response status.
        status: StatusCode,
        /// Parsed error body, or a generic one built from the status text.
        payload: ErrorPayload,
    },

    /// The request never produced a usable response (connection refused,
    /// DNS failure, CORS rejection, unreadable body).
    #[error("Network error: {}", .payload.message)]
    Transport {
        /// Generic payload carrying the transport error text.
        payload: ErrorPayload,
    },
}

impl ClientError {
    /// Creates a transport error from any displayable cause.
    #[must_use]
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport {
            payload: ErrorPayload::message(cause.to_string()),
        }
    }

    /// Returns the human-readable message, suitable for a user notice.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.payload().message
    }

    /// Returns the error payload.
    #[must_use]
    pub const fn payload(&self) -> &ErrorPayload {
        match self {
            Self::Api { payload, .. } | Self::Transport { payload } => payload,
        }
    }

    /// Returns the HTTP status, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    /// Returns true if the failure happened before any HTTP response.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_payload_from_server_body() {
        let body = br#"{"code":"NOT_FOUND","message":"Task not found: 42"}"#;

        let payload = ErrorPayload::from_response_body(StatusCode::NOT_FOUND, body);

        assert_eq!(payload.code.as_deref(), Some("NOT_FOUND"));
        assert_eq!(payload.message, "Task not found: 42");
        assert!(payload.details.is_none());
    }

    #[rstest]
    fn test_payload_with_validation_details() {
        let body = br#"{"code":"VALIDATION_ERROR","message":"Title is required",
            "details":[{"field":"title","message":"Title is required"}]}"#;

        let payload = ErrorPayload::from_response_body(StatusCode::BAD_REQUEST, body);

        assert_eq!(payload.details.map(|details| details.len()), Some(1));
    }

    #[rstest]
    #[case(b"<html>Bad Gateway</html>".as_slice(), StatusCode::BAD_GATEWAY, "Bad Gateway")]
    #[case(b"".as_slice(), StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")]
    fn test_payload_falls_back_to_status_text(
        #[case] body: &[u8],
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let payload = ErrorPayload::from_response_body(status, body);

        assert_eq!(payload, ErrorPayload::message(expected));
    }

    #[rstest]
    fn test_client_error_accessors() {
        let api = ClientError::Api {
            status: StatusCode::NOT_FOUND,
            payload: ErrorPayload::message("Task not found"),
        };
        assert_eq!(api.message(), "Task not found");
        assert_eq!(api.status(), Some(StatusCode::NOT_FOUND));
        assert!(!api.is_network());

        let transport = ClientError::transport("connection refused");
        assert_eq!(transport.message(), "connection refused");
        assert_eq!(transport.status(), None);
        assert!(transport.is_network());
    }

    #[rstest]
    fn test_client_error_display() {
        let error = ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            payload: ErrorPayload::message("Title is required"),
        };

        assert_eq!(error.to_string(), "HTTP 400 Bad Request: Title is required");
    }
}

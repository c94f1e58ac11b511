//! API error handling.
//!
//! Every failure leaves the server as a JSON body of the form
//! `{ "code": ..., "message": ..., "details": [...] }`, where `code` is one
//! of the [`ErrorCode`] values and fixes the HTTP status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::service::ServiceError;
use crate::infrastructure::RepositoryError;

/// Message sent to clients in place of internal error details.
const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

// =============================================================================
// Error Code
// =============================================================================

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request body failed validation.
    ValidationError,
    /// The addressed task does not exist.
    NotFound,
    /// The store failed.
    InternalError,
}

impl ErrorCode {
    /// Returns the HTTP status sent with this code.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// =============================================================================
// API Error
// =============================================================================

/// Error body returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Per-field reasons, present only for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the rejected field.
    pub field: String,
    /// Why the field was rejected.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// API Error Response
// =============================================================================

/// An [`ApiError`] paired with the status it is sent with.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    /// HTTP status code, derived from the error code.
    pub status: StatusCode,
    /// Response body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn with_code(code: ErrorCode, message: String, details: Option<Vec<FieldError>>) -> Self {
        Self {
            status: code.status(),
            error: ApiError {
                code,
                message,
                details,
            },
        }
    }

    /// 400 with field-level details.
    #[must_use]
    pub fn validation_error(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self::with_code(ErrorCode::ValidationError, message.into(), Some(details))
    }

    /// 404.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::NotFound, message.into(), None)
    }

    /// 500 with a generic message; the cause is logged, never sent.
    #[must_use]
    pub fn internal_error(cause: &dyn std::fmt::Display) -> Self {
        tracing::error!(%cause, "Internal error");
        Self::with_code(
            ErrorCode::InternalError,
            INTERNAL_ERROR_MESSAGE.to_string(),
            None,
        )
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<RepositoryError> for ApiErrorResponse {
    fn from(error: RepositoryError) -> Self {
        Self::internal_error(&error)
    }
}

impl From<ServiceError> for ApiErrorResponse {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Validation(validation) => validation.into(),
            ServiceError::NotFound(task_id) => {
                Self::not_found(format!("Task not found: {task_id}"))
            }
            ServiceError::Store(store) => store.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A rejected request, with one entry per offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rejected fields, in the order they were checked.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Rejects a single field.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut messages = self.errors.iter().map(|error| error.message.as_str());
        if let Some(first) = messages.next() {
            formatter.write_str(first)?;
        }
        for message in messages {
            write!(formatter, "; {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ApiErrorResponse {
    fn from(error: ValidationError) -> Self {
        // Clients that only read `message` still see the first reason.
        let message = error.errors.first().map_or_else(
            || "Validation failed".to_string(),
            |field| field.message.clone(),
        );
        Self::validation_error(message, error.errors)
    }
}

// =============================================================================
// Tests
// =============================================================================

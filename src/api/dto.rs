//! Data Transfer Objects for API requests and responses.
//!
//! This module contains DTOs that are separate from domain models,
//! providing a clean API contract. The same types are used by the HTTP
//! client, so response DTOs derive both `Serialize` and `Deserialize`.

use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use crate::domain::{Task, TaskPatch};

/// Confirmation message returned by a successful delete.
pub const TASK_DELETED_MESSAGE: &str = "Task deleted successfully";

// =============================================================================
// Task DTOs
// =============================================================================

/// Request DTO for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Title of the task.
    pub title: String,
    /// Initial completion flag (defaults to false).
    #[serde(default)]
    pub completed: bool,
}

impl CreateTaskRequest {
    /// Creates a request for a not yet completed task.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }
}

/// Request DTO for a partial task update.
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title for the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New completion flag for the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTaskRequest {
    /// Creates a request that only changes the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    /// Creates a request that only changes the completion flag.
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

/// Response DTO for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task ID.
    pub id: String,
    /// Title of the task.
    pub title: String,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.task_id.to_string(),
            title: task.title.clone(),
            completed: task.completed,
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self::from(&task)
    }
}

/// Response DTO for `GET /task/get-tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListResponse {
    /// All tasks in insertion order.
    pub tasks: Vec<TaskResponse>,
}

/// Response DTO for `DELETE /task/delete-tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    /// Confirmation message.
    pub message: String,
}

impl Default for DeleteTaskResponse {
    fn default() -> Self {
        Self {
            message: TASK_DELETED_MESSAGE.to_string(),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a task title.
///
/// Returns the title exactly as given. Only an empty or whitespace-only
/// title is rejected; there is no length limit.
///
/// # Errors
///
/// Returns `ValidationError` on the `title` field if the title is blank.
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::single("title", "Title is required"));
    }

    Ok(title.to_string())
}

/// Validates an update request and converts it into a domain patch.
///
/// A present title is validated like on create; `completed` needs no checks.
///
/// # Errors
///
/// Returns `ValidationError` if the title is present and blank.
pub fn validate_update(request: &UpdateTaskRequest) -> Result<TaskPatch, ValidationError> {
    let title = request.title.as_deref().map(validate_title).transpose()?;

    Ok(TaskPatch {
        title,
        completed: request.completed,
    })
}

// =============================================================================
// Tests
// =============================================================================

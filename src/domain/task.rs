//! Task domain model.
//!
//! A task is the only entity of the tracker: an identifier, a title, and a
//! completion flag, plus the timestamps the store keeps for ordering.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Unique identifier for a task.
///
/// Identifiers are time-ordered UUIDs (v7). They are assigned once at
/// creation and never reused, even after the task is deleted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generates a new `TaskId` with a time-ordered UUID (v7).
    ///
    /// **Note**: This is an impure function (side effect: time + random).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

/// A timestamp wrapper for `DateTime<Utc>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current time as a `Timestamp`.
    ///
    /// **Note**: This is an impure function (side effect: system clock).
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Formats the timestamp as RFC 3339, the form used on the wire.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

// =============================================================================
// Task
// =============================================================================

/// The task record as persisted by the store.
///
/// The serialized form of this struct is the stored document, so field
/// names here are also the keys a partial update merges into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task.
    pub task_id: TaskId,
    /// Title of the task (never empty once persisted).
    pub title: String,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Timestamp when the task was created.
    pub created_at: Timestamp,
    /// Timestamp when the task was last updated.
    pub updated_at: Timestamp,
}

impl Task {
    /// Creates a new, not yet completed task.
    ///
    /// This is a pure function. Use `TaskId::generate()` and `Timestamp::now()`
    /// at the call site to create the required parameters.
    #[must_use]
    pub fn new(task_id: TaskId, title: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            task_id,
            title: title.into(),
            completed: false,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }

    /// Returns a new task with the given completion flag.
    #[must_use]
    pub fn with_completed(self, completed: bool) -> Self {
        Self { completed, ..self }
    }

    /// Returns a new task with the given title.
    #[must_use]
    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }

    /// Returns a new task with the updated timestamp.
    #[must_use]
    pub fn with_updated_at(self, timestamp: Timestamp) -> Self {
        Self {
            updated_at: timestamp,
            ..self
        }
    }

    /// Applies a partial update.
    ///
    /// Only the fields present in `patch` change. `updated_at` is set to
    /// `now` whenever the patch is applied, even if every value is equal to
    /// the current one.
    #[must_use]
    pub fn apply_patch(self, patch: &TaskPatch, now: Timestamp) -> Self {
        let task = match &patch.title {
            Some(title) => self.with_title(title.clone()),
            None => self,
        };
        let task = match patch.completed {
            Some(completed) => task.with_completed(completed),
            None => task,
        };
        task.with_updated_at(now)
    }
}

// =============================================================================
// TaskPatch
// =============================================================================

/// A validated partial update.
///
/// Absent fields are left untouched by [`Task::apply_patch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title, already validated.
    pub title: Option<String>,
    /// New completion flag.
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Returns a patch that only sets the completion flag.
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

// =============================================================================
// Tests
// =============================================================================

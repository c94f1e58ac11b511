//! Repository trait for the task store.
//!
//! Every method returns a boxed `'static` future so that implementations can
//! be selected at runtime and shared as `Arc<dyn TaskRepository>`. Each
//! mutation is a single atomic store call; there is no optimistic locking,
//! so concurrent writers race with last-write-wins semantics.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{Task, TaskId, TaskPatch, Timestamp};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
///
/// A missing task is not an error at this layer: lookups return `Option`
/// and deletes return `bool`.
#[derive(Debug, Error, Clone)]
pub enum RepositoryError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type returned by repository futures.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// =============================================================================
// Task Repository
// =============================================================================

/// Repository trait for Task records.
///
/// # Example
///
/// ```ignore
/// let task = Task::new(TaskId::generate(), "Buy milk", Timestamp::now());
/// repository.insert(&task).await?;
/// let tasks = repository.list().await?;
/// ```
pub trait TaskRepository: Send + Sync {
    /// Finds a task by its ID.
    ///
    /// Returns `Ok(Some(task))` if found, `Ok(None)` if not found.
    fn find_by_id(&self, id: &TaskId) -> BoxFuture<'static, RepositoryResult<Option<Task>>>;

    /// Inserts a new task.
    ///
    /// Inserting an ID that already exists is a `DatabaseError`; IDs are
    /// assigned by the service and never reused.
    fn insert(&self, task: &Task) -> BoxFuture<'static, RepositoryResult<()>>;

    /// Applies a partial update to an existing task.
    ///
    /// Returns `Ok(Some(updated))` if the task existed, `Ok(None)` otherwise.
    fn update(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        now: Timestamp,
    ) -> BoxFuture<'static, RepositoryResult<Option<Task>>>;

    /// Deletes a task by its ID.
    ///
    /// Returns `Ok(true)` if the task was deleted, `Ok(false)` if it didn't exist.
    fn delete(&self, id: &TaskId) -> BoxFuture<'static, RepositoryResult<bool>>;

    /// Lists all tasks in insertion order.
    fn list(&self) -> BoxFuture<'static, RepositoryResult<Vec<Task>>>;
}

// =============================================================================
// Tests
// =============================================================================

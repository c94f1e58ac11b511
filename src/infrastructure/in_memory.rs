//! In-memory task store.
//!
//! Suitable for development and tests. Tasks are kept in a `Vec` so that
//! listing preserves insertion order, wrapped in `Arc<RwLock<...>>` so the
//! repository can be cloned and shared across request handlers.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::domain::{Task, TaskId, TaskPatch, Timestamp};
use crate::infrastructure::{RepositoryError, RepositoryResult, TaskRepository};

/// In-memory implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// let repository = InMemoryTaskRepository::new();
/// let task = Task::new(TaskId::generate(), "My Task", Timestamp::now());
///
/// repository.insert(&task).await?;
/// let found = repository.find_by_id(&task.task_id).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates a new empty in-memory task repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl TaskRepository for InMemoryTaskRepository {
    fn find_by_id(&self, id: &TaskId) -> BoxFuture<'static, RepositoryResult<Option<Task>>> {
        let tasks = Arc::clone(&self.tasks);
        let id = id.clone();
        async move {
            let guard = tasks.read().await;
            Ok(guard.iter().find(|task| task.task_id == id).cloned())
        }
        .boxed()
    }

    fn insert(&self, task: &Task) -> BoxFuture<'static, RepositoryResult<()>> {
        let tasks = Arc::clone(&self.tasks);
        let task = task.clone();
        async move {
            let mut guard = tasks.write().await;
            if guard.iter().any(|existing| existing.task_id == task.task_id) {
                return Err(RepositoryError::DatabaseError(format!(
                    "duplicate task id {}",
                    task.task_id
                )));
            }
            guard.push(task);
            Ok(())
        }
        .boxed()
    }

    fn update(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        now: Timestamp,
    ) -> BoxFuture<'static, RepositoryResult<Option<Task>>> {
        let tasks = Arc::clone(&self.tasks);
        let id = id.clone();
        let patch = patch.clone();
        async move {
            let mut guard = tasks.write().await;
            let Some(slot) = guard.iter_mut().find(|task| task.task_id == id) else {
                return Ok(None);
            };
            let updated = slot.clone().apply_patch(&patch, now);
            *slot = updated.clone();
            Ok(Some(updated))
        }
        .boxed()
    }

    fn delete(&self, id: &TaskId) -> BoxFuture<'static, RepositoryResult<bool>> {
        let tasks = Arc::clone(&self.tasks);
        let id = id.clone();
        async move {
            let mut guard = tasks.write().await;
            let before = guard.len();
            guard.retain(|task| task.task_id != id);
            Ok(guard.len() < before)
        }
        .boxed()
    }

    fn list(&self) -> BoxFuture<'static, RepositoryResult<Vec<Task>>> {
        let tasks = Arc::clone(&self.tasks);
        async move {
            let guard = tasks.read().await;
            Ok(guard.clone())
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================

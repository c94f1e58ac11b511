//! Task service.
//!
//! Validates requests at the service boundary and maps each operation to a
//! single store call. Handlers stay thin: they extract the request, call the
//! service, and wrap the result in the HTTP response.

use std::sync::Arc;

use thiserror::Error;

use super::dto::{
    CreateTaskRequest, DeleteTaskResponse, UpdateTaskRequest, validate_title, validate_update,
};
use super::error::ValidationError;
use crate::domain::{Task, TaskId, Timestamp};
use crate::infrastructure::{RepositoryError, TaskRepository};

/// Errors returned by [`TaskService`].
#[derive(Debug, Error, Clone)]
pub enum ServiceError {
    /// The request failed validation and never reached the store.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No task with the given ID exists.
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Task CRUD operations over an injected store handle.
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository + Send + Sync>,
}

impl TaskService {
    /// Creates a service over the given store.
    #[must_use]
    pub const fn new(repository: Arc<dyn TaskRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Lists all tasks in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the store fails.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.repository.list().await?)
    }

    /// Creates a task with a fresh ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for an empty or whitespace-only
    /// title (the store is not called), or `ServiceError::Store`.
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ServiceError> {
        let title = validate_title(&request.title)?;

        let task = Task::new(TaskId::generate(), title, Timestamp::now())
            .with_completed(request.completed);

        self.repository.insert(&task).await?;

        tracing::info!(task_id = %task.task_id, "Task created");
        Ok(task)
    }

    /// Applies a partial update.
    ///
    /// An empty request returns the stored record unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if a present title is invalid,
    /// `ServiceError::NotFound` if the ID does not resolve, or
    /// `ServiceError::Store`.
    pub async fn update_task(
        &self,
        task_id: &TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<Task, ServiceError> {
        let patch = validate_update(request)?;

        let updated = if patch.is_empty() {
            self.repository.find_by_id(task_id).await?
        } else {
            self.repository
                .update(task_id, &patch, Timestamp::now())
                .await?
        };

        let task = updated.ok_or_else(|| ServiceError::NotFound(task_id.clone()))?;

        tracing::debug!(task_id = %task.task_id, completed = task.completed, "Task updated");
        Ok(task)
    }

    /// Deletes a task permanently.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the ID does not resolve (including
    /// a second delete of the same ID), or `ServiceError::Store`.
    pub async fn delete_task(&self, task_id: &TaskId) -> Result<DeleteTaskResponse, ServiceError> {
        if !self.repository.delete(task_id).await? {
            return Err(ServiceError::NotFound(task_id.clone()));
        }

        tracing::info!(task_id = %task_id, "Task deleted");
        Ok(DeleteTaskResponse::default())
    }
}

// =============================================================================
// Tests
// =============================================================================

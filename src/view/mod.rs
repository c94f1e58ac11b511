//! Headless task list view.
//!
//! Holds the client-side state a task list screen renders from: the task
//! cache, the new-task draft, the search term, the single task being edited,
//! and the notices to show the user. A rendering layer reads this state and
//! forwards user actions to the async operations below.
//!
//! # Synchronization
//!
//! The cache is never patched locally. After every successful mutation
//! (create, edit, toggle, delete) the full list is reloaded from the API, so
//! the cache always mirrors what the server last reported. A failed action
//! leaves the cache untouched and reports the error both to the caller and
//! as an error notice.
//!
//! While a mutation for a task (or a create) is in flight, further mutations
//! for the same target fail immediately with [`ViewError::Busy`] and send no
//! request.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::api::{CreateTaskRequest, TaskResponse, UpdateTaskRequest};
use crate::client::{ClientError, TaskApi};

/// Success notice text for a created task.
pub const TASK_CREATED_NOTICE: &str = "Task created successfully";

/// Success notice text for an edited task.
pub const TASK_UPDATED_NOTICE: &str = "Task updated successfully";

// =============================================================================
// Types
// =============================================================================

/// A message for the user, shown once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An action succeeded.
    Success(String),
    /// An action failed.
    Error(String),
}

/// What a mutation acts on, for the in-flight guard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MutationTarget {
    /// Creating a new task.
    Create,
    /// Changing or deleting the task with this ID.
    Task(String),
}

impl fmt::Display for MutationTarget {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(formatter, "task creation"),
            Self::Task(id) => write!(formatter, "task {id}"),
        }
    }
}

/// The task currently in edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    /// ID of the task being edited.
    pub task_id: String,
    /// Current edit text.
    pub text: String,
}

/// Errors returned by view operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The API call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A mutation for the same target is already in flight.
    #[error("A request for {0} is already in progress")]
    Busy(MutationTarget),

    /// The task is not in the cache.
    #[error("Task {0} is not in the task list")]
    UnknownTask(String),
}

#[derive(Debug, Default)]
struct ViewState {
    tasks: Vec<TaskResponse>,
    new_task: String,
    search_term: String,
    editing: Option<EditState>,
    in_flight: HashSet<MutationTarget>,
    notices: Vec<Notice>,
}

/// Marks a target as in flight until dropped.
struct InFlightGuard {
    state: Arc<Mutex<ViewState>>,
    target: MutationTarget,
}

impl InFlightGuard {
    fn acquire(state: &Arc<Mutex<ViewState>>, target: MutationTarget) -> Result<Self, ViewError> {
        if !state.lock().in_flight.insert(target.clone()) {
            return Err(ViewError::Busy(target));
        }
        Ok(Self {
            state: Arc::clone(state),
            target,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.state.lock().in_flight.remove(&self.target);
    }
}

/// Returns the tasks whose title contains `term`, ignoring case.
///
/// An empty term matches every task.
#[must_use]
pub fn filter_tasks(tasks: &[TaskResponse], term: &str) -> Vec<TaskResponse> {
    let needle = term.to_lowercase();
    tasks
        .iter()
        .filter(|task| task.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

// =============================================================================
// Task List View
// =============================================================================

/// Client-side task list state bound to a [`TaskApi`].
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct TaskListView {
    api: Arc<dyn TaskApi>,
    state: Arc<Mutex<ViewState>>,
}

impl fmt::Debug for TaskListView {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TaskListView")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl TaskListView {
    /// Creates an empty view. Call [`TaskListView::fetch_tasks`] to load.
    #[must_use]
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(ViewState::default())),
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Returns the cached tasks in server order.
    #[must_use]
    pub fn tasks(&self) -> Vec<TaskResponse> {
        self.state.lock().tasks.clone()
    }

    /// Returns the cached tasks matching the search term.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<TaskResponse> {
        let state = self.state.lock();
        filter_tasks(&state.tasks, &state.search_term)
    }

    /// Number of cached tasks marked completed.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.state
            .lock()
            .tasks
            .iter()
            .filter(|task| task.completed)
            .count()
    }

    /// Number of cached tasks.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Returns the new-task draft.
    #[must_use]
    pub fn new_task(&self) -> String {
        self.state.lock().new_task.clone()
    }

    /// Returns the search term.
    #[must_use]
    pub fn search_term(&self) -> String {
        self.state.lock().search_term.clone()
    }

    /// Returns the task in edit mode, if any.
    #[must_use]
    pub fn editing(&self) -> Option<EditState> {
        self.state.lock().editing.clone()
    }

    /// Returns true while at least one mutation is in flight.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        !self.state.lock().in_flight.is_empty()
    }

    /// Removes and returns pending notices, oldest first.
    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.lock().notices)
    }

    // -------------------------------------------------------------------------
    // Local edits
    // -------------------------------------------------------------------------

    /// Replaces the new-task draft.
    pub fn set_new_task(&self, text: impl Into<String>) {
        self.state.lock().new_task = text.into();
    }

    /// Replaces the search term. Filtering happens on read.
    pub fn set_search_term(&self, term: impl Into<String>) {
        self.state.lock().search_term = term.into();
    }

    /// Enters edit mode for a cached task, seeding the text with its title.
    ///
    /// Any other task leaves edit mode.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::UnknownTask` if the task is not cached.
    pub fn start_edit(&self, task_id: &str) -> Result<(), ViewError> {
        let mut state = self.state.lock();
        let title = state
            .tasks
            .iter()
            .find(|task| task.id == task_id)
            .map(|task| task.title.clone())
            .ok_or_else(|| ViewError::UnknownTask(task_id.to_string()))?;

        state.editing = Some(EditState {
            task_id: task_id.to_string(),
            text: title,
        });
        Ok(())
    }

    /// Replaces the edit text. Ignored outside edit mode.
    pub fn set_edit_text(&self, text: impl Into<String>) {
        if let Some(editing) = self.state.lock().editing.as_mut() {
            editing.text = text.into();
        }
    }

    /// Leaves edit mode without saving.
    pub fn cancel_edit(&self) {
        self.state.lock().editing = None;
    }

    // -------------------------------------------------------------------------
    // Network operations
    // -------------------------------------------------------------------------

    /// Reloads the task cache from the API.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Client` if the request fails; the cache is kept.
    pub async fn fetch_tasks(&self) -> Result<(), ViewError> {
        match self.api.list_tasks().await {
            Ok(tasks) => {
                self.state.lock().tasks = tasks;
                Ok(())
            }
            Err(error) => Err(self.report(error.into())),
        }
    }

    /// Creates a task from the draft, then reloads.
    ///
    /// A blank draft does nothing and returns `Ok(None)`. The draft is
    /// cleared once the server accepts the task.
    ///
    /// # Errors
    ///
    /// - `ViewError::Busy` if a create is already in flight
    /// - `ViewError::Client` if the create or the reload fails
    pub async fn add_task(&self) -> Result<Option<TaskResponse>, ViewError> {
        let draft = self.new_task();
        if draft.trim().is_empty() {
            return Ok(None);
        }

        let _guard = InFlightGuard::acquire(&self.state, MutationTarget::Create)?;

        let created = self
            .api
            .create_task(CreateTaskRequest::new(draft))
            .await
            .map_err(|error| self.report(error.into()))?;

        {
            let mut state = self.state.lock();
            state.new_task.clear();
            state
                .notices
                .push(Notice::Success(TASK_CREATED_NOTICE.to_string()));
        }

        self.fetch_tasks().await?;
        Ok(Some(created))
    }

    /// Flips the completion flag of a cached task, then reloads.
    ///
    /// # Errors
    ///
    /// - `ViewError::UnknownTask` if the task is not cached
    /// - `ViewError::Busy` if a mutation for the task is in flight
    /// - `ViewError::Client` if the update or the reload fails
    pub async fn toggle_complete(&self, task_id: &str) -> Result<TaskResponse, ViewError> {
        let completed = self
            .state
            .lock()
            .tasks
            .iter()
            .find(|task| task.id == task_id)
            .map(|task| task.completed)
            .ok_or_else(|| ViewError::UnknownTask(task_id.to_string()))?;

        let _guard =
            InFlightGuard::acquire(&self.state, MutationTarget::Task(task_id.to_string()))?;

        let updated = self
            .api
            .update_task(task_id, UpdateTaskRequest::completed(!completed))
            .await
            .map_err(|error| self.report(error.into()))?;

        self.fetch_tasks().await?;
        Ok(updated)
    }

    /// Saves the edit text as the title of the task in edit mode, then reloads.
    ///
    /// Outside edit mode, or with blank edit text, nothing is sent and
    /// `Ok(None)` is returned; edit mode stays open in the blank case. Edit
    /// mode closes once the server accepts the new title.
    ///
    /// # Errors
    ///
    /// - `ViewError::Busy` if a mutation for the task is in flight
    /// - `ViewError::Client` if the update or the reload fails
    pub async fn save_edit(&self) -> Result<Option<TaskResponse>, ViewError> {
        let Some(editing) = self.editing() else {
            return Ok(None);
        };
        if editing.text.trim().is_empty() {
            return Ok(None);
        }

        let _guard =
            InFlightGuard::acquire(&self.state, MutationTarget::Task(editing.task_id.clone()))?;

        let updated = self
            .api
            .update_task(&editing.task_id, UpdateTaskRequest::title(editing.text))
            .await
            .map_err(|error| self.report(error.into()))?;

        {
            let mut state = self.state.lock();
            if state
                .editing
                .as_ref()
                .is_some_and(|current| current.task_id == editing.task_id)
            {
                state.editing = None;
            }
            state
                .notices
                .push(Notice::Success(TASK_UPDATED_NOTICE.to_string()));
        }

        self.fetch_tasks().await?;
        Ok(Some(updated))
    }

    /// Deletes a task, then reloads.
    ///
    /// The success notice carries the server's confirmation message.
    ///
    /// # Errors
    ///
    /// - `ViewError::Busy` if a mutation for the task is in flight
    /// - `ViewError::Client` if the delete or the reload fails
    pub async fn delete_task(&self, task_id: &str) -> Result<(), ViewError> {
        let _guard =
            InFlightGuard::acquire(&self.state, MutationTarget::Task(task_id.to_string()))?;

        let response = self
            .api
            .delete_task(task_id)
            .await
            .map_err(|error| self.report(error.into()))?;

        {
            let mut state = self.state.lock();
            if state
                .editing
                .as_ref()
                .is_some_and(|current| current.task_id == task_id)
            {
                state.editing = None;
            }
            state.notices.push(Notice::Success(response.message));
        }

        self.fetch_tasks().await
    }

    /// Records an error notice and hands the error back.
    fn report(&self, error: ViewError) -> ViewError {
        let message = match &error {
            ViewError::Client(client) => client.message().to_string(),
            other => other.to_string(),
        };
        tracing::warn!(%error, "Task list action failed");
        self.state.lock().notices.push(Notice::Error(message));
        error
    }
}

// =============================================================================
// Tests
// =============================================================================

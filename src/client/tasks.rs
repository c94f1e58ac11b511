//! Typed task operations on top of the generic call.

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ClientError;
use super::http::ApiClient;
use crate::api::{
    CreateTaskRequest, DeleteTaskResponse, TaskListResponse, TaskResponse, UpdateTaskRequest,
};

/// One request of the Task API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRequest {
    /// `GET task/get-tasks`
    List,
    /// `POST task/create-tasks`
    Create(CreateTaskRequest),
    /// `PUT task/update-tasks/{id}`
    Update {
        /// Task ID.
        id: String,
        /// Fields to change.
        patch: UpdateTaskRequest,
    },
    /// `DELETE task/delete-tasks/{id}`
    Delete {
        /// Task ID.
        id: String,
    },
}

/// JSON body of a [`TaskRequest`].
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TaskRequestBody<'a> {
    /// Body of a create request.
    Create(&'a CreateTaskRequest),
    /// Body of an update request.
    Update(&'a UpdateTaskRequest),
}

impl TaskRequest {
    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::List => Method::GET,
            Self::Create(_) => Method::POST,
            Self::Update { .. } => Method::PUT,
            Self::Delete { .. } => Method::DELETE,
        }
    }

    /// Returns the path relative to the API root.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::List => "task/get-tasks".to_string(),
            Self::Create(_) => "task/create-tasks".to_string(),
            Self::Update { id, .. } => format!("task/update-tasks/{id}"),
            Self::Delete { id } => format!("task/delete-tasks/{id}"),
        }
    }

    /// Returns the JSON body, if the request has one.
    #[must_use]
    pub const fn body(&self) -> Option<TaskRequestBody<'_>> {
        match self {
            Self::Create(request) => Some(TaskRequestBody::Create(request)),
            Self::Update { patch, .. } => Some(TaskRequestBody::Update(patch)),
            Self::List | Self::Delete { .. } => None,
        }
    }
}

impl ApiClient {
    /// Sends a typed task request with the configured default token.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::call`].
    pub async fn send<T: DeserializeOwned>(&self, request: &TaskRequest) -> Result<T, ClientError> {
        self.call(
            request.method(),
            &request.path(),
            request.body().as_ref(),
            None,
        )
        .await
    }
}

/// Task operations as seen by the client side.
///
/// [`ApiClient`] implements this over HTTP; the view depends only on the
/// trait so it can run against any implementation.
pub trait TaskApi: Send + Sync {
    /// Fetches all tasks in insertion order.
    fn list_tasks(&self) -> BoxFuture<'static, Result<Vec<TaskResponse>, ClientError>>;

    /// Creates a task.
    fn create_task(
        &self,
        request: CreateTaskRequest,
    ) -> BoxFuture<'static, Result<TaskResponse, ClientError>>;

    /// Applies a partial update to a task.
    fn update_task(
        &self,
        id: &str,
        patch: UpdateTaskRequest,
    ) -> BoxFuture<'static, Result<TaskResponse, ClientError>>;

    /// Deletes a task.
    fn delete_task(&self, id: &str) -> BoxFuture<'static, Result<DeleteTaskResponse, ClientError>>;
}

impl TaskApi for ApiClient {
    fn list_tasks(&self) -> BoxFuture<'static, Result<Vec<TaskResponse>, ClientError>> {
        let client = self.clone();
        async move {
            let response: TaskListResponse = client.send(&TaskRequest::List).await?;
            Ok(response.tasks)
        }
        .boxed()
    }

    fn create_task(
        &self,
        request: CreateTaskRequest,
    ) -> BoxFuture<'static, Result<TaskResponse, ClientError>> {
        let client = self.clone();
        async move { client.send(&TaskRequest::Create(request)).await }.boxed()
    }

    fn update_task(
        &self,
        id: &str,
        patch: UpdateTaskRequest,
    ) -> BoxFuture<'static, Result<TaskResponse, ClientError>> {
        let client = self.clone();
        let request = TaskRequest::Update {
            id: id.to_string(),
            patch,
        };
        async move { client.send(&request).await }.boxed()
    }

    fn delete_task(&self, id: &str) -> BoxFuture<'static, Result<DeleteTaskResponse, ClientError>> {
        let client = self.clone();
        let request = TaskRequest::Delete { id: id.to_string() };
        async move { client.send(&request).await }.boxed()
    }
}

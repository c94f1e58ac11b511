//! HTTP handlers and router for the Task API.
//!
//! All task routes live under `/api`:
//!
//! | Method | Path                          | Response                |
//! |--------|-------------------------------|-------------------------|
//! | GET    | `/api/task/get-tasks`         | `200 { tasks: [...] }`  |
//! | POST   | `/api/task/create-tasks`      | `201` created task      |
//! | PUT    | `/api/task/update-tasks/{id}` | `200` updated task      |
//! | DELETE | `/api/task/delete-tasks/{id}` | `200 { message }`       |
//!
//! `GET /health` sits outside the API root.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{Method, StatusCode, header},
    routing::{delete, get, post, put},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::dto::{
    CreateTaskRequest, DeleteTaskResponse, TaskListResponse, TaskResponse, UpdateTaskRequest,
};
use super::error::ApiErrorResponse;
use super::service::TaskService;
use crate::domain::TaskId;
use crate::infrastructure::TaskRepository;

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// Holds the single store handle created at startup. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Task service wrapping the store handle.
    pub task_service: TaskService,
}

impl AppState {
    /// Creates a new `AppState` from the task store.
    #[must_use]
    pub const fn new(task_repository: Arc<dyn TaskRepository + Send + Sync>) -> Self {
        Self {
            task_service: TaskService::new(task_repository),
        }
    }
}

// =============================================================================
// Path Parameters
// =============================================================================

/// Parses the `{id}` path segment.
///
/// A malformed ID can never name a stored task, so it is reported as
/// `NOT_FOUND` rather than as a bad request.
fn parse_task_id(raw: &str) -> Result<TaskId, ApiErrorResponse> {
    raw.parse()
        .map_err(|_| ApiErrorResponse::not_found(format!("Task not found: {raw}")))
}

// =============================================================================
// Task Handlers
// =============================================================================

/// Lists all tasks.
///
/// # Response
///
/// - **200 OK**: `{ "tasks": [...] }` in insertion order
/// - **500 Internal Server Error**: Store failure
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] if the store fails.
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<TaskListResponse>, ApiErrorResponse> {
    let tasks = state.task_service.list_tasks().await?;

    Ok(Json(TaskListResponse {
        tasks: tasks.iter().map(TaskResponse::from).collect(),
    }))
}

/// Creates a new task.
///
/// # Request Body
///
/// ```json
/// { "title": "Task title", "completed": false }
/// ```
///
/// # Response
///
/// - **201 Created**: Task created successfully
/// - **400 Bad Request**: Validation error
/// - **500 Internal Server Error**: Store failure
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] for an invalid title or a store failure.
pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiErrorResponse> {
    let task = state.task_service.create_task(&request).await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Applies a partial update to a task.
///
/// # Request Body
///
/// ```json
/// { "title": "New title", "completed": true }
/// ```
///
/// Both fields are optional.
///
/// # Response
///
/// - **200 OK**: Updated task
/// - **400 Bad Request**: Validation error
/// - **404 Not Found**: Unknown or malformed ID
/// - **500 Internal Server Error**: Store failure
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] as listed above.
pub async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let task_id = parse_task_id(&raw_id)?;

    let task = state.task_service.update_task(&task_id, &request).await?;

    Ok(Json(TaskResponse::from(task)))
}

/// Deletes a task.
///
/// # Response
///
/// - **200 OK**: `{ "message": "Task deleted successfully" }`
/// - **404 Not Found**: Unknown or malformed ID
/// - **500 Internal Server Error**: Store failure
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] as listed above.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteTaskResponse>, ApiErrorResponse> {
    let task_id = parse_task_id(&raw_id)?;

    let response = state.task_service.delete_task(&task_id).await?;

    Ok(Json(response))
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
///
/// # Response
///
/// - **200 OK**: Service is healthy
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Router
// =============================================================================

/// Builds the CORS policy.
///
/// Credentials are allowed, so the request origin is mirrored instead of
/// answering with a wildcard.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Builds the task routes, relative to the API root.
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/task/get-tasks", get(list_tasks))
        .route("/task/create-tasks", post(create_task))
        .route("/task/update-tasks/{id}", put(update_task))
        .route("/task/delete-tasks/{id}", delete(delete_task))
}

/// Builds the application router with tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", task_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

// =============================================================================
// Tests
// =============================================================================

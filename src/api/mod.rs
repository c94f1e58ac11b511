//! API module for HTTP handlers.
//!
//! This module contains the HTTP handlers, request/response DTOs, the task
//! service, and error mapping for the Task API.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod service;

pub use dto::{
    CreateTaskRequest, DeleteTaskResponse, TASK_DELETED_MESSAGE, TaskListResponse, TaskResponse,
    UpdateTaskRequest, validate_title, validate_update,
};
pub use error::{ApiError, ApiErrorResponse, ErrorCode, FieldError, ValidationError};
pub use handlers::{
    AppState, HealthResponse, cors_layer, create_router, create_task, delete_task, health_check,
    list_tasks, update_task,
};
pub use service::{ServiceError, TaskService};

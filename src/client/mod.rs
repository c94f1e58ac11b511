//! HTTP client adapter for the Task API.
//!
//! [`ApiClient::call`] is the single generic entry point; [`TaskApi`] and
//! [`TaskRequest`] layer the four task operations on top of it.

pub mod config;
pub mod error;
pub mod http;
pub mod tasks;

pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::{ClientError, ErrorPayload};
pub use http::ApiClient;
pub use tasks::{TaskApi, TaskRequest, TaskRequestBody};

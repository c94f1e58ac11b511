//! Common test helpers for integration tests.
//!
//! This module provides shared utilities for creating `AppState` instances,
//! driving the router in-process, and running a live server for client tests.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{create_test_app_state, send_json};
//! ```
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate. Helpers used only by specific
//! test files would otherwise generate dead code warnings in the others.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use task_tracker::api::{AppState, create_router};
use task_tracker::client::{ApiClient, ClientConfig};
use task_tracker::infrastructure::InMemoryTaskRepository;

// =============================================================================
// AppState Creation Helpers
// =============================================================================

/// Creates a test `AppState` over an empty in-memory store.
pub fn create_test_app_state() -> AppState {
    AppState::new(Arc::new(InMemoryTaskRepository::new()))
}

/// Creates the full application router over an empty in-memory store.
pub fn create_test_router() -> Router {
    create_router(create_test_app_state())
}

// =============================================================================
// In-process Requests
// =============================================================================

/// Sends one request through the router and returns status and JSON body.
///
/// An empty response body is returned as `Value::Null`.
pub async fn send_json(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

// =============================================================================
// Live Server
// =============================================================================

/// A server running on an ephemeral local port.
pub struct TestServer {
    /// Bound address.
    pub address: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// API root for the client adapter.
    pub fn api_url(&self) -> String {
        format!("http://{}/api/", self.address)
    }

    /// Creates a client adapter pointed at this server.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(ClientConfig::new(self.api_url())).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Starts the application on `127.0.0.1:0` over an empty in-memory store.
pub async fn spawn_test_server() -> TestServer {
    spawn_router(create_test_router()).await
}

/// Starts an arbitrary router on `127.0.0.1:0`.
pub async fn spawn_router(router: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestServer { address, handle }
}

/// Returns an address on which nothing is listening.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

//! Integration tests for the HTTP client adapter against a live server.

mod common;

use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::get;
use reqwest::Method;
use rstest::rstest;
use serde_json::{Value, json};

use common::{closed_address, spawn_router, spawn_test_server};
use task_tracker::api::{
    CreateTaskRequest, TASK_DELETED_MESSAGE, TaskResponse, UpdateTaskRequest,
};
use task_tracker::client::{ApiClient, ClientConfig, ClientError, TaskApi};

#[rstest]
#[tokio::test]
async fn test_task_api_round_trip() {
    let server = spawn_test_server().await;
    let client = server.client();

    let created = client
        .create_task(CreateTaskRequest::new("Buy milk"))
        .await
        .unwrap();
    let toggled = client
        .update_task(&created.id, UpdateTaskRequest::completed(true))
        .await
        .unwrap();
    let listed = client.list_tasks().await.unwrap();
    let deleted = client.delete_task(&created.id).await.unwrap();

    assert!(!created.completed);
    assert!(toggled.completed);
    assert_eq!(listed, vec![toggled]);
    assert_eq!(deleted.message, TASK_DELETED_MESSAGE);
    assert!(client.list_tasks().await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_generic_call_returns_parsed_body() {
    let server = spawn_test_server().await;
    let client = server.client();

    let created: TaskResponse = client
        .call(
            Method::POST,
            "task/create-tasks",
            Some(&json!({ "title": "Walk dog", "completed": true })),
            None,
        )
        .await
        .unwrap();

    assert_eq!(created.title, "Walk dog");
    assert!(created.completed);
}

#[rstest]
#[tokio::test]
async fn test_not_found_carries_server_payload() {
    let server = spawn_test_server().await;
    let client = server.client();

    let error = client.delete_task("not-a-uuid").await.unwrap_err();

    match &error {
        ClientError::Api { status, payload } => {
            assert_eq!(*status, StatusCode::NOT_FOUND);
            assert_eq!(payload.code.as_deref(), Some("NOT_FOUND"));
        }
        ClientError::Transport { .. } => panic!("Expected Api error, got {error:?}"),
    }
    assert!(error.message().starts_with("Task not found"));
}

#[rstest]
#[tokio::test]
async fn test_validation_error_carries_details() {
    let server = spawn_test_server().await;
    let client = server.client();

    let error = client
        .create_task(CreateTaskRequest::new("   "))
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(error.message(), "Title is required");
    assert_eq!(error.payload().details.as_ref().map(Vec::len), Some(1));
}

#[rstest]
#[tokio::test]
async fn test_network_failure_is_transport_error() {
    let address = closed_address().await;
    let client = ApiClient::new(ClientConfig::new(format!("http://{address}/api"))).unwrap();

    let error = client.list_tasks().await.unwrap_err();

    assert!(error.is_network());
    assert_eq!(error.status(), None);
    assert!(!error.message().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_non_json_error_body_uses_status_text() {
    let router = Router::new().route(
        "/api/task/get-tasks",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let server = spawn_router(router).await;

    let error = server.client().list_tasks().await.unwrap_err();

    assert_eq!(error.status(), Some(StatusCode::BAD_GATEWAY));
    assert_eq!(error.message(), "Bad Gateway");
}

// =============================================================================
// Credentials
// =============================================================================

/// Echoes the credentials a request carried.
async fn echo_credentials(headers: HeaderMap) -> axum::Json<Value> {
    let read = |name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string)
    };
    axum::Json(json!({
        "authorization": read(header::AUTHORIZATION),
        "cookie": read(header::COOKIE),
    }))
}

fn credentials_router() -> Router {
    Router::new()
        .route(
            "/api/login",
            get(|| async { ([(header::SET_COOKIE, "session=abc; Path=/")], "{}") }),
        )
        .route("/api/echo", get(echo_credentials))
}

#[rstest]
#[tokio::test]
async fn test_bearer_token_only_when_supplied() {
    let server = spawn_router(credentials_router()).await;
    let client = server.client();

    let without: Value = client
        .call::<_, ()>(Method::GET, "echo", None, None)
        .await
        .unwrap();
    let with: Value = client
        .call::<_, ()>(Method::GET, "echo", None, Some("secret"))
        .await
        .unwrap();

    assert_eq!(without["authorization"], Value::Null);
    assert_eq!(with["authorization"], "Bearer secret");
}

#[rstest]
#[tokio::test]
async fn test_default_token_from_config() {
    let server = spawn_router(credentials_router()).await;
    let config = ClientConfig::new(server.api_url()).with_token("configured");
    let client = ApiClient::new(config).unwrap();

    let echoed: Value = client
        .call::<_, ()>(Method::GET, "echo", None, None)
        .await
        .unwrap();

    assert_eq!(echoed["authorization"], "Bearer configured");
}

#[rstest]
#[tokio::test]
async fn test_cookies_are_sent_back() {
    let server = spawn_router(credentials_router()).await;
    let client = server.client();

    let _: Value = client
        .call::<_, ()>(Method::GET, "login", None, None)
        .await
        .unwrap();
    let echoed: Value = client
        .call::<_, ()>(Method::GET, "echo", None, None)
        .await
        .unwrap();

    assert_eq!(echoed["cookie"], "session=abc");
}

//! End-to-end tests for the task list view over the real client adapter.

mod common;

use std::sync::Arc;

use rstest::rstest;

use common::{TestServer, closed_address, spawn_test_server};
use task_tracker::api::TASK_DELETED_MESSAGE;
use task_tracker::client::{ApiClient, ClientConfig};
use task_tracker::view::{Notice, TASK_CREATED_NOTICE, TaskListView};

fn view_for(server: &TestServer) -> TaskListView {
    TaskListView::new(Arc::new(server.client()))
}

async fn add(view: &TaskListView, title: &str) -> String {
    view.set_new_task(title);
    view.add_task().await.unwrap().unwrap().id
}

#[rstest]
#[tokio::test]
async fn test_create_toggle_delete_cycle() {
    let server = spawn_test_server().await;
    let view = view_for(&server);
    view.fetch_tasks().await.unwrap();
    assert_eq!(view.total_count(), 0);

    let id = add(&view, "Test").await;

    let tasks = view.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Test");
    assert!(!tasks[0].completed);
    assert!(view.new_task().is_empty());

    view.toggle_complete(&id).await.unwrap();
    assert!(view.tasks()[0].completed);
    assert_eq!(view.completed_count(), 1);

    view.delete_task(&id).await.unwrap();
    assert!(view.tasks().iter().all(|task| task.id != id));
    assert!(!view.is_mutating());

    let notices = view.take_notices();
    assert_eq!(
        notices.first(),
        Some(&Notice::Success(TASK_CREATED_NOTICE.to_string()))
    );
    assert_eq!(
        notices.last(),
        Some(&Notice::Success(TASK_DELETED_MESSAGE.to_string()))
    );
}

#[rstest]
#[tokio::test]
async fn test_edit_title_round_trip() {
    let server = spawn_test_server().await;
    let view = view_for(&server);
    let id = add(&view, "Walk dog").await;

    view.start_edit(&id).unwrap();
    view.set_edit_text("Walk the dog");
    let saved = view.save_edit().await.unwrap().unwrap();

    assert_eq!(saved.title, "Walk the dog");
    assert_eq!(view.tasks()[0].title, "Walk the dog");
    assert!(view.editing().is_none());
}

#[rstest]
#[tokio::test]
async fn test_search_filters_visible_tasks() {
    let server = spawn_test_server().await;
    let view = view_for(&server);
    add(&view, "Buy milk").await;
    add(&view, "Walk dog").await;

    view.set_search_term("buy");

    let visible: Vec<String> = view
        .visible_tasks()
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(visible, ["Buy milk"]);
    assert_eq!(view.total_count(), 2);
}

#[rstest]
#[case(5, 2)]
#[case(3, 3)]
#[case(4, 0)]
#[tokio::test]
async fn test_creates_minus_deletes(#[case] creates: usize, #[case] deletes: usize) {
    let server = spawn_test_server().await;
    let view = view_for(&server);

    let mut ids = Vec::new();
    for index in 0..creates {
        ids.push(add(&view, &format!("task {index}")).await);
    }
    for id in ids.iter().take(deletes) {
        view.delete_task(id).await.unwrap();
    }

    assert_eq!(view.total_count(), creates - deletes);
    // A second view sees the same server state.
    let other = view_for(&server);
    other.fetch_tasks().await.unwrap();
    assert_eq!(other.tasks(), view.tasks());
}

#[rstest]
#[tokio::test]
async fn test_server_rejection_keeps_cache_and_reports() {
    let server = spawn_test_server().await;
    let view = view_for(&server);
    add(&view, "Keep me").await;
    let _ = view.take_notices();

    let error = view.delete_task("not-a-uuid").await.unwrap_err();

    assert!(error.to_string().contains("Task not found"));
    assert_eq!(view.total_count(), 1);
    assert!(matches!(
        view.take_notices().as_slice(),
        [Notice::Error(message)] if message.starts_with("Task not found")
    ));
}

#[rstest]
#[tokio::test]
async fn test_unreachable_server_reports_network_error() {
    let address = closed_address().await;
    let client = ApiClient::new(ClientConfig::new(format!("http://{address}/api"))).unwrap();
    let view = TaskListView::new(Arc::new(client));
    view.set_new_task("Offline");

    let result = view.add_task().await;

    assert!(result.is_err());
    assert_eq!(view.new_task(), "Offline");
    assert_eq!(view.total_count(), 0);
    assert!(matches!(view.take_notices().as_slice(), [Notice::Error(_)]));
}

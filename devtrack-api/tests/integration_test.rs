/// Integration tests for the DevTrack API
///
/// These tests verify the core pipeline end-to-end against a real
/// database:
/// - Task creation writes its audit entry in the same transaction
/// - The status-update API applies, denies, and reports outcomes with
///   the always-200 `{success, error}` body
/// - Denied and invalid requests leave the task and its history
///   untouched
///
/// Requires a running PostgreSQL database (DATABASE_URL) and JWT_SECRET.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use devtrack_shared::models::task::{Task, TaskStatus};
use devtrack_shared::models::task_history::{HistoryAction, TaskHistory};
use serde_json::json;
use tower::Service as _;

/// Test that creating a task via the API writes exactly one audit entry
#[tokio::test]
async fn test_create_task_writes_created_history() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/tasks")
        .header("authorization", common::bearer(&ctx.admin_token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "title": "Ship the importer",
                "project_id": ctx.project.id,
                "assignee_id": ctx.assignee.id
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let task: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let task_id = task["id"].as_i64().unwrap();

    let history = TaskHistory::list_for_task(&ctx.db, task_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, HistoryAction::Created);
    assert_eq!(history[0].user_id, ctx.admin.id);
    assert_eq!(
        history[0].description,
        "Task \"Ship the importer\" was created"
    );

    let count = TaskHistory::count_for_task(&ctx.db, task_id).await.unwrap();
    assert_eq!(count, 1);

    ctx.cleanup().await.unwrap();
}

/// Test that the assignee can move their task and the audit entry records
/// the old/new snapshot
#[tokio::test]
async fn test_status_update_applied_for_assignee() {
    let ctx = TestContext::new().await.unwrap();

    let task = common::create_test_task(&ctx, "Wire up billing")
        .await
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/update-task-status/")
        .header("authorization", common::bearer(&ctx.assignee_token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"task_id": task.id, "status": "done"}).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let response_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(response_json, json!({"success": true}));

    let updated = Task::find_by_id(&ctx.db, task.id).await.unwrap().unwrap();
    assert_eq!(updated.status, TaskStatus::Done);

    let history = TaskHistory::list_for_task(&ctx.db, task.id).await.unwrap();
    let status_changes: Vec<_> = history
        .iter()
        .filter(|entry| entry.action == HistoryAction::StatusChanged)
        .collect();
    assert_eq!(status_changes.len(), 1);
    assert_eq!(status_changes[0].old_value, "todo");
    assert_eq!(status_changes[0].new_value, "done");
    assert_eq!(status_changes[0].user_id, ctx.assignee.id);
    assert_eq!(
        status_changes[0].description,
        "Task status changed from todo to done"
    );

    ctx.cleanup().await.unwrap();
}

/// Test that a developer who is not the assignee is denied and nothing
/// is written
#[tokio::test]
async fn test_status_update_denied_for_non_assignee() {
    let ctx = TestContext::new().await.unwrap();

    let task = common::create_test_task(&ctx, "Rotate the keys")
        .await
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/update-task-status/")
        .header("authorization", common::bearer(&ctx.outsider_token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"task_id": task.id, "status": "done"}).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let response_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        response_json,
        json!({"success": false, "error": "Permission denied"})
    );

    // Task untouched, and only the creation entry exists
    let unchanged = Task::find_by_id(&ctx.db, task.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, TaskStatus::Todo);

    let count = TaskHistory::count_for_task(&ctx.db, task.id).await.unwrap();
    assert_eq!(count, 1);

    ctx.cleanup().await.unwrap();
}

/// Test that a super admin may move any task, assignee or not
#[tokio::test]
async fn test_status_update_allowed_for_super_admin() {
    let ctx = TestContext::new().await.unwrap();

    let task = common::create_test_task(&ctx, "Backfill the index")
        .await
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/update-task-status/")
        .header("authorization", common::bearer(&ctx.admin_token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"task_id": task.id, "status": "in_progress"}).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let response_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(response_json, json!({"success": true}));

    let updated = Task::find_by_id(&ctx.db, task.id).await.unwrap().unwrap();
    assert_eq!(updated.status, TaskStatus::InProgress);

    ctx.cleanup().await.unwrap();
}

/// Test that a missing task reports not-found without writing history
#[tokio::test]
async fn test_status_update_missing_task() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/update-task-status/")
        .header("authorization", common::bearer(&ctx.admin_token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"task_id": 999_999_999, "status": "done"}).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let response_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        response_json,
        json!({"success": false, "error": "Task not found"})
    );

    ctx.cleanup().await.unwrap();
}

/// Test that non-POST methods get the structured invalid-request body,
/// still with HTTP 200
#[tokio::test]
async fn test_status_update_rejects_non_post() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/api/update-task-status/")
        .header("authorization", common::bearer(&ctx.assignee_token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let response_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        response_json,
        json!({"success": false, "error": "Invalid request"})
    );

    ctx.cleanup().await.unwrap();
}

/// Test that garbage bodies and unknown status strings are invalid
/// requests and leave the task untouched
#[tokio::test]
async fn test_status_update_rejects_invalid_payloads() {
    let ctx = TestContext::new().await.unwrap();

    let task = common::create_test_task(&ctx, "Prune stale branches")
        .await
        .unwrap();

    for payload in [
        "not json".to_string(),
        json!({"task_id": task.id}).to_string(),
        json!({"task_id": task.id, "status": "archived"}).to_string(),
    ] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/update-task-status/")
            .header("authorization", common::bearer(&ctx.assignee_token))
            .header("content-type", "application/json")
            .body(Body::from(payload))
            .unwrap();

        let response = ctx.app.clone().call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let response_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            response_json,
            json!({"success": false, "error": "Invalid request"})
        );
    }

    let unchanged = Task::find_by_id(&ctx.db, task.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, TaskStatus::Todo);

    let count = TaskHistory::count_for_task(&ctx.db, task.id).await.unwrap();
    assert_eq!(count, 1);

    ctx.cleanup().await.unwrap();
}

/// Test authentication requirement on the status API
#[tokio::test]
async fn test_status_update_requires_authentication() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/update-task-status/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"task_id": 1, "status": "done"}).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

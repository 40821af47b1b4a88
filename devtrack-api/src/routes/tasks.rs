/// Task endpoints and the status-update API
///
/// # Endpoints
///
/// - `GET /v1/tasks` - Tasks in the viewer's scope, with optional filters
/// - `POST /v1/tasks` - Create a task (+ audit entry, one transaction)
/// - `GET /v1/tasks/:id/history` - A task's audit trail
/// - `POST /api/update-task-status/` - Status update with the legacy
///   always-200 `{success, error}` contract
///
/// # Status API contract
///
/// Every response is HTTP 200; callers inspect the body:
///
/// ```json
/// {"success": true}
/// {"success": false, "error": "Permission denied"}
/// {"success": false, "error": "Task not found"}
/// {"success": false, "error": "Invalid request"}
/// ```
///
/// Non-POST methods and unparsable bodies fall into the
/// "Invalid request" bucket.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::Method,
    Extension, Json,
};
use chrono::NaiveDate;
use devtrack_shared::{
    auth::middleware::AuthContext,
    models::{
        project::Project,
        task::{CreateTask, StatusUpdateOutcome, Task, TaskFilter, TaskPriority, TaskStatus},
        task_history::TaskHistory,
    },
    scope,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Short title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Project the task belongs to
    pub project_id: i64,

    /// Assignee user ID
    pub assignee_id: i64,

    /// Initial status; defaults to todo
    #[serde(default = "default_status")]
    pub status: TaskStatus,

    /// Priority; defaults to medium
    #[serde(default)]
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

/// Task list query filters
#[derive(Debug, Deserialize, Default)]
pub struct TaskListQuery {
    /// Only tasks with this status
    pub status: Option<TaskStatus>,

    /// Only tasks in this project
    pub project: Option<i64>,
}

/// Status update request body
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    /// Task to update
    pub task_id: i64,

    /// New status string ("todo", "in_progress", "done")
    pub status: String,
}

/// Status update response body
///
/// Always delivered with HTTP 200; `success` is the machine-readable
/// outcome.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    /// Whether the update was applied
    pub success: bool,

    /// Error label when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusUpdateResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn err(label: &str) -> Self {
        Self {
            success: false,
            error: Some(label.to_string()),
        }
    }
}

/// Lists the tasks in the viewer's scope
///
/// Query filters narrow the scoped set; they never widen it.
pub async fn task_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let viewer = auth.viewer();

    let tasks = Task::list_visible(
        &state.db,
        &viewer,
        TaskFilter {
            status: query.status,
            project_id: query.project,
        },
    )
    .await?;

    Ok(Json(tasks))
}

/// Creates a task and its "created" audit entry in one transaction
pub async fn task_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let viewer = auth.viewer();

    let task = Task::create(
        &state.db,
        &viewer,
        CreateTask {
            title: req.title,
            description: req.description,
            project_id: req.project_id,
            assignee_id: req.assignee_id,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok(Json(task))
}

/// A task's audit trail, newest first
///
/// Gated by the task's visibility scope: the viewer must be able to see
/// the task to read its history.
pub async fn task_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<TaskHistory>>> {
    let viewer = auth.viewer();

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let project = Project::find_by_id(&state.db, task.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
    let is_member = Project::is_member(&state.db, project.id, viewer.id).await?;
    let project_in_scope =
        scope::project_visible(&viewer, project.created_by, is_member, project.is_active);

    if !scope::task_visible(&viewer, task.assignee_id, project_in_scope) {
        return Err(ApiError::Forbidden(
            "You do not have access to this task.".to_string(),
        ));
    }

    let history = TaskHistory::list_for_task(&state.db, id).await?;

    Ok(Json(history))
}

/// Status-update API handler
///
/// Implements the legacy contract: HTTP 200 on every path with a
/// `{success, error}` body. The actual permission check, lookup, write,
/// and audit append happen in `Task::update_status` inside one
/// transaction.
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    method: Method,
    body: Bytes,
) -> Json<StatusUpdateResponse> {
    if method != Method::POST {
        return Json(StatusUpdateResponse::err("Invalid request"));
    }

    let Ok(req) = serde_json::from_slice::<StatusUpdateRequest>(&body) else {
        return Json(StatusUpdateResponse::err("Invalid request"));
    };

    let Some(new_status) = TaskStatus::from_str(&req.status) else {
        return Json(StatusUpdateResponse::err("Invalid request"));
    };

    let viewer = auth.viewer();

    match Task::update_status(&state.db, &viewer, req.task_id, new_status).await {
        Ok(StatusUpdateOutcome::Updated(_)) => Json(StatusUpdateResponse::ok()),
        Ok(StatusUpdateOutcome::PermissionDenied) => {
            Json(StatusUpdateResponse::err("Permission denied"))
        }
        Ok(StatusUpdateOutcome::NotFound) => Json(StatusUpdateResponse::err("Task not found")),
        Err(e) => {
            tracing::error!(task_id = req.task_id, error = %e, "Status update failed");
            Json(StatusUpdateResponse::err("Invalid request"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_request_validation() {
        let valid = CreateTaskRequest {
            title: "Fix login redirect".to_string(),
            description: String::new(),
            project_id: 1,
            assignee_id: 2,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateTaskRequest {
            title: String::new(),
            description: String::new(),
            project_id: 1,
            assignee_id: 2,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_create_task_request_defaults() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"title": "Fix login redirect", "project_id": 1, "assignee_id": 2}"#,
        )
        .unwrap();
        assert_eq!(req.status, TaskStatus::Todo);
        assert_eq!(req.priority, TaskPriority::Medium);
        assert!(req.due_date.is_none());
    }

    #[test]
    fn test_status_update_request_parsing() {
        let req: StatusUpdateRequest =
            serde_json::from_str(r#"{"task_id": 42, "status": "done"}"#).unwrap();
        assert_eq!(req.task_id, 42);
        assert_eq!(req.status, "done");

        // Missing fields are a parse error, which the handler reports as
        // "Invalid request"
        assert!(serde_json::from_str::<StatusUpdateRequest>(r#"{"task_id": 42}"#).is_err());
        assert!(serde_json::from_str::<StatusUpdateRequest>("not json").is_err());
    }

    #[test]
    fn test_status_update_response_shape() {
        let ok = serde_json::to_string(&StatusUpdateResponse::ok()).unwrap();
        assert_eq!(ok, r#"{"success":true}"#);

        let denied = serde_json::to_string(&StatusUpdateResponse::err("Permission denied")).unwrap();
        assert_eq!(denied, r#"{"success":false,"error":"Permission denied"}"#);

        let not_found = serde_json::to_string(&StatusUpdateResponse::err("Task not found")).unwrap();
        assert_eq!(not_found, r#"{"success":false,"error":"Task not found"}"#);

        let invalid = serde_json::to_string(&StatusUpdateResponse::err("Invalid request")).unwrap();
        assert_eq!(invalid, r#"{"success":false,"error":"Invalid request"}"#);
    }

    #[test]
    fn test_task_list_query_deserializes() {
        let query: TaskListQuery =
            serde_json::from_str(r#"{"status": "in_progress", "project": 3}"#).unwrap();
        assert_eq!(query.status, Some(TaskStatus::InProgress));
        assert_eq!(query.project, Some(3));

        let empty: TaskListQuery = serde_json::from_str("{}").unwrap();
        assert!(empty.status.is_none());
        assert!(empty.project.is_none());
    }
}

/// Work log endpoints
///
/// # Endpoints
///
/// - `GET /v1/worklogs` - The viewer's work logs, optionally for one date
/// - `POST /v1/worklogs` - Log hours against a project
/// - `GET /v1/worklogs/project-choices` - Projects the viewer may log
///   hours against
///
/// The project-choice rule is membership-based and ignores whether the
/// project is archived: hours can still be logged against an inactive
/// project the user belongs to.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use devtrack_shared::{
    auth::middleware::AuthContext,
    models::{
        project::Project,
        work_log::{CreateWorkLog, WorkLog},
    },
    scope,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// Create work log request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkLogRequest {
    /// Project the hours were spent on
    pub project_id: i64,

    /// Optional task within the project
    pub task_id: Option<i64>,

    /// What was done
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Hours spent (non-negative)
    pub hours_spent: Decimal,

    /// The day the work happened; defaults to today
    pub date: Option<NaiveDate>,
}

/// Work log list query filters
#[derive(Debug, Deserialize, Default)]
pub struct WorkLogListQuery {
    /// Only logs for this date
    pub date: Option<NaiveDate>,
}

/// Lists the work logs in the viewer's scope
pub async fn worklog_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<WorkLogListQuery>,
) -> ApiResult<Json<Vec<WorkLog>>> {
    let viewer = auth.viewer();
    let logs = WorkLog::list_visible(&state.db, &viewer, query.date).await?;

    Ok(Json(logs))
}

/// Logs hours against a project, owned by the acting user
///
/// The project must be one of the viewer's log choices; the check uses
/// membership only, so archived projects remain loggable.
pub async fn worklog_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateWorkLogRequest>,
) -> ApiResult<Json<WorkLog>> {
    req.validate()?;

    if req.hours_spent < Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "Hours spent must not be negative".to_string(),
        ));
    }

    let viewer = auth.viewer();

    let project = Project::find_by_id(&state.db, req.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let is_member = Project::is_member(&state.db, project.id, viewer.id).await?;
    if !scope::work_log_project_choice(&viewer, project.created_by, is_member) {
        return Err(ApiError::Forbidden(
            "You cannot log hours against this project.".to_string(),
        ));
    }

    let log = WorkLog::create(
        &state.db,
        &viewer,
        CreateWorkLog {
            project_id: req.project_id,
            task_id: req.task_id,
            description: req.description,
            hours_spent: req.hours_spent,
            date: req.date.unwrap_or_else(|| Utc::now().date_naive()),
        },
    )
    .await?;

    Ok(Json(log))
}

/// Projects the viewer may log hours against
pub async fn project_choices(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Project>>> {
    let viewer = auth.viewer();
    let projects = Project::work_log_choices(&state.db, &viewer).await?;

    Ok(Json(projects))
}

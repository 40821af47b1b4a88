/// Project endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects` - Projects in the viewer's list scope
/// - `POST /v1/projects` - Create a project (creator = acting user)
/// - `GET /v1/projects/:id` - Project detail, access-checked

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use devtrack_shared::{
    auth::middleware::AuthContext,
    models::{
        project::{CreateProject, Project, ProjectMetrics},
        task::Task,
        work_log::WorkLog,
    },
    scope,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How many recent work logs the detail page shows
const RECENT_LOGS_LIMIT: i64 = 10;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Initial member user IDs
    #[serde(default)]
    pub member_ids: Vec<i64>,
}

/// Project detail response
#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    /// The project
    pub project: Project,

    /// Member user IDs
    pub member_ids: Vec<i64>,

    /// All tasks of the project, newest first
    pub tasks: Vec<Task>,

    /// Most recent work logs of the project
    pub recent_logs: Vec<WorkLog>,

    /// Completion metrics
    pub total_tasks: i64,

    /// Tasks done
    pub completed_tasks: i64,

    /// Completion percentage (0 when no tasks)
    pub progress_percentage: i64,
}

/// Lists the projects in the viewer's scope
pub async fn project_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Project>>> {
    let viewer = auth.viewer();
    let projects = Project::list_visible(&state.db, &viewer).await?;

    Ok(Json(projects))
}

/// Creates a project with the acting user as creator
pub async fn project_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let viewer = auth.viewer();

    let project = Project::create(
        &state.db,
        &viewer,
        CreateProject {
            name: req.name,
            description: req.description,
            member_ids: req.member_ids,
        },
    )
    .await?;

    tracing::info!(project_id = project.id, user_id = viewer.id, "Project created");

    Ok(Json(project))
}

/// Project detail, access-checked
///
/// A non-admin requester must be a member or the creator; otherwise the
/// request is denied and no partial data is returned.
pub async fn project_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProjectDetailResponse>> {
    let viewer = auth.viewer();

    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let is_member = Project::is_member(&state.db, project.id, viewer.id).await?;
    if !scope::can_view_project(&viewer, project.created_by, is_member) {
        return Err(ApiError::Forbidden(
            "You do not have access to this project.".to_string(),
        ));
    }

    let member_ids = Project::member_ids(&state.db, project.id).await?;
    let tasks = Task::list_for_project(&state.db, project.id).await?;
    let recent_logs =
        WorkLog::list_recent_for_project(&state.db, project.id, RECENT_LOGS_LIMIT).await?;
    let ProjectMetrics {
        total_tasks,
        completed_tasks,
    } = Project::metrics(&state.db, project.id).await?;
    let progress_percentage = ProjectMetrics {
        total_tasks,
        completed_tasks,
    }
    .progress_percentage();

    Ok(Json(ProjectDetailResponse {
        project,
        member_ids,
        tasks,
        recent_logs,
        total_tasks,
        completed_tasks,
        progress_percentage,
    }))
}

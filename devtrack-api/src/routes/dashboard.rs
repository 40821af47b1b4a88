/// Dashboard endpoint
///
/// # Endpoint
///
/// ```text
/// GET /v1/dashboard
/// ```
///
/// Returns the viewer's scoped rollup: the first few projects with the
/// full project count, the five most recently updated tasks, today's
/// work logs, task status counts, and up to five overdue tasks. All
/// derived, recomputed per request.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use chrono::Utc;
use devtrack_shared::{auth::middleware::AuthContext, dashboard::Dashboard};

/// Dashboard handler
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Dashboard>> {
    let viewer = auth.viewer();
    let today = Utc::now().date_naive();

    let dashboard = Dashboard::load(&state.db, &viewer, today).await?;

    Ok(Json(dashboard))
}

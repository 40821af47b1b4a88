/// Per-viewer dashboard rollup
///
/// A read-only composition over the viewer's already-scoped projects,
/// tasks, and work logs. Everything is recomputed per request; there is
/// no caching or incremental maintenance.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use crate::models::project::Project;
use crate::models::task::{Task, TaskStats};
use crate::models::work_log::WorkLog;
use crate::scope::Viewer;

/// How many projects and tasks the dashboard shows per section
const DASHBOARD_LIMIT: i64 = 5;

/// Dashboard payload for one viewer
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// First few projects in the viewer's scope
    pub projects: Vec<Project>,

    /// Full count of scoped projects
    pub total_projects: i64,

    /// Scoped tasks, most recently updated first
    pub recent_tasks: Vec<Task>,

    /// Scoped work logs dated today
    pub today_logs: Vec<WorkLog>,

    /// Status counts over scoped tasks
    pub task_stats: TaskStats,

    /// Scoped todo/in-progress tasks past their due date
    pub overdue_tasks: Vec<Task>,
}

impl Dashboard {
    /// Loads the dashboard for a viewer
    ///
    /// `today` is passed in rather than read from the clock so the
    /// today's-logs and overdue sections are deterministic under test.
    pub async fn load(pool: &PgPool, viewer: &Viewer, today: NaiveDate) -> Result<Self, sqlx::Error> {
        let mut projects = Project::list_visible(pool, viewer).await?;
        let total_projects = projects.len() as i64;
        projects.truncate(DASHBOARD_LIMIT as usize);

        let recent_tasks = Task::recent(pool, viewer, DASHBOARD_LIMIT).await?;
        let today_logs = WorkLog::list_visible(pool, viewer, Some(today)).await?;
        let task_stats = Task::stats(pool, viewer).await?;
        let overdue_tasks = Task::overdue(pool, viewer, today, DASHBOARD_LIMIT).await?;

        Ok(Self {
            projects,
            total_projects,
            recent_tasks,
            today_logs,
            task_stats,
            overdue_tasks,
        })
    }
}

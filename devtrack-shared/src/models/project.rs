/// Project model and database operations
///
/// This module provides the Project model with creator + member access.
/// Projects are the access boundary for tasks and work logs: a developer's
/// visible world is the set of projects they created or belong to.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     created_by BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE project_members (
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// # Scoping
///
/// The WHERE clauses here mirror the pure predicates in [`crate::scope`]:
/// `list_visible` applies the active-only list scope, `work_log_choices`
/// applies the broader picker scope without the `is_active` filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::models::user::Role;
use crate::scope::Viewer;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: i64,

    /// Project name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// User who created the project
    pub created_by: i64,

    /// Inactive projects are hidden from list scopes
    pub is_active: bool,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Initial member user IDs (the creator need not be listed)
    pub member_ids: Vec<i64>,
}

/// Task completion metrics for a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectMetrics {
    /// Total number of tasks in the project
    pub total_tasks: i64,

    /// Number of tasks with status "done"
    pub completed_tasks: i64,
}

impl ProjectMetrics {
    /// Completion percentage, truncated; 0 when the project has no tasks
    pub fn progress_percentage(&self) -> i64 {
        if self.total_tasks == 0 {
            return 0;
        }
        self.completed_tasks * 100 / self.total_tasks
    }
}

impl Project {
    /// Creates a new project with the acting user as creator
    ///
    /// The project row and its member rows are written in one transaction.
    pub async fn create(
        pool: &PgPool,
        viewer: &Viewer,
        data: CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_by, is_active, created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(viewer.id)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in &data.member_ids {
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(project.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(project)
    }

    /// Lists the projects in the viewer's list scope
    ///
    /// Super admins see all active projects; developers see active
    /// projects they created or belong to. Ordered newest first, so
    /// repeated calls without intervening mutations return an identical
    /// ordered set.
    pub async fn list_visible(pool: &PgPool, viewer: &Viewer) -> Result<Vec<Self>, sqlx::Error> {
        let projects = match viewer.role {
            Role::SuperAdmin => {
                sqlx::query_as::<_, Project>(
                    r#"
                    SELECT id, name, description, created_by, is_active, created_at, updated_at
                    FROM projects
                    WHERE is_active
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .fetch_all(pool)
                .await?
            }
            Role::Developer => {
                sqlx::query_as::<_, Project>(
                    r#"
                    SELECT p.id, p.name, p.description, p.created_by, p.is_active,
                           p.created_at, p.updated_at
                    FROM projects p
                    WHERE p.is_active
                      AND (p.created_by = $1 OR EXISTS (
                            SELECT 1 FROM project_members m
                            WHERE m.project_id = p.id AND m.user_id = $1))
                    ORDER BY p.created_at DESC, p.id DESC
                    "#,
                )
                .bind(viewer.id)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(projects)
    }

    /// Lists the candidate projects for a new work log
    ///
    /// Same membership rule as `list_visible` but without the `is_active`
    /// filter. This is a distinct rule, not a variant of the list scope.
    pub async fn work_log_choices(pool: &PgPool, viewer: &Viewer) -> Result<Vec<Self>, sqlx::Error> {
        let projects = match viewer.role {
            Role::SuperAdmin => {
                sqlx::query_as::<_, Project>(
                    r#"
                    SELECT id, name, description, created_by, is_active, created_at, updated_at
                    FROM projects
                    ORDER BY created_at DESC, id DESC
                    "#,
                )
                .fetch_all(pool)
                .await?
            }
            Role::Developer => {
                sqlx::query_as::<_, Project>(
                    r#"
                    SELECT p.id, p.name, p.description, p.created_by, p.is_active,
                           p.created_at, p.updated_at
                    FROM projects p
                    WHERE p.created_by = $1 OR EXISTS (
                          SELECT 1 FROM project_members m
                          WHERE m.project_id = p.id AND m.user_id = $1)
                    ORDER BY p.created_at DESC, p.id DESC
                    "#,
                )
                .bind(viewer.id)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(projects)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_by, is_active, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Checks whether a user is a member of a project
    pub async fn is_member(pool: &PgPool, project_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM project_members
                WHERE project_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists the member user IDs of a project
    pub async fn member_ids(pool: &PgPool, project_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT user_id FROM project_members
            WHERE project_id = $1
            ORDER BY user_id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// Task completion metrics for the project
    pub async fn metrics(pool: &PgPool, project_id: i64) -> Result<ProjectMetrics, sqlx::Error> {
        let metrics = sqlx::query_as::<_, ProjectMetrics>(
            r#"
            SELECT COUNT(*) AS total_tasks,
                   COUNT(*) FILTER (WHERE status = 'done') AS completed_tasks
            FROM tasks
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage_empty_project() {
        let metrics = ProjectMetrics {
            total_tasks: 0,
            completed_tasks: 0,
        };
        assert_eq!(metrics.progress_percentage(), 0);
    }

    #[test]
    fn test_progress_percentage_truncates() {
        let metrics = ProjectMetrics {
            total_tasks: 3,
            completed_tasks: 1,
        };
        assert_eq!(metrics.progress_percentage(), 33);

        let metrics = ProjectMetrics {
            total_tasks: 3,
            completed_tasks: 3,
        };
        assert_eq!(metrics.progress_percentage(), 100);
    }
}

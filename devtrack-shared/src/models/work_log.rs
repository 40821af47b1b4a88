/// Work log model and database operations
///
/// Work logs record hours a user spent on a project (and optionally a
/// specific task) on a given date. Logs are private: only the owning
/// user sees them, unless the viewer is a super admin.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE work_logs (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     task_id BIGINT REFERENCES tasks(id) ON DELETE CASCADE,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     description TEXT NOT NULL,
///     hours_spent NUMERIC(5, 2) NOT NULL DEFAULT 0 CHECK (hours_spent >= 0),
///     date DATE NOT NULL DEFAULT CURRENT_DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::models::user::Role;
use crate::scope::Viewer;

/// Work log entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkLog {
    /// Unique entry ID
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Optional task the hours were spent on
    pub task_id: Option<i64>,

    /// Project the hours were spent on
    pub project_id: i64,

    /// What was done
    pub description: String,

    /// Hours spent, non-negative, two decimal places
    pub hours_spent: Decimal,

    /// The day the work happened
    pub date: NaiveDate,

    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// When the entry was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a work log
#[derive(Debug, Clone)]
pub struct CreateWorkLog {
    /// Project the hours were spent on
    pub project_id: i64,

    /// Optional task
    pub task_id: Option<i64>,

    /// What was done
    pub description: String,

    /// Hours spent (non-negative)
    pub hours_spent: Decimal,

    /// The day the work happened
    pub date: NaiveDate,
}

impl WorkLog {
    /// Creates a work log owned by the acting user
    pub async fn create(pool: &PgPool, viewer: &Viewer, data: CreateWorkLog) -> Result<Self, sqlx::Error> {
        let log = sqlx::query_as::<_, WorkLog>(
            r#"
            INSERT INTO work_logs (user_id, task_id, project_id, description, hours_spent, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, task_id, project_id, description, hours_spent, date,
                      created_at, updated_at
            "#,
        )
        .bind(viewer.id)
        .bind(data.task_id)
        .bind(data.project_id)
        .bind(&data.description)
        .bind(data.hours_spent)
        .bind(data.date)
        .fetch_one(pool)
        .await?;

        Ok(log)
    }

    /// Lists the work logs in the viewer's scope, optionally for one date
    ///
    /// Developers see only their own logs; super admins see all. Ordered
    /// by date, then creation time, newest first.
    pub async fn list_visible(
        pool: &PgPool,
        viewer: &Viewer,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let logs = match viewer.role {
            Role::SuperAdmin => {
                sqlx::query_as::<_, WorkLog>(
                    r#"
                    SELECT id, user_id, task_id, project_id, description, hours_spent, date,
                           created_at, updated_at
                    FROM work_logs
                    WHERE ($1::DATE IS NULL OR date = $1)
                    ORDER BY date DESC, created_at DESC, id DESC
                    "#,
                )
                .bind(date)
                .fetch_all(pool)
                .await?
            }
            Role::Developer => {
                sqlx::query_as::<_, WorkLog>(
                    r#"
                    SELECT id, user_id, task_id, project_id, description, hours_spent, date,
                           created_at, updated_at
                    FROM work_logs
                    WHERE user_id = $1
                      AND ($2::DATE IS NULL OR date = $2)
                    ORDER BY date DESC, created_at DESC, id DESC
                    "#,
                )
                .bind(viewer.id)
                .bind(date)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(logs)
    }

    /// The most recent work logs of a project (for the detail page)
    pub async fn list_recent_for_project(
        pool: &PgPool,
        project_id: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let logs = sqlx::query_as::<_, WorkLog>(
            r#"
            SELECT id, user_id, task_id, project_id, description, hours_spent, date,
                   created_at, updated_at
            FROM work_logs
            WHERE project_id = $1
            ORDER BY date DESC, created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(project_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(logs)
    }
}

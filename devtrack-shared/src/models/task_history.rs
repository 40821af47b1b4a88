/// Task history model — the append-only audit trail
///
/// Every task mutation appends one row here describing what happened,
/// who did it, and the old/new value snapshots. Rows are never updated
/// or deleted; this module deliberately exposes no mutation beyond
/// `append`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE history_action AS ENUM (
///     'created', 'updated', 'status_changed', 'assigned', 'completed'
/// );
///
/// CREATE TABLE task_history (
///     id BIGSERIAL PRIMARY KEY,
///     task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     action history_action NOT NULL,
///     old_value TEXT NOT NULL DEFAULT '',
///     new_value TEXT NOT NULL DEFAULT '',
///     description TEXT NOT NULL DEFAULT '',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `append` takes any `PgExecutor`, so callers hand it the transaction
/// that carries the task write. The task row and its history row commit
/// or roll back together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// Audit action tags for task mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "history_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    /// Task was created
    Created,

    /// Task fields were edited
    Updated,

    /// Task status moved between columns
    StatusChanged,

    /// Task was reassigned
    Assigned,

    /// Task was marked done
    Completed,
}

impl HistoryAction {
    /// Converts action to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Created => "created",
            HistoryAction::Updated => "updated",
            HistoryAction::StatusChanged => "status_changed",
            HistoryAction::Assigned => "assigned",
            HistoryAction::Completed => "completed",
        }
    }

    /// Parses action from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "created" => Some(HistoryAction::Created),
            "updated" => Some(HistoryAction::Updated),
            "status_changed" => Some(HistoryAction::StatusChanged),
            "assigned" => Some(HistoryAction::Assigned),
            "completed" => Some(HistoryAction::Completed),
            _ => None,
        }
    }
}

/// One entry in a task's audit trail
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskHistory {
    /// Unique entry ID
    pub id: i64,

    /// Task this entry belongs to
    pub task_id: i64,

    /// User who performed the action
    pub user_id: i64,

    /// What happened
    pub action: HistoryAction,

    /// Snapshot of the value before the change (empty when not applicable)
    pub old_value: String,

    /// Snapshot of the value after the change (empty when not applicable)
    pub new_value: String,

    /// Human-readable summary
    pub description: String,

    /// When the entry was written
    pub created_at: DateTime<Utc>,
}

/// Input for appending a history entry
#[derive(Debug, Clone)]
pub struct AppendHistory {
    /// Task ID
    pub task_id: i64,

    /// Acting user ID
    pub user_id: i64,

    /// Action tag
    pub action: HistoryAction,

    /// Old value snapshot
    pub old_value: String,

    /// New value snapshot
    pub new_value: String,

    /// Human-readable summary
    pub description: String,
}

impl TaskHistory {
    /// Appends a new entry to a task's audit trail
    ///
    /// Pass the transaction of the task mutation as the executor so both
    /// writes are durable together.
    pub async fn append<'e, E>(executor: E, data: AppendHistory) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let entry = sqlx::query_as::<_, TaskHistory>(
            r#"
            INSERT INTO task_history (task_id, user_id, action, old_value, new_value, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, task_id, user_id, action, old_value, new_value, description, created_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(data.action)
        .bind(data.old_value)
        .bind(data.new_value)
        .bind(data.description)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    /// Lists a task's audit trail, newest first
    pub async fn list_for_task(pool: &PgPool, task_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let entries = sqlx::query_as::<_, TaskHistory>(
            r#"
            SELECT id, task_id, user_id, action, old_value, new_value, description, created_at
            FROM task_history
            WHERE task_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }

    /// Counts entries for a task
    pub async fn count_for_task(pool: &PgPool, task_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM task_history WHERE task_id = $1")
                .bind(task_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

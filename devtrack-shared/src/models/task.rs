/// Task model and the mutation + audit pipeline
///
/// Tasks belong to exactly one project and carry an assignee, a status,
/// a priority, and an optional due date. Every task mutation appends a
/// [`TaskHistory`] entry in the same transaction as the task write, so a
/// task update is never persisted without its audit record.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     assignee_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_by BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     status task_status NOT NULL DEFAULT 'todo',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Scoping
///
/// A task is visible to a developer when they are the assignee or when
/// the task's project is in their visible-projects scope. The SQL here
/// mirrors [`crate::scope::task_visible`].
///
/// # Example
///
/// ```no_run
/// use devtrack_shared::models::task::{CreateTask, StatusUpdateOutcome, Task, TaskStatus};
/// use devtrack_shared::models::user::Role;
/// use devtrack_shared::scope::Viewer;
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let viewer = Viewer::new(1, Role::Developer);
///
/// let task = Task::create(&pool, &viewer, CreateTask {
///     title: "Fix login redirect".to_string(),
///     description: String::new(),
///     project_id: 3,
///     assignee_id: 1,
///     status: TaskStatus::Todo,
///     priority: Default::default(),
///     due_date: None,
/// }).await?;
///
/// match Task::update_status(&pool, &viewer, task.id, TaskStatus::Done).await? {
///     StatusUpdateOutcome::Updated(task) => assert_eq!(task.status, TaskStatus::Done),
///     StatusUpdateOutcome::PermissionDenied => unreachable!("viewer is the assignee"),
///     StatusUpdateOutcome::NotFound => unreachable!("task was just created"),
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::models::task_history::{AppendHistory, HistoryAction, TaskHistory};
use crate::models::user::Role;
use crate::scope::{self, Viewer};

/// Kanban column of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to string for display and the status API
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Parses status from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(TaskStatus::Todo),
            "in_progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Low priority
    Low,

    /// Medium priority (the default)
    #[default]
    Medium,

    /// High priority
    High,
}

impl TaskPriority {
    /// Converts priority to string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Parses priority from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Short title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Project the task belongs to; determines its access scope
    pub project_id: i64,

    /// User the task is assigned to
    pub assignee_id: i64,

    /// User who created the task
    pub created_by: i64,

    /// Current status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task is overdue as of `today`
    ///
    /// A task with no due date is never overdue, and a done task is
    /// never overdue regardless of its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        is_overdue(self.due_date, self.status, today)
    }
}

/// Overdue rule: due date set, not done, and the due date has passed
pub fn is_overdue(due_date: Option<NaiveDate>, status: TaskStatus, today: NaiveDate) -> bool {
    match due_date {
        Some(due) => status != TaskStatus::Done && due < today,
        None => false,
    }
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Short title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Project the task belongs to
    pub project_id: i64,

    /// Assignee user ID
    pub assignee_id: i64,

    /// Initial status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

/// Optional filters applied on top of the task scope
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    /// Only tasks with this status
    pub status: Option<TaskStatus>,

    /// Only tasks in this project
    pub project_id: Option<i64>,
}

/// Outcome of a status-update attempt
///
/// A structured result rather than an error: the status API reports all
/// three cases to the caller in the response body.
#[derive(Debug, Clone)]
pub enum StatusUpdateOutcome {
    /// The task was updated and its history entry appended
    Updated(Task),

    /// The acting user is neither super admin nor the assignee
    PermissionDenied,

    /// No task with the given ID exists
    NotFound,
}

/// Counts of scoped tasks grouped by status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskStats {
    /// Total scoped tasks
    pub total: i64,

    /// Tasks in the todo column
    pub todo: i64,

    /// Tasks in progress
    pub in_progress: i64,

    /// Finished tasks
    pub done: i64,
}

impl TaskStats {
    /// The per-status counts always partition the total
    pub fn is_consistent(&self) -> bool {
        self.todo + self.in_progress + self.done == self.total
    }
}

const TASK_COLUMNS: &str = "id, title, description, project_id, assignee_id, created_by, \
                            status, priority, due_date, created_at, updated_at";

/// Scope clause for a developer viewer, over alias `t`, with the viewer
/// id bound as $1. Mirrors `scope::task_visible` with the active-only
/// visible-projects rule.
const DEV_TASK_SCOPE: &str = "(t.assignee_id = $1 OR EXISTS (
        SELECT 1 FROM projects p
        WHERE p.id = t.project_id
          AND p.is_active
          AND (p.created_by = $1 OR EXISTS (
                SELECT 1 FROM project_members m
                WHERE m.project_id = p.id AND m.user_id = $1))))";

impl Task {
    /// Creates a new task and its "created" audit entry in one transaction
    ///
    /// `created_by` is always the acting user. If either write fails the
    /// transaction rolls back and neither row exists.
    pub async fn create(pool: &PgPool, viewer: &Viewer, data: CreateTask) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, project_id, assignee_id, created_by,
                               status, priority, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, project_id, assignee_id, created_by,
                      status, priority, due_date, created_at, updated_at
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.project_id)
        .bind(data.assignee_id)
        .bind(viewer.id)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_one(&mut *tx)
        .await?;

        TaskHistory::append(
            &mut *tx,
            AppendHistory {
                task_id: task.id,
                user_id: viewer.id,
                action: HistoryAction::Created,
                old_value: String::new(),
                new_value: String::new(),
                description: format!("Task \"{}\" was created", task.title),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(task_id = task.id, user_id = viewer.id, "Task created");

        Ok(task)
    }

    /// Updates a task's status, appending the audit entry atomically
    ///
    /// The task row is locked for the duration of the transaction, so the
    /// old/new snapshot recorded in history is consistent with the write
    /// that produced it. Returns a structured outcome; permission and
    /// not-found cases leave the task and its history untouched.
    pub async fn update_status(
        pool: &PgPool,
        viewer: &Viewer,
        task_id: i64,
        new_status: TaskStatus,
    ) -> Result<StatusUpdateOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, project_id, assignee_id, created_by,
                   status, priority, due_date, created_at, updated_at
            FROM tasks
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(task_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            return Ok(StatusUpdateOutcome::NotFound);
        };

        if !scope::can_update_task_status(viewer, existing.assignee_id) {
            tracing::warn!(
                task_id,
                user_id = viewer.id,
                "Status update denied: viewer is not the assignee"
            );
            return Ok(StatusUpdateOutcome::PermissionDenied);
        }

        let old_status = existing.status;

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, project_id, assignee_id, created_by,
                      status, priority, due_date, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(new_status)
        .fetch_one(&mut *tx)
        .await?;

        TaskHistory::append(
            &mut *tx,
            AppendHistory {
                task_id,
                user_id: viewer.id,
                action: HistoryAction::StatusChanged,
                old_value: old_status.as_str().to_string(),
                new_value: new_status.as_str().to_string(),
                description: format!(
                    "Task status changed from {} to {}",
                    old_status.as_str(),
                    new_status.as_str()
                ),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            task_id,
            user_id = viewer.id,
            old_status = old_status.as_str(),
            new_status = new_status.as_str(),
            "Task status updated"
        );

        Ok(StatusUpdateOutcome::Updated(task))
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists the tasks in the viewer's scope, with optional filters
    ///
    /// Filters are applied after scoping; they can only narrow the set.
    pub async fn list_visible(
        pool: &PgPool,
        viewer: &Viewer,
        filter: TaskFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = match viewer.role {
            Role::SuperAdmin => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks t
                     WHERE ($1::task_status IS NULL OR t.status = $1)
                       AND ($2::BIGINT IS NULL OR t.project_id = $2)
                     ORDER BY t.created_at DESC, t.id DESC"
                ))
                .bind(filter.status)
                .bind(filter.project_id)
                .fetch_all(pool)
                .await?
            }
            Role::Developer => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks t
                     WHERE {DEV_TASK_SCOPE}
                       AND ($2::task_status IS NULL OR t.status = $2)
                       AND ($3::BIGINT IS NULL OR t.project_id = $3)
                     ORDER BY t.created_at DESC, t.id DESC"
                ))
                .bind(viewer.id)
                .bind(filter.status)
                .bind(filter.project_id)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Lists all tasks of a project, newest first
    pub async fn list_for_project(pool: &PgPool, project_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE project_id = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// The most recently updated tasks in the viewer's scope
    pub async fn recent(pool: &PgPool, viewer: &Viewer, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = match viewer.role {
            Role::SuperAdmin => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks t
                     ORDER BY t.updated_at DESC, t.id DESC
                     LIMIT $1"
                ))
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
            Role::Developer => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks t
                     WHERE {DEV_TASK_SCOPE}
                     ORDER BY t.updated_at DESC, t.id DESC
                     LIMIT $2"
                ))
                .bind(viewer.id)
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Overdue tasks in the viewer's scope
    ///
    /// Only todo and in-progress tasks with a due date strictly before
    /// `today` qualify; done tasks never appear here.
    pub async fn overdue(
        pool: &PgPool,
        viewer: &Viewer,
        today: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = match viewer.role {
            Role::SuperAdmin => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks t
                     WHERE t.due_date < $1
                       AND t.status IN ('todo', 'in_progress')
                     ORDER BY t.created_at DESC, t.id DESC
                     LIMIT $2"
                ))
                .bind(today)
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
            Role::Developer => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks t
                     WHERE {DEV_TASK_SCOPE}
                       AND t.due_date < $2
                       AND t.status IN ('todo', 'in_progress')
                     ORDER BY t.created_at DESC, t.id DESC
                     LIMIT $3"
                ))
                .bind(viewer.id)
                .bind(today)
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(tasks)
    }

    /// Status counts over the viewer's scoped tasks
    pub async fn stats(pool: &PgPool, viewer: &Viewer) -> Result<TaskStats, sqlx::Error> {
        let stats = match viewer.role {
            Role::SuperAdmin => {
                sqlx::query_as::<_, TaskStats>(
                    r#"
                    SELECT COUNT(*) AS total,
                           COUNT(*) FILTER (WHERE status = 'todo') AS todo,
                           COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress,
                           COUNT(*) FILTER (WHERE status = 'done') AS done
                    FROM tasks t
                    "#,
                )
                .fetch_one(pool)
                .await?
            }
            Role::Developer => {
                sqlx::query_as::<_, TaskStats>(&format!(
                    "SELECT COUNT(*) AS total,
                            COUNT(*) FILTER (WHERE t.status = 'todo') AS todo,
                            COUNT(*) FILTER (WHERE t.status = 'in_progress') AS in_progress,
                            COUNT(*) FILTER (WHERE t.status = 'done') AS done
                     FROM tasks t
                     WHERE {DEV_TASK_SCOPE}"
                ))
                .bind(viewer.id)
                .fetch_one(pool)
                .await?
            }
        };

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_round_trip() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(TaskStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::from_str("pending"), None);
        assert_eq!(TaskStatus::from_str(""), None);
    }

    #[test]
    fn test_priority_round_trip() {
        for priority in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
            assert_eq!(TaskPriority::from_str(priority.as_str()), Some(priority));
        }
        assert_eq!(TaskPriority::from_str("urgent"), None);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let status: TaskStatus = serde_json::from_str("\"todo\"").unwrap();
        assert_eq!(status, TaskStatus::Todo);
    }

    #[test]
    fn test_is_overdue_requires_due_date() {
        let today = date(2025, 8, 10);
        assert!(!is_overdue(None, TaskStatus::Todo, today));
    }

    #[test]
    fn test_is_overdue_never_for_done_tasks() {
        let today = date(2025, 8, 10);
        // Past due date, but done
        assert!(!is_overdue(Some(date(2025, 8, 1)), TaskStatus::Done, today));
    }

    #[test]
    fn test_is_overdue_past_due() {
        let today = date(2025, 8, 10);
        assert!(is_overdue(Some(date(2025, 8, 9)), TaskStatus::Todo, today));
        assert!(is_overdue(
            Some(date(2025, 8, 1)),
            TaskStatus::InProgress,
            today
        ));

        // Due today or later is not overdue
        assert!(!is_overdue(Some(date(2025, 8, 10)), TaskStatus::Todo, today));
        assert!(!is_overdue(Some(date(2025, 8, 11)), TaskStatus::Todo, today));
    }

    #[test]
    fn test_task_stats_consistency() {
        let stats = TaskStats {
            total: 6,
            todo: 3,
            in_progress: 2,
            done: 1,
        };
        assert!(stats.is_consistent());

        let broken = TaskStats {
            total: 5,
            todo: 3,
            in_progress: 2,
            done: 1,
        };
        assert!(!broken.is_consistent());
    }
}

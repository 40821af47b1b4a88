/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup via the embedded migrations
/// - Test user creation in each role
/// - JWT token generation
/// - API client helpers
///
/// These tests require a running PostgreSQL database; configuration is
/// read from the environment like the server itself (DATABASE_URL,
/// JWT_SECRET).

use devtrack_api::app::{build_router, AppState};
use devtrack_api::config::Config;
use devtrack_shared::auth::jwt::{create_token, Claims, TokenType};
use devtrack_shared::models::project::{CreateProject, Project};
use devtrack_shared::models::task::{CreateTask, Task, TaskPriority, TaskStatus};
use devtrack_shared::models::user::{CreateUser, Role, User};
use devtrack_shared::scope::Viewer;
use sqlx::PgPool;
use std::time::{SystemTime, UNIX_EPOCH};

/// Test context containing all necessary resources
///
/// Three accounts cover the access matrix: a super admin, the developer
/// the test task is assigned to, and a developer outside the project.
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub admin: User,
    pub admin_token: String,
    pub assignee: User,
    pub assignee_token: String,
    pub outsider: User,
    pub outsider_token: String,
    pub project: Project,
}

impl TestContext {
    /// Creates a new test context with a migrated database and fresh users
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../devtrack-shared/migrations").run(&db).await?;

        let suffix = unique_suffix();

        let admin = User::create(
            &db,
            CreateUser {
                username: format!("admin-{}", suffix),
                email: format!("admin-{}@example.com", suffix),
                password_hash: "test_hash".to_string(), // Not used in tests
                role: Role::SuperAdmin,
            },
        )
        .await?;

        let assignee = User::create(
            &db,
            CreateUser {
                username: format!("dev-{}", suffix),
                email: format!("dev-{}@example.com", suffix),
                password_hash: "test_hash".to_string(),
                role: Role::Developer,
            },
        )
        .await?;

        let outsider = User::create(
            &db,
            CreateUser {
                username: format!("outsider-{}", suffix),
                email: format!("outsider-{}@example.com", suffix),
                password_hash: "test_hash".to_string(),
                role: Role::Developer,
            },
        )
        .await?;

        let admin_viewer = Viewer::new(admin.id, admin.role);
        let project = Project::create(
            &db,
            &admin_viewer,
            CreateProject {
                name: format!("Test Project {}", suffix),
                description: String::new(),
                member_ids: vec![assignee.id],
            },
        )
        .await?;

        let admin_token = issue_token(&admin, &config.jwt.secret)?;
        let assignee_token = issue_token(&assignee, &config.jwt.secret)?;
        let outsider_token = issue_token(&outsider, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            admin,
            admin_token,
            assignee,
            assignee_token,
            outsider,
            outsider_token,
            project,
        })
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        // Deleting the users cascades to projects, tasks, logs, history
        sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(vec![self.admin.id, self.assignee.id, self.outsider.id])
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Returns an authorization header value for a token
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Helper to create a task in the test project, assigned to the assignee
pub async fn create_test_task(ctx: &TestContext, title: &str) -> anyhow::Result<Task> {
    let admin_viewer = Viewer::new(ctx.admin.id, ctx.admin.role);

    let task = Task::create(
        &ctx.db,
        &admin_viewer,
        CreateTask {
            title: title.to_string(),
            description: String::new(),
            project_id: ctx.project.id,
            assignee_id: ctx.assignee.id,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: None,
        },
    )
    .await?;

    Ok(task)
}

fn issue_token(user: &User, secret: &str) -> anyhow::Result<String> {
    let claims = Claims::new(user.id, user.role, TokenType::Access);
    Ok(create_token(&claims, secret)?)
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

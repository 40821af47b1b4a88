/// Database models for DevTrack
///
/// This module contains all database models and their query operations.
///
/// # Models
///
/// - `user`: User accounts and the global role switch
/// - `project`: Projects with creator + member access
/// - `task`: Tasks and the transactional mutation + audit pipeline
/// - `work_log`: Per-user work hour entries
/// - `task_history`: Append-only audit trail for task mutations
///
/// # Example
///
/// ```no_run
/// use devtrack_shared::models::user::{CreateUser, Role, User};
/// use devtrack_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "jdoe".to_string(),
///     email: "jdoe@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::Developer,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod project;
pub mod task;
pub mod task_history;
pub mod user;
pub mod work_log;

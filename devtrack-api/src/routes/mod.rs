/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, token refresh
/// - `dashboard`: Per-viewer dashboard rollup
/// - `projects`: Project list / detail / create
/// - `tasks`: Task list / create / history and the status-update API
/// - `worklogs`: Work log list / create and the project picker

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod worklogs;

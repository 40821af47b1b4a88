//! # DevTrack Shared Library
//!
//! This crate contains the data layer and business rules shared by the
//! DevTrack API server: database models, access-scoping rules, the task
//! audit pipeline, dashboard aggregation, and authentication primitives.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their query operations
//! - `scope`: Viewer identity and access-scoping rules
//! - `dashboard`: Per-viewer dashboard rollups
//! - `auth`: Password hashing, JWT tokens, auth middleware
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod dashboard;
pub mod db;
pub mod models;
pub mod scope;

/// Current version of the DevTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

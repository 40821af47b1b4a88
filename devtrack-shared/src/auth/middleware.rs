/// Bearer-token authentication context
///
/// The API server's auth layer extracts the Authorization header,
/// validates the access token, and inserts an [`AuthContext`] into the
/// request extensions. Handlers convert it into a [`Viewer`] and thread
/// that through every scoping and mutation call, so nothing downstream
/// reads ambient identity.

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_access_token, JwtError};
use crate::models::user::Role;
use crate::scope::Viewer;

/// Error type for authentication failures
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header present
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not a Bearer token
    #[error("Invalid authorization format: {0}")]
    InvalidFormat(String),

    /// Token failed validation
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),
}

/// Authenticated identity attached to the request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Role carried by the token (fail-closed parsed)
    pub role: Role,
}

impl AuthContext {
    /// The viewer identity for scoping and mutation calls
    pub fn viewer(&self) -> Viewer {
        Viewer::new(self.user_id, self.role)
    }
}

/// Authenticates a request from its headers
///
/// Expects `Authorization: Bearer <access token>`.
pub fn authenticate_bearer(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, secret)?;

    Ok(AuthContext {
        user_id: claims.sub,
        role: claims.role(),
    })
}

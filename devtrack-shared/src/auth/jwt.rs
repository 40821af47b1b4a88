/// JWT token generation and validation
///
/// Tokens are signed with HS256 and carry the user id and role. The role
/// travels as a string claim and is parsed fail-closed on the way back
/// in, so a token minted with an unknown role degrades to developer
/// visibility rather than widening it.
///
/// # Token Types
///
/// - **Access token**: 24 hours, used for API authentication
/// - **Refresh token**: 30 days, exchanged for new access tokens
///
/// # Example
///
/// ```
/// use devtrack_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
/// use devtrack_shared::models::user::Role;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, Role::Developer, TokenType::Access);
/// let token = create_token(&claims, "a-secret-key-that-is-long-enough!!")?;
///
/// let validated = validate_access_token(&token, "a-secret-key-that-is-long-enough!!")?;
/// assert_eq!(validated.sub, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::Role;

/// Issuer claim on all DevTrack tokens
const ISSUER: &str = "devtrack";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Wrong token type for this operation
    #[error("Wrong token type: expected {expected}, got {actual}")]
    WrongTokenType {
        expected: &'static str,
        actual: String,
    },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived)
    Access,

    /// Refresh token (long-lived)
    Refresh,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }

    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims for DevTrack tokens
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`) plus the user's
/// role and the token type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: i64,

    /// Issuer - always "devtrack"
    pub iss: String,

    /// Issued at (unix timestamp)
    pub iat: i64,

    /// Expiration (unix timestamp)
    pub exp: i64,

    /// Not before (unix timestamp)
    pub nbf: i64,

    /// User role as a string; parsed fail-closed on validation
    pub role: String,

    /// Access or refresh
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims for a user with the default expiration of the type
    pub fn new(user_id: i64, role: Role, token_type: TokenType) -> Self {
        let now = Utc::now();
        let expiration = token_type.default_expiration();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expiration).timestamp(),
            nbf: now.timestamp(),
            role: role.as_str().to_string(),
            token_type,
        }
    }

    /// The role carried by the token, failing closed on unknown values
    pub fn role(&self) -> Role {
        Role::from_str_or_restricted(&self.role)
    }
}

/// Creates a signed token from claims
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Validates a token's signature, expiration, and issuer
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(e.to_string()),
    })?;

    Ok(data.claims)
}

/// Validates an access token, rejecting refresh tokens
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::WrongTokenType {
            expected: "access",
            actual: claims.token_type.as_str().to_string(),
        });
    }

    Ok(claims)
}

/// Validates a refresh token, rejecting access tokens
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::WrongTokenType {
            expected: "refresh",
            actual: claims.token_type.as_str().to_string(),
        });
    }

    Ok(claims)
}

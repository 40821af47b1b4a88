/// Authentication primitives for DevTrack
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer-token extraction into an [`middleware::AuthContext`]
///
/// Authorization itself (who may see or mutate what) lives in
/// [`crate::scope`]; this module only establishes *who* is calling.

pub mod jwt;
pub mod middleware;
pub mod password;

/// Bearer token verification for incoming requests
///
/// Verification is a plain function returning a `Result`: the caller (the
/// API dispatcher) decides how to short-circuit. Nothing here writes a
/// response.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use quill_shared::auth::{jwt::issue_token, middleware::verify_request};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "secret";
/// let token = issue_token(1, "alice", 3600, secret)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     header::AUTHORIZATION,
///     HeaderValue::from_str(&format!("Bearer {}", token))?,
/// );
///
/// let identity = verify_request(&headers, secret)?;
/// assert_eq!(identity.user_id, 1);
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, Claims, JwtError};

/// Identity of the caller, decoded from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    /// Authenticated user ID
    pub user_id: i64,

    /// Authenticated username
    pub username: String,
}

impl From<Claims> for AuthIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("No authorization token provided")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("{0}")]
    InvalidFormat(String),

    /// Token failed signature or expiry checks
    #[error(transparent)]
    InvalidToken(#[from] JwtError),
}

/// Pulls the raw token out of an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Authorization header is not valid ASCII".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Bearer token is empty".to_string()));
    }

    Ok(token)
}

/// Verifies the bearer token of a request and returns the caller's identity
///
/// # Errors
///
/// Any of: missing header, wrong scheme, malformed token, bad signature,
/// expired token.
pub fn verify_request(headers: &HeaderMap, secret: &str) -> Result<AuthIdentity, AuthError> {
    let token = extract_bearer_token(headers)?;
    let claims = validate_token(token, secret)?;

    tracing::debug!(user_id = claims.user_id, "Bearer token verified");

    Ok(claims.into())
}

/// JWT token generation and validation module
///
/// This module provides JWT (JSON Web Token) functionality for user authentication.
/// Tokens are signed using HS256 (HMAC-SHA256) and carry the user's identity.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: Configurable TTL (one hour by default at the API layer)
/// - **Validation**: Signature and expiration checks, zero leeway
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// Tokens are stateless: nothing is stored server-side and there is no
/// revocation. A client discards a token by forgetting it.
///
/// # Example
///
/// ```
/// use quill_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, "alice", Duration::hours(1));
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.user_id, 42);
/// assert_eq!(validated.username, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

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

    /// Signature does not match the server secret
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// Invalid token format
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),
}

/// JWT claims structure
///
/// The payload is deliberately small and matches what clients already decode:
///
/// - `user_id`: Numeric ID of the authenticated user
/// - `username`: Username at the time of login
/// - `exp`: Expiration timestamp (Unix seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (matches `users.id`)
    pub user_id: i64,

    /// Username
    pub username: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims that expire `ttl` from now
    ///
    /// # Example
    ///
    /// ```
    /// use quill_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    ///
    /// let claims = Claims::new(1, "alice", Duration::seconds(3600));
    /// assert_eq!(claims.user_id, 1);
    /// ```
    pub fn new(user_id: i64, username: impl Into<String>, ttl: Duration) -> Self {
        let expiration = Utc::now() + ttl;

        Self {
            user_id,
            username: username.into(),
            exp: expiration.timestamp(),
        }
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 (HMAC-SHA256) with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a signed token for a freshly authenticated user
///
/// Convenience wrapper building [`Claims`] with `exp = now + ttl_seconds`.
///
/// # Example
///
/// ```
/// use quill_shared::auth::jwt::{issue_token, validate_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let token = issue_token(7, "bob", 3600, "secret")?;
/// assert_eq!(validate_token(&token, "secret")?.user_id, 7);
/// # Ok(())
/// # }
/// ```
pub fn issue_token(
    user_id: i64,
    username: &str,
    ttl_seconds: i64,
    secret: &str,
) -> Result<String, JwtError> {
    let claims = Claims::new(user_id, username, Duration::seconds(ttl_seconds));
    create_token(&claims, secret)
}

/// Validates a JWT token and extracts claims
///
/// Verifies:
/// - Signature is valid (HS256 only)
/// - `exp` is present and has not passed (no leeway)
///
/// # Errors
///
/// - `JwtError::Expired` once `exp` has passed
/// - `JwtError::InvalidSignature` when signed with another secret
/// - `JwtError::InvalidFormat` for anything that is not a decodable JWT
/// - `JwtError::ValidationError` for any other rejection
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::Expired,
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => JwtError::InvalidFormat(e.to_string()),
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

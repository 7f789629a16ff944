/// Authentication utilities
///
/// This module provides the authentication primitives for Quill:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and length validation
/// - [`jwt`]: JWT token issuance and validation
/// - [`middleware`]: Bearer token extraction and request verification
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with configurable expiration
/// - **Stateless**: Tokens are never stored server-side
///
/// # Example
///
/// ```
/// use quill_shared::auth::password::{hash_password, verify_password};
/// use quill_shared::auth::jwt::{issue_token, validate_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // JWT token issuance
/// let secret = "secret-key-at-least-32-bytes-long!!";
/// let token = issue_token(1, "alice", 3600, secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.username, "alice");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;

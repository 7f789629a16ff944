/// User model and repository
///
/// Users are created by registration and read by login. This system never
/// updates or deletes them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(255) NOT NULL UNIQUE,
///     password VARCHAR(255) NOT NULL,   -- argon2id PHC string
///     email VARCHAR(255) NOT NULL
/// );
/// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::password::{hash_password, PasswordError};

/// Name of the unique constraint on `users.username`
pub const USERNAME_CONSTRAINT: &str = "users_username_key";

/// A registered user
///
/// `password` holds the Argon2id hash, never plaintext, and is never
/// serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Auto-assigned user ID
    pub id: i64,

    /// Unique username
    pub username: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password: String,

    /// Email address
    pub email: String,
}

/// Registration input
///
/// `password` is the plaintext from the registration request. The repository
/// hashes it before the insert; it does not outlive the call.
#[derive(Clone, Deserialize)]
pub struct CreateUser {
    /// Desired username
    pub username: String,

    /// Plaintext password
    pub password: String,

    /// Email address
    pub email: String,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

/// Error type for user persistence
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Another user already has this username
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    /// Password could not be hashed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage operations on users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks a user up by username. Absence is `Ok(None)`, not an error.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Hashes the password, inserts the user and returns the new ID
    async fn create(&self, data: CreateUser) -> Result<i64, UserError>;
}

/// PostgreSQL-backed [`UserRepository`]
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Wraps a connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, email
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, data: CreateUser) -> Result<i64, UserError> {
        let CreateUser {
            username,
            password,
            email,
        } = data;

        // Argon2 is CPU-bound; run it off the executor
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))??;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO users (username, password, email)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&username)
        .bind(password_hash)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &username))?;

        tracing::info!(user_id = id, username = %username, "User created");

        Ok(id)
    }
}

fn map_unique_violation(err: sqlx::Error, username: &str) -> UserError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some(USERNAME_CONSTRAINT) {
            return UserError::UsernameTaken(username.to_string());
        }
    }
    UserError::Database(err)
}

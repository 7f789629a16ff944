/// Database models for Quill
///
/// Each model comes with a repository trait and its PostgreSQL
/// implementation. Handlers depend on the traits only, so the API can be
/// exercised against in-memory stores in tests.
///
/// # Models
///
/// - `user`: Registered accounts
/// - `article`: Articles and owner-scoped mutation
///
/// # Example
///
/// ```no_run
/// use quill_shared::db::pool::{create_pool, DatabaseConfig};
/// use quill_shared::models::user::{CreateUser, PgUserRepository, UserRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let users = PgUserRepository::new(pool);
///
/// let id = users
///     .create(CreateUser {
///         username: "alice".to_string(),
///         password: "secret1".to_string(),
///         email: "alice@example.com".to_string(),
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```

pub mod article;
pub mod user;

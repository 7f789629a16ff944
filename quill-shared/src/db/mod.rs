/// Database layer for Quill
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Embedded schema migrations
///
/// Repositories live next to their models in the `models` module.

pub mod migrations;
pub mod pool;

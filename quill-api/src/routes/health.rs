/// Health check endpoint
///
/// Provides a simple health check endpoint that verifies:
/// - The server is running
/// - Database connectivity
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "pool": {"active_connections": 0, "idle_connections": 1, "total_connections": 1}
/// }
/// ```
///
/// This is an operational endpoint and is not wrapped in the response
/// envelope.

use crate::app::AppState;
use axum::{extract::State, Json};
use quill_shared::db::pool::{self, PoolStats};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status: `healthy` or `degraded`
    pub status: String,

    /// Application version
    pub version: String,

    /// `connected`, `disconnected` or `not configured`
    pub database: String,

    /// Pool usage, when a pool is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (database, stats) = match &state.db {
        Some(db) => {
            let database = match pool::health_check(db).await {
                Ok(()) => "connected",
                Err(err) => {
                    tracing::warn!(error = %err, "Health check could not reach the database");
                    "disconnected"
                }
            };
            (database, Some(pool::get_pool_stats(db)))
        }
        None => ("not configured", None),
    };

    Json(HealthResponse {
        status: if database == "disconnected" {
            "degraded".to_string()
        } else {
            "healthy".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        pool: stats,
    })
}

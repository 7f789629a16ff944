/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use quill_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = quill_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, dispatch, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{any, get},
    Router,
};
use quill_shared::models::{
    article::{ArticleRepository, PgArticleRepository},
    user::{PgUserRepository, UserRepository},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; every field is
/// behind an `Arc` or is itself a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// User storage
    pub users: Arc<dyn UserRepository>,

    /// Article storage
    pub articles: Arc<dyn ArticleRepository>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Pool behind the repositories, for health reporting
    pub db: Option<PgPool>,
}

impl AppState {
    /// Creates state backed by PostgreSQL repositories on `db`
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            articles: Arc::new(PgArticleRepository::new(db.clone())),
            config: Arc::new(config),
            db: Some(db),
        }
    }

    /// Creates state over arbitrary repositories
    pub fn with_repositories(
        users: Arc<dyn UserRepository>,
        articles: Arc<dyn ArticleRepository>,
        config: Config,
    ) -> Self {
        Self {
            users,
            articles,
            config: Arc::new(config),
            db: None,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health      # Health check (not enveloped)
/// ├── ANY /?path=...   # Dispatcher, target in the query string
/// └── ANY /*path       # Dispatcher, target in the URL path
/// ```
///
/// See [`crate::dispatch`] for the resource table.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. `Content-Type: application/json; charset=utf-8`
pub fn build_router(state: AppState) -> Router {
    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/", any(dispatch::entry))
        .route("/*path", any(dispatch::entry))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        ))
        .with_state(state)
}

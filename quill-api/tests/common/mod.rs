//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - In-memory user and article repositories
//! - A router wired to them with a fixed test configuration
//! - Request and registration helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use quill_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, DatabaseConfig, JwtConfig},
};
use quill_shared::{
    auth::password::hash_password,
    models::{
        article::{ensure_owner, Article, ArticleError, ArticleRepository, PaginatedArticles, Pagination},
        user::{CreateUser, User, UserError, UserRepository},
    },
};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Users kept in a vector
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, data: CreateUser) -> Result<i64, UserError> {
        let password = hash_password(&data.password)?;
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.username == data.username) {
            return Err(UserError::UsernameTaken(data.username));
        }

        let id = users.len() as i64 + 1;
        users.push(User {
            id,
            username: data.username,
            password,
            email: data.email,
        });
        Ok(id)
    }
}

/// Articles kept in a vector, with a call counter
#[derive(Default)]
pub struct InMemoryArticles {
    articles: Mutex<Vec<Article>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
}

impl InMemoryArticles {
    /// Number of repository calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Inserts an article directly, bypassing the API
    pub fn seed(&self, title: &str, owner_id: i64) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let mut articles = self.articles.lock().unwrap();
        // Strictly increasing timestamps keep the newest-first order stable
        articles.push(Article {
            id,
            title: title.to_string(),
            content: format!("Content of {}", title),
            user_id: owner_id,
            created_at: Utc::now() + Duration::milliseconds(id),
        });
        id
    }

    fn sorted(&self) -> Vec<Article> {
        let mut articles = self.articles.lock().unwrap().clone();
        articles.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        articles
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn find(&self, id: i64) -> Option<Article> {
        self.articles.lock().unwrap().iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticles {
    async fn get_all_articles(&self) -> Result<Vec<Article>, ArticleError> {
        self.touch();
        Ok(self.sorted())
    }

    async fn get_article(&self, id: i64) -> Result<Option<Article>, ArticleError> {
        self.touch();
        Ok(self.find(id))
    }

    async fn get_articles_with_pagination(
        &self,
        page: i64,
        per_page: i64,
    ) -> Result<PaginatedArticles, ArticleError> {
        self.touch();
        let all = self.sorted();
        let metadata = Pagination::new(page, per_page, all.len() as i64);
        let data = all
            .into_iter()
            .skip(metadata.offset() as usize)
            .take(metadata.per_page as usize)
            .collect();
        Ok(PaginatedArticles { metadata, data })
    }

    async fn create_article(
        &self,
        title: &str,
        content: &str,
        owner_id: i64,
    ) -> Result<i64, ArticleError> {
        self.touch();
        let id = self.seed(title, owner_id);
        let mut articles = self.articles.lock().unwrap();
        if let Some(article) = articles.iter_mut().find(|a| a.id == id) {
            article.content = content.to_string();
        }
        Ok(id)
    }

    async fn update_article(
        &self,
        id: i64,
        title: &str,
        content: &str,
        acting_user_id: i64,
    ) -> Result<bool, ArticleError> {
        self.touch();
        ensure_owner(self.find(id).as_ref(), id, acting_user_id)?;

        let mut articles = self.articles.lock().unwrap();
        match articles
            .iter_mut()
            .find(|a| a.id == id && a.user_id == acting_user_id)
        {
            Some(article) => {
                article.title = title.to_string();
                article.content = content.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_article(&self, id: i64, acting_user_id: i64) -> Result<bool, ArticleError> {
        self.touch();
        ensure_owner(self.find(id).as_ref(), id, acting_user_id)?;

        let mut articles = self.articles.lock().unwrap();
        let before = articles.len();
        articles.retain(|a| !(a.id == id && a.user_id == acting_user_id));
        Ok(articles.len() < before)
    }
}

/// A decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: Router,
    pub config: Config,
    pub users: Arc<InMemoryUsers>,
    pub articles: Arc<InMemoryArticles>,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://localhost/quill_test".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            expire_seconds: 3600,
        },
    }
}

impl TestContext {
    /// Creates a context with empty stores
    pub fn new() -> Self {
        let config = test_config();
        let users = Arc::new(InMemoryUsers::default());
        let articles = Arc::new(InMemoryArticles::default());

        let state = AppState::with_repositories(users.clone(), articles.clone(), config.clone());
        let app = build_router(state);

        Self {
            app,
            config,
            users,
            articles,
        }
    }

    /// Sends one request through the router
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Registers `username` with a fixed password and returns a bearer token
    pub async fn register_and_login(&self, username: &str) -> (i64, String) {
        let registered = self
            .request(
                Method::POST,
                "/auth/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "password": "secret1",
                    "email": format!("{}@example.com", username),
                })),
            )
            .await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);
        let user_id = registered.body["data"]["user_id"].as_i64().unwrap();

        let login = self
            .request(
                Method::POST,
                "/auth/login",
                None,
                Some(serde_json::json!({"username": username, "password": "secret1"})),
            )
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);
        let token = login.body["data"]["token"].as_str().unwrap().to_string();

        (user_id, token)
    }
}

/// Article endpoints
///
/// ```text
/// GET    articles[?page=&perPage=]   index
/// GET    articles/{id}               show
/// POST   articles                    store   (auth)
/// PUT    articles/{id}               update  (auth, owner)
/// DELETE articles/{id}               delete  (auth, owner)
/// ```
///
/// Reads are public. Writes receive the caller's [`AuthIdentity`] from the
/// dispatcher; ownership is enforced by the repository.

use std::collections::HashMap;

use axum::{http::StatusCode, response::Response};
use quill_shared::{auth::middleware::AuthIdentity, models::article::DEFAULT_PER_PAGE};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{is_blank, parse_body, validation_message};
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response,
};

/// Body of `store` and `update`
#[derive(Debug, Deserialize, Validate)]
pub struct ArticleRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: String,

    #[serde(default)]
    pub content: String,
}

impl ArticleRequest {
    fn check(&self) -> ApiResult<()> {
        if is_blank(&self.title) || is_blank(&self.content) {
            return Err(ApiError::BadRequest(
                "Title and content are required".to_string(),
            ));
        }

        self.validate()
            .map_err(|e| ApiError::BadRequest(validation_message(&e)))
    }
}

/// `data` of a successful `store`
#[derive(Debug, Serialize)]
pub struct CreatedArticle {
    pub id: i64,
}

fn query_number(query: &HashMap<String, String>, key: &str) -> ApiResult<Option<i64>> {
    query
        .get(key)
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid {} parameter", key)))
        })
        .transpose()
}

/// Lists articles, newest first
///
/// Without `page` or `perPage` the full list is returned as `data`. With
/// either, `data` is `{metadata, data}` for that page; `page` defaults to 1
/// and `perPage` to 10.
pub async fn index(state: &AppState, query: &HashMap<String, String>) -> ApiResult<Response> {
    let page = query_number(query, "page")?;
    let per_page = query_number(query, "perPage")?;

    if page.is_none() && per_page.is_none() {
        let articles = state.articles.get_all_articles().await?;
        return Ok(response::ok(articles, "Articles retrieved"));
    }

    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);
    if per_page < 1 {
        return Err(ApiError::BadRequest(
            "perPage must be at least 1".to_string(),
        ));
    }

    let page = state
        .articles
        .get_articles_with_pagination(page.unwrap_or(1), per_page)
        .await?;

    Ok(response::ok(page, "Articles retrieved"))
}

/// Fetches one article
pub async fn show(state: &AppState, id: i64) -> ApiResult<Response> {
    let article = state
        .articles
        .get_article(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Article not found".to_string()))?;

    Ok(response::ok(article, "Article found"))
}

/// Creates an article owned by the caller
pub async fn store(state: &AppState, identity: AuthIdentity, body: &[u8]) -> ApiResult<Response> {
    let request: ArticleRequest = parse_body(body)?;
    request.check()?;

    let id = state
        .articles
        .create_article(&request.title, &request.content, identity.user_id)
        .await?;

    Ok(response::created(CreatedArticle { id }, "Article created"))
}

/// Replaces title and content of an article the caller owns
pub async fn update(
    state: &AppState,
    identity: AuthIdentity,
    id: i64,
    body: &[u8],
) -> ApiResult<Response> {
    if state.articles.get_article(id).await?.is_none() {
        return Err(ApiError::NotFound("Article not found".to_string()));
    }

    let request: ArticleRequest = parse_body(body)?;
    request.check()?;

    let updated = state
        .articles
        .update_article(id, &request.title, &request.content, identity.user_id)
        .await?;

    if !updated {
        return Err(ApiError::NotFound("Article not found".to_string()));
    }

    Ok(response::message(StatusCode::OK, "Article updated"))
}

/// Deletes an article the caller owns
pub async fn delete(state: &AppState, identity: AuthIdentity, id: i64) -> ApiResult<Response> {
    if state.articles.get_article(id).await?.is_none() {
        return Err(ApiError::NotFound("Article not found".to_string()));
    }

    let deleted = state.articles.delete_article(id, identity.user_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Article not found".to_string()));
    }

    Ok(response::message(StatusCode::NO_CONTENT, "Article deleted"))
}

/// Article model and repository
///
/// Articles are readable by anyone. Updates and deletes are owner-scoped:
/// the repository re-reads the row, checks `user_id` against the acting
/// user, and then runs a statement filtered by both `id` and `user_id`, so
/// a row whose owner changed between the check and the write is left alone.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE articles (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     content TEXT NOT NULL,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use quill_shared::models::article::{ArticleRepository, PgArticleRepository};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let articles = PgArticleRepository::new(pool);
///
/// let id = articles.create_article("Hello", "First post", 1).await?;
/// let page = articles.get_articles_with_pagination(1, 10).await?;
/// assert!(page.metadata.total_items >= 1);
///
/// articles.update_article(id, "Hello again", "Edited", 1).await?;
/// articles.delete_article(id, 1).await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Page size used when a client asks for a page without `perPage`
pub const DEFAULT_PER_PAGE: i64 = 10;

/// An article row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    /// Auto-assigned article ID
    pub id: i64,

    /// Title, never empty
    pub title: String,

    /// Body, never empty
    pub content: String,

    /// Owner (`users.id`), fixed at creation
    pub user_id: i64,

    /// Server-assigned creation time
    pub created_at: DateTime<Utc>,
}

/// Pagination metadata returned alongside a page of articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// Computes page metadata for `total_items` rows
    ///
    /// `page` is clamped to at least 1 and `per_page` to at least 1.
    ///
    /// ```
    /// use quill_shared::models::article::Pagination;
    ///
    /// let p = Pagination::new(2, 5, 12);
    /// assert_eq!(p.total_pages, 3);
    /// assert!(p.has_next_page);
    /// assert!(p.has_prev_page);
    /// assert_eq!(p.offset(), 5);
    /// ```
    pub fn new(page: i64, per_page: i64, total_items: i64) -> Self {
        let current_page = page.max(1);
        let per_page = per_page.max(1);
        let total_items = total_items.max(0);
        let total_pages = total_items / per_page + i64::from(total_items % per_page != 0);

        Self {
            current_page,
            per_page,
            total_items,
            total_pages,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }

    /// Rows to skip before this page starts
    pub fn offset(&self) -> i64 {
        (self.current_page - 1).saturating_mul(self.per_page)
    }
}

/// One page of articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedArticles {
    pub metadata: Pagination,
    pub data: Vec<Article>,
}

/// Error type for article persistence
#[derive(Debug, thiserror::Error)]
pub enum ArticleError {
    /// No article with this ID
    #[error("Article {0} not found")]
    NotFound(i64),

    /// The acting user does not own the article
    #[error("User {user_id} does not own article {article_id}")]
    Forbidden { article_id: i64, user_id: i64 },

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Checks that `acting_user_id` owns the freshly read `article`
///
/// Shared by every [`ArticleRepository`] so the rule is identical across
/// stores.
pub fn ensure_owner(
    article: Option<&Article>,
    article_id: i64,
    acting_user_id: i64,
) -> Result<(), ArticleError> {
    match article {
        None => Err(ArticleError::NotFound(article_id)),
        Some(article) if article.user_id != acting_user_id => Err(ArticleError::Forbidden {
            article_id,
            user_id: acting_user_id,
        }),
        Some(_) => Ok(()),
    }
}

/// Storage operations on articles
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// All articles, newest first
    async fn get_all_articles(&self) -> Result<Vec<Article>, ArticleError>;

    /// One article by ID. Absence is `Ok(None)`, not an error.
    async fn get_article(&self, id: i64) -> Result<Option<Article>, ArticleError>;

    /// One page of articles, newest first, with metadata
    async fn get_articles_with_pagination(
        &self,
        page: i64,
        per_page: i64,
    ) -> Result<PaginatedArticles, ArticleError>;

    /// Inserts an article owned by `owner_id` and returns its ID
    async fn create_article(
        &self,
        title: &str,
        content: &str,
        owner_id: i64,
    ) -> Result<i64, ArticleError>;

    /// Replaces title and content if `acting_user_id` owns the article
    async fn update_article(
        &self,
        id: i64,
        title: &str,
        content: &str,
        acting_user_id: i64,
    ) -> Result<bool, ArticleError>;

    /// Deletes the article if `acting_user_id` owns it
    async fn delete_article(&self, id: i64, acting_user_id: i64) -> Result<bool, ArticleError>;
}

/// PostgreSQL-backed [`ArticleRepository`]
#[derive(Debug, Clone)]
pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    /// Wraps a connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self) -> Result<i64, ArticleError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn get_all_articles(&self) -> Result<Vec<Article>, ArticleError> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, user_id, created_at
            FROM articles
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }

    async fn get_article(&self, id: i64) -> Result<Option<Article>, ArticleError> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, user_id, created_at
            FROM articles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(article)
    }

    async fn get_articles_with_pagination(
        &self,
        page: i64,
        per_page: i64,
    ) -> Result<PaginatedArticles, ArticleError> {
        let total = self.count().await?;
        let metadata = Pagination::new(page, per_page, total);

        let data = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, user_id, created_at
            FROM articles
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(metadata.per_page)
        .bind(metadata.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedArticles { metadata, data })
    }

    async fn create_article(
        &self,
        title: &str,
        content: &str,
        owner_id: i64,
    ) -> Result<i64, ArticleError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO articles (title, content, user_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(article_id = id, user_id = owner_id, "Article created");

        Ok(id)
    }

    async fn update_article(
        &self,
        id: i64,
        title: &str,
        content: &str,
        acting_user_id: i64,
    ) -> Result<bool, ArticleError> {
        let current = self.get_article(id).await?;
        ensure_owner(current.as_ref(), id, acting_user_id)?;

        let result = sqlx::query(
            r#"
            UPDATE articles
            SET title = $2,
                content = $3
            WHERE id = $1 AND user_id = $4
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(acting_user_id)
        .execute(&self.pool)
        .await?;

        tracing::info!(article_id = id, user_id = acting_user_id, "Article updated");

        Ok(result.rows_affected() > 0)
    }

    async fn delete_article(&self, id: i64, acting_user_id: i64) -> Result<bool, ArticleError> {
        let current = self.get_article(id).await?;
        ensure_owner(current.as_ref(), id, acting_user_id)?;

        let result = sqlx::query("DELETE FROM articles WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(acting_user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(article_id = id, user_id = acting_user_id, "Article deleted");

        Ok(result.rows_affected() > 0)
    }
}

//! PostgreSQL implementation of the short URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_slug;

/// Row shape shared by every query returning a full record.
#[derive(sqlx::FromRow)]
struct ShortUrlRow {
    id: i64,
    slug: String,
    destination_url: String,
    created_at: DateTime<Utc>,
    last_accessed_at: Option<DateTime<Utc>>,
    hit_count: i64,
    expires_at: Option<DateTime<Utc>>,
}

impl From<ShortUrlRow> for ShortUrl {
    fn from(row: ShortUrlRow) -> Self {
        ShortUrl::new(
            row.id,
            row.slug,
            row.destination_url,
            row.created_at,
            row.last_accessed_at,
            row.hit_count,
            row.expires_at,
        )
    }
}

/// PostgreSQL repository for short URL storage and retrieval.
///
/// The `short_urls_slug_key` unique constraint enforces slug uniqueness
/// atomically; creation races surface as [`AppError::SlugConflict`].
pub struct PgShortUrlRepository {
    pool: Arc<PgPool>,
}

impl PgShortUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortUrlRepository for PgShortUrlRepository {
    async fn insert(&self, new_short_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            INSERT INTO short_urls (slug, destination_url, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, slug, destination_url, created_at, last_accessed_at, hit_count, expires_at
            "#,
        )
        .bind(&new_short_url.slug)
        .bind(&new_short_url.destination_url)
        .bind(new_short_url.expires_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_slug(&e) {
                AppError::slug_conflict(&new_short_url.slug)
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row.into())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM short_urls WHERE slug = $1)",
        )
        .bind(slug)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            SELECT id, slug, destination_url, created_at, last_accessed_at, hit_count, expires_at
            FROM short_urls
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortUrl::from))
    }

    async fn record_hit(
        &self,
        slug: &str,
        accessed_at: DateTime<Utc>,
    ) -> Result<Option<ShortUrl>, AppError> {
        let row = sqlx::query_as::<_, ShortUrlRow>(
            r#"
            UPDATE short_urls
            SET hit_count = hit_count + 1, last_accessed_at = $2
            WHERE slug = $1
            RETURNING id, slug, destination_url, created_at, last_accessed_at, hit_count, expires_at
            "#,
        )
        .bind(slug)
        .bind(accessed_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortUrl::from))
    }
}

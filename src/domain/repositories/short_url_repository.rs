//! Repository trait for short URL data access.

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Store interface for short URL records.
///
/// Implementations must enforce slug uniqueness atomically (a unique
/// constraint, not an application-level check); the service's existence
/// pre-check is only an optimization. All cross-request shared state lives
/// behind this trait.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Inserts a new record, assigning `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SlugConflict`] if the slug is already taken,
    /// including when this insert loses a concurrent creation race.
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_short_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Returns whether a record with the given slug exists.
    ///
    /// Advisory only; a record may appear between this check and a
    /// subsequent [`Self::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError>;

    /// Finds a record by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Atomically increments `hit_count` and sets `last_accessed_at`.
    ///
    /// The increment happens store-side so concurrent hits on the same slug
    /// are never lost. Returns the updated record, or `None` when the slug
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_hit(
        &self,
        slug: &str,
        accessed_at: DateTime<Utc>,
    ) -> Result<Option<ShortUrl>, AppError>;
}

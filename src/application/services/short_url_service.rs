//! Short URL lifecycle service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;
use crate::utils::base_url::is_loopback_base;
use crate::utils::slug_generator::{generate_slug, validate_custom_slug};
use crate::utils::url_normalizer::normalize_destination;

/// Default length for generated slugs.
pub const DEFAULT_SLUG_LENGTH: usize = 8;

/// Settings for slug generation and public URL construction.
#[derive(Debug, Clone)]
pub struct ShortenerConfig {
    /// Base URL for public short links. When absent or pointing at a
    /// loopback host, the base is derived from the inbound request instead.
    pub base_url: Option<String>,
    /// Length of generated slugs. Must be positive; validated at startup.
    pub slug_length: usize,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            slug_length: DEFAULT_SLUG_LENGTH,
        }
    }
}

/// Service orchestrating the short URL lifecycle.
///
/// Owns all invariants: destination validation, slug allocation with
/// uniqueness enforcement, expiry semantics, and hit tracking. The store's
/// unique constraint is the authority on slug uniqueness; every check done
/// here first is an optimization with an acknowledged race window.
pub struct ShortUrlService<R: ShortUrlRepository> {
    repository: Arc<R>,
    config: ShortenerConfig,
}

impl<R: ShortUrlRepository> ShortUrlService<R> {
    /// Creates a new service over the given store.
    pub fn new(repository: Arc<R>, config: ShortenerConfig) -> Self {
        Self { repository, config }
    }

    /// Creates a short URL for a destination.
    ///
    /// # Slug Resolution
    ///
    /// - A custom slug is trimmed and validated (3-64 chars, `[A-Za-z0-9_-]`),
    ///   then used as-is; there is no retry for custom slugs.
    /// - Otherwise a random slug of the configured length is generated, with
    ///   up to 10 attempts to find an unused candidate.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidDestination`] kinds for an invalid
    /// destination URL, [`AppError::InvalidSlug`] for a bad custom slug,
    /// [`AppError::InvalidExpiry`] when `expires_at` is not strictly in the
    /// future, and [`AppError::SlugConflict`] when the slug is taken, whether
    /// caught by the pre-check or by the store's unique constraint.
    pub async fn create_short_url(
        &self,
        destination_url: &str,
        custom_slug: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShortUrl, AppError> {
        let destination = normalize_destination(destination_url)?;
        let slug = self.determine_slug(custom_slug).await?;

        if let Some(expiry) = expires_at {
            if expiry <= Utc::now() {
                return Err(AppError::invalid_expiry(expiry));
            }
        }

        // Advisory pre-check; the unique constraint remains the authority.
        if self.repository.exists_by_slug(&slug).await? {
            return Err(AppError::slug_conflict(slug));
        }

        let created = self
            .repository
            .insert(NewShortUrl {
                slug,
                destination_url: destination,
                expires_at,
            })
            .await?;

        info!(
            slug = %created.slug,
            destination = %created.destination_url,
            expires_at = ?created.expires_at,
            "created short URL"
        );

        Ok(created)
    }

    /// Retrieves a short URL by slug for display.
    ///
    /// Never checks expiry and never mutates: expired records remain
    /// inspectable, and two consecutive calls return identical records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches the slug.
    pub async fn get_short_url(&self, slug: &str) -> Result<ShortUrl, AppError> {
        self.repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found(slug))
    }

    /// Registers a redirect hit and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is unknown and
    /// [`AppError::Expired`] when the record has passed its expiry, in which
    /// case nothing is mutated.
    pub async fn register_hit(&self, slug: &str) -> Result<ShortUrl, AppError> {
        let short_url = self.get_short_url(slug).await?;

        if short_url.is_expired() {
            return Err(AppError::expired(slug));
        }

        let updated = self
            .repository
            .record_hit(slug, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found(slug))?;

        info!(
            slug = %updated.slug,
            destination = %updated.destination_url,
            total_hits = updated.hit_count,
            "hit short URL"
        );

        Ok(updated)
    }

    /// Builds the public URL for a slug.
    ///
    /// Prefers the configured base URL unless it points at a loopback host,
    /// in which case the request-derived base is used so that clients never
    /// receive links built from a local-dev default. Falls back to the
    /// configured base, then to the bare slug, when no request base is
    /// available.
    pub fn public_short_url(&self, slug: &str, request_base: Option<&str>) -> String {
        let configured = self
            .config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty());

        let base = match configured {
            Some(base) if !is_loopback_base(base) => Some(base),
            _ => request_base.or(configured),
        };

        match base {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), slug),
            None => slug.to_string(),
        }
    }

    async fn determine_slug(&self, custom_slug: Option<String>) -> Result<String, AppError> {
        match custom_slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(requested) => {
                validate_custom_slug(requested)?;
                Ok(requested.to_string())
            }
            None => self.generate_unique_slug().await,
        }
    }

    /// Generates an unused slug with collision retry.
    ///
    /// With a 62-symbol alphabet and length 8 a collision is vanishingly
    /// rare; the attempt cap bounds worst-case latency all the same.
    async fn generate_unique_slug(&self) -> Result<String, AppError> {
        const MAX_ATTEMPTS: usize = 10;

        for _ in 0..MAX_ATTEMPTS {
            let candidate = generate_slug(self.config.slug_length);

            if !self.repository.exists_by_slug(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(AppError::internal(
            "Failed to generate a unique slug",
            json!({ "attempts": MAX_ATTEMPTS }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockShortUrlRepository;
    use chrono::Duration;

    fn sample_short_url(id: i64, slug: &str, url: &str) -> ShortUrl {
        ShortUrl::new(id, slug.to_string(), url.to_string(), Utc::now(), None, 0, None)
    }

    fn service(repo: MockShortUrlRepository) -> ShortUrlService<MockShortUrlRepository> {
        ShortUrlService::new(Arc::new(repo), ShortenerConfig::default())
    }

    #[tokio::test]
    async fn test_create_with_generated_slug() {
        let mut repo = MockShortUrlRepository::new();

        repo.expect_exists_by_slug().times(2).returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|new| {
                new.slug.len() == DEFAULT_SLUG_LENGTH
                    && new.slug.chars().all(|c| c.is_ascii_alphanumeric())
                    && new.destination_url == "https://example.com/"
            })
            .times(1)
            .returning(|new| {
                Ok(ShortUrl::new(
                    10,
                    new.slug,
                    new.destination_url,
                    Utc::now(),
                    None,
                    0,
                    new.expires_at,
                ))
            });

        let result = service(repo)
            .create_short_url("https://example.com", None, None)
            .await;

        assert!(result.is_ok());
        let created = result.unwrap();
        assert_eq!(created.destination_url, "https://example.com/");
        assert_eq!(created.hit_count, 0);
    }

    #[tokio::test]
    async fn test_create_with_custom_slug() {
        let mut repo = MockShortUrlRepository::new();

        repo.expect_exists_by_slug()
            .withf(|slug| slug == "my-slug")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|new| new.slug == "my-slug")
            .times(1)
            .returning(|new| {
                Ok(ShortUrl::new(
                    1,
                    new.slug,
                    new.destination_url,
                    Utc::now(),
                    None,
                    0,
                    None,
                ))
            });

        let result = service(repo)
            .create_short_url("https://example.com", Some("  my-slug  ".to_string()), None)
            .await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().slug, "my-slug");
    }

    #[tokio::test]
    async fn test_create_custom_slug_too_short() {
        let repo = MockShortUrlRepository::new();

        let result = service(repo)
            .create_short_url("https://example.com", Some("ab".to_string()), None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidSlug { .. }));
    }

    #[tokio::test]
    async fn test_create_custom_slug_bad_alphabet() {
        let repo = MockShortUrlRepository::new();

        let result = service(repo)
            .create_short_url("https://example.com", Some("bad slug!".to_string()), None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidSlug { .. }));
    }

    #[tokio::test]
    async fn test_create_custom_slug_taken() {
        let mut repo = MockShortUrlRepository::new();

        repo.expect_exists_by_slug()
            .withf(|slug| slug == "taken123")
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_insert().times(0);

        let result = service(repo)
            .create_short_url("https://example.com", Some("taken123".to_string()), None)
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::SlugConflict { slug } if slug == "taken123"
        ));
    }

    #[tokio::test]
    async fn test_create_conflict_from_insert_race() {
        let mut repo = MockShortUrlRepository::new();

        // Pre-check misses the racing writer; the unique constraint catches it.
        repo.expect_exists_by_slug().times(1).returning(|_| Ok(false));
        repo.expect_insert()
            .times(1)
            .returning(|new| Err(AppError::slug_conflict(new.slug)));

        let result = service(repo)
            .create_short_url("https://example.com", Some("raced123".to_string()), None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::SlugConflict { .. }));
    }

    #[tokio::test]
    async fn test_create_invalid_destination() {
        let repo = MockShortUrlRepository::new();

        let result = service(repo)
            .create_short_url("not a url", None, None)
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::InvalidDestination(_)
        ));
    }

    #[tokio::test]
    async fn test_create_expiry_in_past() {
        let repo = MockShortUrlRepository::new();

        let result = service(repo)
            .create_short_url(
                "https://example.com",
                Some("abc12345".to_string()),
                Some(Utc::now() - Duration::hours(1)),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidExpiry { .. }));
    }

    #[tokio::test]
    async fn test_create_expiry_in_future() {
        let mut repo = MockShortUrlRepository::new();
        let expiry = Utc::now() + Duration::hours(1);

        repo.expect_exists_by_slug().times(1).returning(|_| Ok(false));
        repo.expect_insert()
            .withf(move |new| new.expires_at == Some(expiry))
            .times(1)
            .returning(|new| {
                Ok(ShortUrl::new(
                    1,
                    new.slug,
                    new.destination_url,
                    Utc::now(),
                    None,
                    0,
                    new.expires_at,
                ))
            });

        let result = service(repo)
            .create_short_url(
                "https://example.com",
                Some("abc12345".to_string()),
                Some(expiry),
            )
            .await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().expires_at, Some(expiry));
    }

    #[tokio::test]
    async fn test_generated_slug_retries_on_collision() {
        let mut repo = MockShortUrlRepository::new();
        let mut calls = 0;

        // First two candidates collide, the third is free; the fourth call
        // is the advisory pre-check before insert.
        repo.expect_exists_by_slug().times(4).returning(move |_| {
            calls += 1;
            Ok(calls <= 2)
        });
        repo.expect_insert().times(1).returning(|new| {
            Ok(ShortUrl::new(
                1,
                new.slug,
                new.destination_url,
                Utc::now(),
                None,
                0,
                None,
            ))
        });

        let result = service(repo)
            .create_short_url("https://example.com", None, None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_generated_slug_exhausts_attempts() {
        let mut repo = MockShortUrlRepository::new();

        repo.expect_exists_by_slug().times(10).returning(|_| Ok(true));
        repo.expect_insert().times(0);

        let result = service(repo)
            .create_short_url("https://example.com", None, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_get_short_url_found() {
        let mut repo = MockShortUrlRepository::new();
        let existing = sample_short_url(5, "abc12345", "https://example.com/");

        repo.expect_find_by_slug()
            .withf(|slug| slug == "abc12345")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));

        let result = service(repo).get_short_url("abc12345").await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().id, 5);
    }

    #[tokio::test]
    async fn test_get_short_url_not_found() {
        let mut repo = MockShortUrlRepository::new();

        repo.expect_find_by_slug().times(1).returning(|_| Ok(None));

        let result = service(repo).get_short_url("missing-slug").await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::NotFound { slug } if slug == "missing-slug"
        ));
    }

    #[tokio::test]
    async fn test_get_expired_short_url_still_returned() {
        let mut repo = MockShortUrlRepository::new();
        let mut expired = sample_short_url(5, "expired1", "https://example.com/");
        expired.expires_at = Some(Utc::now() - Duration::hours(1));

        repo.expect_find_by_slug()
            .times(1)
            .returning(move |_| Ok(Some(expired.clone())));

        let result = service(repo).get_short_url("expired1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_register_hit_increments() {
        let mut repo = MockShortUrlRepository::new();
        let existing = sample_short_url(5, "abc12345", "https://example.com/");

        repo.expect_find_by_slug()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_record_hit()
            .withf(|slug, _| slug == "abc12345")
            .times(1)
            .returning(|slug, at| {
                Ok(Some(ShortUrl::new(
                    5,
                    slug.to_string(),
                    "https://example.com/".to_string(),
                    Utc::now(),
                    Some(at),
                    1,
                    None,
                )))
            });

        let result = service(repo).register_hit("abc12345").await;

        assert!(result.is_ok());
        let updated = result.unwrap();
        assert_eq!(updated.hit_count, 1);
        assert!(updated.last_accessed_at.is_some());
    }

    #[tokio::test]
    async fn test_register_hit_not_found() {
        let mut repo = MockShortUrlRepository::new();

        repo.expect_find_by_slug().times(1).returning(|_| Ok(None));
        repo.expect_record_hit().times(0);

        let result = service(repo).register_hit("missing-slug").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_register_hit_expired_does_not_mutate() {
        let mut repo = MockShortUrlRepository::new();
        let mut expired = sample_short_url(5, "expired1", "https://example.com/");
        expired.expires_at = Some(Utc::now() - Duration::seconds(1));

        repo.expect_find_by_slug()
            .times(1)
            .returning(move |_| Ok(Some(expired.clone())));
        repo.expect_record_hit().times(0);

        let result = service(repo).register_hit("expired1").await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::Expired { slug } if slug == "expired1"
        ));
    }

    #[test]
    fn test_public_url_uses_configured_base() {
        let service = ShortUrlService::new(
            Arc::new(MockShortUrlRepository::new()),
            ShortenerConfig {
                base_url: Some("https://sho.rt/".to_string()),
                slug_length: 8,
            },
        );

        assert_eq!(
            service.public_short_url("abc12345", Some("http://other.example")),
            "https://sho.rt/abc12345"
        );
    }

    #[test]
    fn test_public_url_loopback_base_falls_back_to_request() {
        let service = ShortUrlService::new(
            Arc::new(MockShortUrlRepository::new()),
            ShortenerConfig {
                base_url: Some("http://localhost:8080".to_string()),
                slug_length: 8,
            },
        );

        assert_eq!(
            service.public_short_url("abc12345", Some("https://s.example.com")),
            "https://s.example.com/abc12345"
        );
    }

    #[test]
    fn test_public_url_loopback_base_without_request_base() {
        let service = ShortUrlService::new(
            Arc::new(MockShortUrlRepository::new()),
            ShortenerConfig {
                base_url: Some("http://localhost:8080".to_string()),
                slug_length: 8,
            },
        );

        assert_eq!(
            service.public_short_url("abc12345", None),
            "http://localhost:8080/abc12345"
        );
    }

    #[test]
    fn test_public_url_no_base_at_all() {
        let service = ShortUrlService::new(
            Arc::new(MockShortUrlRepository::new()),
            ShortenerConfig::default(),
        );

        assert_eq!(service.public_short_url("abc12345", None), "abc12345");
    }

    #[test]
    fn test_public_url_unparseable_base_used_as_is() {
        let service = ShortUrlService::new(
            Arc::new(MockShortUrlRepository::new()),
            ShortenerConfig {
                base_url: Some("sho.rt".to_string()),
                slug_length: 8,
            },
        );

        assert_eq!(
            service.public_short_url("abc12345", Some("https://s.example.com")),
            "sho.rt/abc12345"
        );
    }
}

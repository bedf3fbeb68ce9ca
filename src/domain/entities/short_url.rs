//! Short URL entity mapping a slug to its destination.

use chrono::{DateTime, Utc};

/// A short URL record.
///
/// Immutable by construction: `hit_count` and `last_accessed_at` are the only
/// fields that ever change, and they change only through the store's hit
/// registration, which returns a fresh record. Records are never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrl {
    pub id: i64,
    pub slug: String,
    pub destination_url: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub hit_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortUrl {
    /// Creates a new ShortUrl instance.
    pub fn new(
        id: i64,
        slug: String,
        destination_url: String,
        created_at: DateTime<Utc>,
        last_accessed_at: Option<DateTime<Utc>>,
        hit_count: i64,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            slug,
            destination_url,
            created_at,
            last_accessed_at,
            hit_count,
            expires_at,
        }
    }

    /// Returns true if the record has passed its expiry time.
    ///
    /// Expired records stay addressable for inspection; only redirects are
    /// blocked.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|e| Utc::now() >= e)
    }
}

/// Input data for creating a new short URL.
///
/// `id` and `created_at` are assigned by the store; `hit_count` starts at 0.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub slug: String,
    pub destination_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

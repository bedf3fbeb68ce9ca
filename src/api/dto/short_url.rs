//! DTOs for the short URL endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortUrl;

/// Request to create a short URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortUrlRequest {
    /// The destination URL to shorten (must be a valid absolute HTTP/HTTPS URL).
    #[validate(length(max = 2048, message = "destinationUrl is too long"))]
    pub destination_url: String,

    /// Optional custom slug (3-64 characters, letters, digits, `-`, `_`).
    pub custom_slug: Option<String>,

    /// Optional expiry timestamp; must be strictly in the future.
    /// After this time, the redirect returns 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

/// A short URL as returned to API clients.
#[derive(Debug, Serialize)]
pub struct ShortUrlResponse {
    pub id: i64,
    pub slug: String,
    pub destination_url: String,
    /// Fully qualified public link for the slug.
    pub short_url: String,
    pub hit_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortUrlResponse {
    pub fn from_entity(short_url: ShortUrl, public_short_url: String) -> Self {
        Self {
            id: short_url.id,
            slug: short_url.slug,
            destination_url: short_url.destination_url,
            short_url: public_short_url,
            hit_count: short_url.hit_count,
            created_at: short_url.created_at,
            last_accessed_at: short_url.last_accessed_at,
            expires_at: short_url.expires_at,
        }
    }
}

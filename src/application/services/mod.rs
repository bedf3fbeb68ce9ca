//! Application services.

mod short_url_service;

pub use short_url_service::{DEFAULT_SLUG_LENGTH, ShortUrlService, ShortenerConfig};

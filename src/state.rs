use std::sync::Arc;

use sqlx::PgPool;

use crate::application::services::ShortUrlService;
use crate::infrastructure::persistence::PgShortUrlRepository;

/// Shared application state, cloned per request.
///
/// No mutable in-process state lives here; everything shared across requests
/// goes through the database.
#[derive(Clone)]
pub struct AppState {
    pub short_urls: Arc<ShortUrlService<PgShortUrlRepository>>,
    pub db: PgPool,
}

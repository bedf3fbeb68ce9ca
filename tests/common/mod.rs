#![allow(dead_code)]

use slugline::application::services::{ShortUrlService, ShortenerConfig};
use slugline::infrastructure::persistence::PgShortUrlRepository;
use slugline::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;

pub fn create_test_state(pool: PgPool) -> AppState {
    create_test_state_with_config(pool, ShortenerConfig::default())
}

pub fn create_test_state_with_config(pool: PgPool, config: ShortenerConfig) -> AppState {
    let repository = Arc::new(PgShortUrlRepository::new(Arc::new(pool.clone())));

    AppState {
        short_urls: Arc::new(ShortUrlService::new(repository, config)),
        db: pool,
    }
}

pub async fn create_test_short_url(pool: &PgPool, slug: &str, url: &str) {
    sqlx::query("INSERT INTO short_urls (slug, destination_url) VALUES ($1, $2)")
        .bind(slug)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_expired_short_url(pool: &PgPool, slug: &str, url: &str) {
    sqlx::query(
        "INSERT INTO short_urls (slug, destination_url, expires_at) VALUES ($1, $2, NOW() - INTERVAL '1 hour')",
    )
    .bind(slug)
    .bind(url)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn hit_count(pool: &PgPool, slug: &str) -> i64 {
    sqlx::query_scalar("SELECT hit_count FROM short_urls WHERE slug = $1")
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
}

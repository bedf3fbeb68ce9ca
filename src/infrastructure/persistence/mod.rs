//! Database-backed repository implementations.

mod pg_short_url_repository;

pub use pg_short_url_repository::PgShortUrlRepository;

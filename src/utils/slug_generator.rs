//! Slug generation and validation utilities.
//!
//! Provides cryptographically secure random slug generation and validation
//! for custom caller-provided slugs.

use crate::error::AppError;
use rand::Rng;
use serde_json::json;

/// Alphabet used for generated slugs: digits, lowercase, uppercase.
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Slugs that cannot be used as short links.
///
/// These are reserved for system endpoints to prevent routing conflicts:
/// a short link at one of these paths would be shadowed by the static route.
const RESERVED_SLUGS: &[&str] = &["api", "healthz"];

/// Minimum accepted slug length, generated or custom.
pub const MIN_SLUG_LENGTH: usize = 3;

/// Maximum accepted slug length, matching the column width in storage.
pub const MAX_SLUG_LENGTH: usize = 64;

/// Generates a random slug of exactly `length` characters.
///
/// Characters are drawn independently and uniformly from a 62-symbol
/// alphanumeric alphabet using the OS-seeded CSPRNG. Predictable slugs would
/// let an attacker enumerate private links.
///
/// # Panics
///
/// Panics if `length` is zero. A zero length is a programming error, not a
/// runtime condition; configuration is validated at startup.
pub fn generate_slug(length: usize) -> String {
    assert!(length > 0, "slug length must be positive");

    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Validates a caller-provided custom slug.
///
/// # Rules
///
/// - Length: 3-64 characters
/// - Allowed characters: letters, digits, `-`, `_`
/// - Cannot be a reserved system slug
///
/// # Errors
///
/// Returns [`AppError::InvalidSlug`] if any rule is violated.
pub fn validate_custom_slug(slug: &str) -> Result<(), AppError> {
    if slug.len() < MIN_SLUG_LENGTH || slug.len() > MAX_SLUG_LENGTH {
        return Err(AppError::invalid_slug(
            "Custom slug must be 3-64 characters",
            json!({ "provided_length": slug.len() }),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::invalid_slug(
            "Custom slug may only contain letters, numbers, '-' or '_'",
            json!({ "slug": slug }),
        ));
    }

    if RESERVED_SLUGS.contains(&slug) {
        return Err(AppError::invalid_slug(
            "This slug is reserved",
            json!({ "slug": slug }),
        ));
    }

    Ok(())
}

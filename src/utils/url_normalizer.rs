//! Destination URL validation and normalization.
//!
//! Syntactic validation only; no network access is performed.

use url::Url;

/// Maximum length of a destination URL after normalization, matching the
/// column width in storage.
pub const MAX_DESTINATION_LENGTH: usize = 2048;

/// Errors that can occur while validating a destination URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Destination URL is required")]
    Empty,

    #[error("Destination URL is invalid: {0}")]
    InvalidSyntax(String),

    #[error("Destination URL must start with http or https")]
    UnsupportedScheme(String),

    #[error("Destination URL must include a valid host")]
    MissingHost,

    #[error("Destination URL must not exceed {MAX_DESTINATION_LENGTH} characters")]
    TooLong { length: usize },
}

/// Validates a destination URL and returns its canonical string form.
///
/// # Rules
///
/// 1. Input is trimmed; blank input is rejected
/// 2. Only absolute `http` and `https` URLs are accepted (case-insensitive;
///    the parser lowercases schemes)
/// 3. The host component must be present and non-empty
/// 4. Paths and query parameters are preserved as parsed
/// 5. The canonical form must fit in 2048 characters. Normalization can
///    lengthen the input (percent-encoding, IDN encoding, an added trailing
///    slash), so the limit is checked after parsing, not before
///
/// # Security
///
/// The scheme allowlist rejects dangerous schemes like `javascript:`,
/// `data:`, and `file:`.
///
/// # Errors
///
/// Returns [`UrlValidationError::Empty`] for blank input,
/// [`UrlValidationError::InvalidSyntax`] for unparseable input,
/// [`UrlValidationError::UnsupportedScheme`] for non-HTTP(S) schemes,
/// [`UrlValidationError::MissingHost`] when the host is absent or blank, and
/// [`UrlValidationError::TooLong`] when the canonical form exceeds the limit.
pub fn normalize_destination(raw: &str) -> Result<String, UrlValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let parsed = Url::parse(trimmed).map_err(|e| match e {
        url::ParseError::EmptyHost => UrlValidationError::MissingHost,
        other => UrlValidationError::InvalidSyntax(other.to_string()),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    let normalized = parsed.to_string();
    if normalized.len() > MAX_DESTINATION_LENGTH {
        return Err(UrlValidationError::TooLong {
            length: normalized.len(),
        });
    }

    Ok(normalized)
}

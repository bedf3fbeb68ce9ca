//! Base URL resolution for public short links.
//!
//! A configured base URL pointing at a loopback host is almost always a
//! local-dev default; links built from it would be unusable once the service
//! is reached through a real host or proxy. In that case the base is derived
//! from the inbound request instead.

use axum::http::{HeaderMap, header};
use url::Url;

/// Hosts treated as loopback when found in a configured base URL.
const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0"];

/// Returns true if the configured base URL resolves to a loopback host.
///
/// A base without a host counts as loopback. An unparseable base is treated
/// as non-loopback and used as configured.
pub fn is_loopback_base(base: &str) -> bool {
    let Ok(parsed) = Url::parse(base) else {
        return false;
    };

    match parsed.host_str() {
        Some(host) if !host.is_empty() => {
            LOOPBACK_HOSTS.contains(&host.to_ascii_lowercase().as_str())
        }
        _ => true,
    }
}

/// Derives a base URL (`scheme://host[:port]`) from the inbound request.
///
/// The scheme comes from `X-Forwarded-Proto` when present (first value),
/// defaulting to `http`. The host is taken from the `Host` header with the
/// scheme's default port stripped. Returns `None` when no usable `Host`
/// header is present.
pub fn base_from_headers(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?.trim();
    if host.is_empty() {
        return None;
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_else(|| "http".to_string());

    let host = strip_default_port(host, &scheme);

    Some(format!("{scheme}://{host}"))
}

fn strip_default_port<'a>(host: &'a str, scheme: &str) -> &'a str {
    match scheme {
        "http" => host.strip_suffix(":80").unwrap_or(host),
        "https" => host.strip_suffix(":443").unwrap_or(host),
        _ => host,
    }
}

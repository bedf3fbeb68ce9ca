//! Handlers for creating and inspecting short URLs.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use validator::Validate;

use crate::api::dto::short_url::{CreateShortUrlRequest, ShortUrlResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::base_from_headers;

/// Creates a new short URL.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "destination_url": "https://www.example.com/very/long/path",
///   "custom_slug": "my-slug",              // optional
///   "expires_at": "2027-12-31T23:59:59Z"   // optional
/// }
/// ```
///
/// # Errors
///
/// Returns 400 for an invalid destination, slug, or expiry, and 409 when
/// the slug is already taken.
pub async fn create_short_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateShortUrlRequest>,
) -> Result<(StatusCode, Json<ShortUrlResponse>), AppError> {
    payload.validate()?;

    let created = state
        .short_urls
        .create_short_url(
            &payload.destination_url,
            payload.custom_slug,
            payload.expires_at,
        )
        .await?;

    let request_base = base_from_headers(&headers);
    let short_url = state
        .short_urls
        .public_short_url(&created.slug, request_base.as_deref());

    Ok((
        StatusCode::CREATED,
        Json(ShortUrlResponse::from_entity(created, short_url)),
    ))
}

/// Returns short URL details by slug, including hit count and expiry.
///
/// # Endpoint
///
/// `GET /api/urls/{slug}`
///
/// Expired records are still returned; expiry gates only the redirect.
///
/// # Errors
///
/// Returns 404 if the slug does not exist.
pub async fn get_short_url_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ShortUrlResponse>, AppError> {
    let short_url = state.short_urls.get_short_url(&slug).await?;

    let request_base = base_from_headers(&headers);
    let public_url = state
        .short_urls
        .public_short_url(&short_url.slug, request_base.as_deref());

    Ok(Json(ShortUrlResponse::from_entity(short_url, public_url)))
}

//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a slug to its destination URL.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// Registers a hit (incrementing the counter and stamping the access time)
/// before returning a 308 Permanent Redirect.
///
/// # Errors
///
/// Returns 404 if the slug does not exist and 410 Gone when the record has
/// expired; an expired record is left unmodified.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let short_url = state.short_urls.register_hit(&slug).await?;

    Ok(Redirect::permanent(&short_url.destination_url))
}

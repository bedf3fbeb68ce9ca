//! Router configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    create_short_url_handler, get_short_url_handler, health_handler, redirect_handler,
};
use crate::state::AppState;

/// Builds the application router.
///
/// # Endpoints
///
/// - `POST /api/urls`        - Create a short URL
/// - `GET  /api/urls/{slug}` - Short URL details (no expiry check, no hit)
/// - `GET  /healthz`         - Liveness/readiness probe
/// - `GET  /{slug}`          - Redirect to the destination, registering a hit
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api/urls", post(create_short_url_handler))
        .route("/api/urls/{slug}", get(get_short_url_handler))
        .route("/healthz", get(health_handler))
        .route("/{slug}", get(redirect_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

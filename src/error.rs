//! Application error taxonomy and HTTP mapping.
//!
//! Business failures are explicit variants rather than exceptions-as-control-flow;
//! only [`AppError::Internal`] represents unexpected conditions such as an
//! unreachable store.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::url_normalizer::UrlValidationError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Destination URL failed syntactic validation.
    #[error(transparent)]
    InvalidDestination(#[from] UrlValidationError),

    /// Custom slug failed the length or alphabet rule.
    #[error("{message}")]
    InvalidSlug { message: String, details: Value },

    /// Requested expiry is not strictly in the future.
    #[error("expiresAt must be a future timestamp")]
    InvalidExpiry { provided: DateTime<Utc> },

    /// Slug already taken, whether pre-checked or lost in a creation race.
    #[error("Slug '{slug}' is already in use")]
    SlugConflict { slug: String },

    #[error("Short URL '{slug}' not found")]
    NotFound { slug: String },

    /// Redirect attempted past expiry; the record is left unmodified.
    #[error("Short URL '{slug}' has expired")]
    Expired { slug: String },

    /// Request body failed structural validation.
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_slug(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidSlug {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_expiry(provided: DateTime<Utc>) -> Self {
        Self::InvalidExpiry { provided }
    }

    pub fn slug_conflict(slug: impl Into<String>) -> Self {
        Self::SlugConflict { slug: slug.into() }
    }

    pub fn not_found(slug: impl Into<String>) -> Self {
        Self::NotFound { slug: slug.into() }
    }

    pub fn expired(slug: impl Into<String>) -> Self {
        Self::Expired { slug: slug.into() }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidDestination(inner) => (
                StatusCode::BAD_REQUEST,
                match inner {
                    UrlValidationError::Empty => "empty_destination",
                    UrlValidationError::InvalidSyntax(_) => "invalid_destination",
                    UrlValidationError::UnsupportedScheme(_) => "unsupported_scheme",
                    UrlValidationError::MissingHost => "missing_host",
                    UrlValidationError::TooLong { .. } => "destination_too_long",
                },
            ),
            Self::InvalidSlug { .. } => (StatusCode::BAD_REQUEST, "invalid_slug"),
            Self::InvalidExpiry { .. } => (StatusCode::BAD_REQUEST, "invalid_expiry"),
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Self::SlugConflict { .. } => (StatusCode::CONFLICT, "slug_conflict"),
            Self::Expired { .. } => (StatusCode::GONE, "expired"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    fn details(&self) -> Value {
        match self {
            Self::InvalidSlug { details, .. }
            | Self::Validation { details, .. }
            | Self::Internal { details, .. } => details.clone(),
            Self::InvalidExpiry { provided } => json!({ "provided": provided }),
            Self::SlugConflict { slug } | Self::NotFound { slug } | Self::Expired { slug } => {
                json!({ "slug": slug })
            }
            Self::InvalidDestination(_) => json!({}),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message: self.to_string(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "database error");
        Self::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Validation {
            message: "Request validation failed".to_string(),
            details: json!({ "errors": e.to_string() }),
        }
    }
}

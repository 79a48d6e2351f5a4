//! Error types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orchestrator::MatchError;
use thiserror::Error;

/// Errors returned by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Matching engine error.
    #[error(transparent)]
    Match(#[from] MatchError),
}

impl From<match_core::CoreError> for ApiError {
    fn from(err: match_core::CoreError) -> Self {
        ApiError::Match(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Match(err) => match err {
                MatchError::SelfSwipe
                | MatchError::InvalidAction(_)
                | MatchError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
                MatchError::NotFound { .. } => StatusCode::NOT_FOUND,
                MatchError::Unauthorized { .. } => StatusCode::FORBIDDEN,
                MatchError::DuplicateSwipe { .. } => StatusCode::CONFLICT,
                MatchError::TargetIneligible(_) => StatusCode::UNPROCESSABLE_ENTITY,
                MatchError::Database(_) | MatchError::Directory(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let ApiError::Match(err) = &self;

        let message = if err.is_retryable() {
            tracing::error!("Storage error: {}", err);
            "temporarily unavailable, retry later".to_string()
        } else {
            tracing::debug!(%status, "Request rejected: {}", err);
            err.to_string()
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

//! Error types for clipscout-api
//!
//! Every failure surfaced to a caller has the body `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::search_orchestrator::SearchError;

/// Message returned for any recognition failure
pub const RECOGNITION_FAILED_MESSAGE: &str = "Audio recognition failed or no result found";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid upload or request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Fingerprint service unreachable, errored, or no match (500)
    #[error("{}", RECOGNITION_FAILED_MESSAGE)]
    RecognitionFailed,

    /// Storage, database or other unhandled fault (500)
    #[error("Processing failed: {0}")]
    Common(#[from] clipscout_common::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RecognitionFailed | ApiError::Common(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Validation(e) => ApiError::BadRequest(e.to_string()),
            SearchError::Recognition(_) => ApiError::RecognitionFailed,
            SearchError::Storage(e) => ApiError::Common(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

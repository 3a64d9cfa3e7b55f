//! Upload endpoint
//!
//! POST /api/upload/ (multipart, field `file`)

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::SearchResult;
use crate::services::search_orchestrator::SearchStage;
use crate::services::upload_validator::{UploadError, UploadedFile};
use crate::AppState;

/// Form field carrying the audio clip
pub const FILE_FIELD: &str = "file";

/// POST /api/upload/ response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub search_id: Uuid,
    /// Seconds, rounded to two decimals
    pub processing_time: f64,
    pub results: Vec<SearchResult>,
}

fn round_seconds(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

/// Pull the `file` file part out of the form, ignoring other fields
async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, UploadError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        // Only file parts count; a plain text field named `file` is not an upload
        if field.name() != Some(FILE_FIELD) || field.file_name().is_none() || upload.is_some() {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        upload = Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Ok(upload)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge
    } else {
        UploadError::Malformed(err.body_text())
    }
}

/// POST /api/upload/
///
/// Runs one clip through recognition, enrichment, merge and persistence.
pub async fn upload_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    // A request that is not multipart at all carries no file
    let upload = match multipart {
        Ok(multipart) => read_file_field(multipart).await.map_err(|e| {
            tracing::warn!(error = %e, "Upload rejected");
            ApiError::BadRequest(e.to_string())
        })?,
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Request is not multipart");
            None
        }
    };

    let outcome = state.orchestrator.run(upload).await?;

    let response = UploadResponse {
        search_id: outcome.search_id,
        processing_time: round_seconds(outcome.processing_time),
        results: outcome.results,
    };

    tracing::info!(
        search_id = %response.search_id,
        stage = %SearchStage::Responded,
        title = %outcome.fingerprint.title,
        artist = %outcome.fingerprint.artist,
        results = response.results.len(),
        processing_time = response.processing_time,
        "Upload processed"
    );

    Ok(Json(response))
}

/// Build upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(upload_audio))
        .route("/api/upload/", post(upload_audio))
}

//! AudD fingerprint recognition client
//!
//! Sends the raw upload to the recognition service and normalizes the
//! response into a [`FingerprintMatch`]. A `null` result is a
//! [`RecognitionError::NoMatch`], never an empty match.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ServiceConfig, USER_AGENT};
use crate::services::upload_validator::UploadedFile;

/// Extra payloads requested alongside the match
const RETURN_FIELDS: &str = "timecode,apple_music,spotify";

/// Recognition errors (all surface as a 500 to the caller)
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Recognition service error {0}: {1}")]
    ServiceError(i64, String),

    #[error("No match found for audio")]
    NoMatch,
}

/// Recognition response envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuddResponse {
    pub status: String,
    #[serde(default)]
    pub result: Option<AuddTrack>,
    #[serde(default)]
    pub error: Option<AuddErrorBody>,
}

/// Best match returned by the recognition service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuddTrack {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub release_date: Option<String>,
    pub label: Option<String>,
    pub timecode: Option<String>,
    pub song_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuddErrorBody {
    pub error_code: i64,
    pub error_message: String,
}

/// Normalized best-guess match for a clip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintMatch {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub timecode: Option<String>,
    pub song_link: Option<String>,
}

impl FingerprintMatch {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            ..Default::default()
        }
    }

    /// Free-text query for the video search: `"{title} {artist}"`, trimmed
    ///
    /// Empty when both title and artist are empty.
    pub fn video_query(&self) -> String {
        format!("{} {}", self.title, self.artist).trim().to_string()
    }

    /// Query for the metadata search: the title alone, trimmed
    pub fn metadata_query(&self) -> String {
        self.title.trim().to_string()
    }
}

impl AuddResponse {
    /// Convert the envelope into a match, or the reason there is none
    pub fn into_match(self) -> Result<FingerprintMatch, RecognitionError> {
        match self.status.as_str() {
            "success" => {
                let track = self.result.ok_or(RecognitionError::NoMatch)?;
                Ok(FingerprintMatch {
                    title: track.title.unwrap_or_default(),
                    artist: track.artist.unwrap_or_default(),
                    album: track.album,
                    timecode: track.timecode,
                    song_link: track.song_link,
                })
            }
            "error" => {
                let body = self.error.unwrap_or(AuddErrorBody {
                    error_code: 0,
                    error_message: "unspecified error".to_string(),
                });
                Err(RecognitionError::ServiceError(body.error_code, body.error_message))
            }
            other => Err(RecognitionError::ParseError(format!(
                "unexpected status '{}'",
                other
            ))),
        }
    }
}

/// Recognition service client
pub struct AuddClient {
    http_client: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl AuddClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, RecognitionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| RecognitionError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_token: config.audd_api_token.clone(),
            base_url: config.endpoints.audd.clone(),
        })
    }

    /// Identify the track in an uploaded clip
    pub async fn recognize(
        &self,
        upload: &UploadedFile,
    ) -> Result<FingerprintMatch, RecognitionError> {
        let mut part = reqwest::multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.clone());
        if let Some(content_type) = &upload.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| RecognitionError::NetworkError(e.to_string()))?;
        }

        let form = reqwest::multipart::Form::new()
            .text("api_token", self.api_token.clone())
            .text("return", RETURN_FIELDS)
            .part("file", part);

        tracing::debug!(
            file_name = %upload.file_name,
            size = upload.size(),
            "Querying recognition service"
        );

        let response = self
            .http_client
            .post(&self.base_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognitionError::NetworkError(e.to_string()))?;

        let status = response.status();
        tracing::info!(status = status.as_u16(), "Recognition service responded");

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RecognitionError::ApiError(status.as_u16(), error_text));
        }

        let body: AuddResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::ParseError(e.to_string()))?;

        let matched = body.into_match()?;

        tracing::info!(
            title = %matched.title,
            artist = %matched.artist,
            "Recognition successful"
        );

        Ok(matched)
    }
}

//! Shared fixtures for clipscout-api integration tests
//!
//! Stub upstream services, an in-memory app, and a multipart body builder.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use clipscout_api::models::{CandidateResult, StreamingLinks};
use clipscout_api::services::{
    AudioRecognizer, FingerprintMatch, MetadataError, MetadataSearch, RecognitionError,
    SearchOrchestrator, UploadedFile, VideoSearch, VideoSearchError,
};
use clipscout_api::storage::UploadStore;
use clipscout_api::{build_router, AppState};

pub const BOUNDARY: &str = "clipscout-test-boundary";

/// Recognizer returning a fixed match, or no match at all
pub struct StubRecognizer {
    outcome: Option<FingerprintMatch>,
    calls: Mutex<usize>,
}

impl StubRecognizer {
    pub fn matching(title: &str, artist: &str) -> Self {
        Self {
            outcome: Some(FingerprintMatch::new(title, artist)),
            calls: Mutex::new(0),
        }
    }

    pub fn no_match() -> Self {
        Self {
            outcome: None,
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl AudioRecognizer for StubRecognizer {
    async fn recognize(&self, _upload: &UploadedFile) -> Result<FingerprintMatch, RecognitionError> {
        *self.calls.lock().unwrap() += 1;
        self.outcome.clone().ok_or(RecognitionError::NoMatch)
    }
}

/// Video search returning canned candidates and recording queries
#[derive(Default)]
pub struct RecordingVideos {
    results: Vec<CandidateResult>,
    fail: bool,
    queries: Mutex<Vec<String>>,
}

impl RecordingVideos {
    pub fn returning(results: Vec<CandidateResult>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoSearch for RecordingVideos {
    async fn search_videos(&self, query: &str) -> Result<Vec<CandidateResult>, VideoSearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(VideoSearchError::ApiError(403, "quota exceeded".to_string()));
        }
        Ok(self.results.clone())
    }
}

/// Metadata search returning canned candidates and recording titles
#[derive(Default)]
pub struct RecordingMetadata {
    results: Vec<CandidateResult>,
    fail: bool,
    delay: Option<Duration>,
    titles: Mutex<Vec<String>>,
}

impl RecordingMetadata {
    pub fn returning(results: Vec<CandidateResult>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Answers with `results` only after `delay`
    pub fn slow(results: Vec<CandidateResult>, delay: Duration) -> Self {
        Self {
            results,
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataSearch for RecordingMetadata {
    async fn search_titles(&self, title: &str) -> Result<Vec<CandidateResult>, MetadataError> {
        self.titles.lock().unwrap().push(title.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(MetadataError::NetworkError("connection refused".to_string()));
        }
        Ok(self.results.clone())
    }
}

pub fn video(title: &str, video_id: &str) -> CandidateResult {
    CandidateResult {
        title: title.to_string(),
        platform: "YouTube".to_string(),
        url: format!("https://www.youtube.com/watch?v={}", video_id),
        thumbnail_url: Some(format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id)),
        duration: None,
        channel_name: Some("John Lennon".to_string()),
        view_count: None,
        links: StreamingLinks::search_links("Imagine John Lennon"),
    }
}

/// Metadata candidate; an empty `watch_page` means no provider data was found
pub fn title(title: &str, watch_page: &str) -> CandidateResult {
    CandidateResult {
        title: title.to_string(),
        platform: "TMDB".to_string(),
        url: watch_page.to_string(),
        thumbnail_url: None,
        duration: None,
        channel_name: None,
        view_count: None,
        links: StreamingLinks::search_links(title),
    }
}

/// Router wired to stub upstreams, with handles for inspection
pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub recognizer: Arc<StubRecognizer>,
    pub videos: Arc<RecordingVideos>,
    pub metadata: Arc<RecordingMetadata>,
    pub media: TempDir,
}

impl TestApp {
    pub async fn new(
        recognizer: StubRecognizer,
        videos: RecordingVideos,
        metadata: RecordingMetadata,
    ) -> Self {
        let media = TempDir::new().unwrap();
        let media_root = media.path().to_path_buf();
        Self::build(recognizer, videos, metadata, media, media_root).await
    }

    /// App whose uploads are written under `media_root` instead of the temp dir
    pub async fn with_media_root(media: TempDir, media_root: PathBuf) -> Self {
        Self::build(
            StubRecognizer::matching("Imagine", "John Lennon"),
            RecordingVideos::default(),
            RecordingMetadata::default(),
            media,
            media_root,
        )
        .await
    }

    async fn build(
        recognizer: StubRecognizer,
        videos: RecordingVideos,
        metadata: RecordingMetadata,
        media: TempDir,
        media_root: PathBuf,
    ) -> Self {
        let db = clipscout_common::db::init_memory_database().await.unwrap();

        let recognizer = Arc::new(recognizer);
        let videos = Arc::new(videos);
        let metadata = Arc::new(metadata);

        let orchestrator = SearchOrchestrator::new(
            db.clone(),
            UploadStore::new(media_root),
            recognizer.clone(),
            videos.clone(),
            metadata.clone(),
        );
        let router = build_router(AppState::new(db.clone(), orchestrator));

        Self {
            router,
            db,
            recognizer,
            videos,
            metadata,
            media,
        }
    }

    /// App whose upstreams all come back empty
    pub async fn empty() -> Self {
        Self::new(
            StubRecognizer::matching("Imagine", "John Lennon"),
            RecordingVideos::default(),
            RecordingMetadata::default(),
        )
        .await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn upload(&self, form: MultipartForm) -> (StatusCode, Value) {
        self.send(form.into_request("/api/upload/")).await
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.db)
            .await
            .unwrap()
    }

    /// Files stored in the upload namespace
    pub fn stored_files(&self) -> Vec<std::path::PathBuf> {
        let dir = self.media.path().join("audio_searches");
        match std::fs::read_dir(dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Minimal multipart/form-data body builder
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, field, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn text(mut self, field: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, field, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(Bytes::from(self.body)))
            .unwrap()
    }
}

/// An audio clip of the given size
pub fn clip(size: usize) -> Vec<u8> {
    vec![0x49; size]
}

//! Audio search orchestrator
//!
//! Runs one upload through the full flow, sequentially:
//!
//! RECEIVED → VALIDATED → RECOGNIZED → ENRICHED → MERGED → PERSISTED → RESPONDED
//!
//! - Validation and recognition failures end the request.
//! - Video search and metadata failures are logged and contribute nothing.
//! - Merged candidates without a URL are dropped before persistence.
//!
//! Each upstream call is attempted exactly once.

use serde::Serialize;
use sqlx::SqlitePool;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

use crate::db;
use crate::models::{AudioSearch, CandidateResult, SearchResult};
use crate::services::audd_client::{FingerprintMatch, RecognitionError};
use crate::services::result_merger::merge_results;
use crate::services::traits::{AudioRecognizer, MetadataSearch, VideoSearch};
use crate::services::upload_validator::{validate_upload, UploadError, UploadedFile};
use crate::storage::UploadStore;

/// Request lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchStage {
    Received,
    Validated,
    Recognized,
    Enriched,
    Merged,
    Persisted,
    Responded,
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "RECEIVED",
            Self::Validated => "VALIDATED",
            Self::Recognized => "RECOGNIZED",
            Self::Enriched => "ENRICHED",
            Self::Merged => "MERGED",
            Self::Persisted => "PERSISTED",
            Self::Responded => "RESPONDED",
        };
        f.write_str(name)
    }
}

/// Terminal failures of a search request
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] UploadError),

    #[error("Audio recognition failed: {0}")]
    Recognition(#[from] RecognitionError),

    #[error(transparent)]
    Storage(#[from] clipscout_common::Error),
}

/// Outcome of a completed search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub search_id: Uuid,
    pub fingerprint: FingerprintMatch,
    /// Seconds spent in fingerprint recognition
    pub processing_time: f64,
    /// Persisted results, in merged order
    pub results: Vec<SearchResult>,
}

/// Sequences validation, recognition, enrichment, merge and persistence
pub struct SearchOrchestrator {
    db: SqlitePool,
    store: UploadStore,
    recognizer: Arc<dyn AudioRecognizer>,
    videos: Arc<dyn VideoSearch>,
    metadata: Arc<dyn MetadataSearch>,
}

impl SearchOrchestrator {
    pub fn new(
        db: SqlitePool,
        store: UploadStore,
        recognizer: Arc<dyn AudioRecognizer>,
        videos: Arc<dyn VideoSearch>,
        metadata: Arc<dyn MetadataSearch>,
    ) -> Self {
        Self {
            db,
            store,
            recognizer,
            videos,
            metadata,
        }
    }

    /// Process one upload end to end
    pub async fn run(&self, upload: Option<UploadedFile>) -> Result<SearchOutcome, SearchError> {
        tracing::debug!(stage = %SearchStage::Received, "Upload received");

        let upload = validate_upload(upload).map_err(|e| {
            tracing::warn!(error = %e, "Upload rejected");
            e
        })?;

        let search_id = Uuid::new_v4();
        tracing::info!(
            search_id = %search_id,
            stage = %SearchStage::Validated,
            file_name = %upload.file_name,
            content_type = upload.content_type.as_deref().unwrap_or(""),
            size = upload.size(),
            "Upload accepted"
        );

        let audio_file = self.store.save(search_id, &upload).await?;
        let search = AudioSearch::new(search_id, audio_file);
        db::searches::insert_search(&self.db, &search).await?;

        let started = Instant::now();

        let fingerprint = self.recognizer.recognize(&upload).await.map_err(|e| {
            tracing::error!(search_id = %search_id, error = %e, "Audio recognition failed");
            e
        })?;
        let processing_time = started.elapsed().as_secs_f64();
        tracing::info!(
            search_id = %search_id,
            stage = %SearchStage::Recognized,
            title = %fingerprint.title,
            artist = %fingerprint.artist,
            processing_time,
            "Audio recognized"
        );

        let videos = self.find_videos(search_id, &fingerprint).await;
        let titles = self.find_titles(search_id, &fingerprint).await;
        tracing::info!(
            search_id = %search_id,
            stage = %SearchStage::Enriched,
            videos = videos.len(),
            titles = titles.len(),
            "Enrichment complete"
        );

        let merged = merge_results(videos, titles);
        tracing::info!(
            search_id = %search_id,
            stage = %SearchStage::Merged,
            count = merged.len(),
            "Results merged"
        );

        let results = self.persist_results(search_id, merged).await?;

        db::searches::mark_processed(&self.db, search_id, processing_time).await?;
        tracing::info!(
            search_id = %search_id,
            stage = %SearchStage::Persisted,
            results = results.len(),
            processing_time,
            "Search processed"
        );

        Ok(SearchOutcome {
            search_id,
            fingerprint,
            processing_time,
            results,
        })
    }

    async fn find_videos(&self, search_id: Uuid, fingerprint: &FingerprintMatch) -> Vec<CandidateResult> {
        let query = fingerprint.video_query();
        if query.is_empty() {
            tracing::warn!(search_id = %search_id, "No valid query for video search");
            return Vec::new();
        }

        match self.videos.search_videos(&query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(search_id = %search_id, error = %e, "Video search failed");
                Vec::new()
            }
        }
    }

    async fn find_titles(&self, search_id: Uuid, fingerprint: &FingerprintMatch) -> Vec<CandidateResult> {
        let title = fingerprint.metadata_query();
        if title.is_empty() {
            tracing::warn!(search_id = %search_id, "No title for metadata search");
            return Vec::new();
        }

        match self.metadata.search_titles(&title).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(search_id = %search_id, error = %e, "Metadata search failed");
                Vec::new()
            }
        }
    }

    async fn persist_results(
        &self,
        search_id: Uuid,
        merged: Vec<CandidateResult>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let mut stored = Vec::with_capacity(merged.len());

        for candidate in merged {
            let title = candidate.title.clone();
            let Some(result) = SearchResult::from_candidate(candidate) else {
                tracing::warn!(
                    search_id = %search_id,
                    title = %title,
                    "Skipping result without url"
                );
                continue;
            };

            db::results::insert_result(&self.db, &result).await?;
            db::results::link_result(&self.db, search_id, result.id).await?;
            stored.push(result);
        }

        Ok(stored)
    }
}

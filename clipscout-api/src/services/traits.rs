//! Trait seams for the upstream services
//!
//! The orchestrator only sees these traits, so tests can swap in stub
//! implementations for the real HTTP clients.

use async_trait::async_trait;

use crate::models::CandidateResult;
use crate::services::audd_client::{AuddClient, FingerprintMatch, RecognitionError};
use crate::services::tmdb_client::{MediaType, MetadataError, RegionProviders, TmdbClient};
use crate::services::upload_validator::UploadedFile;
use crate::services::youtube_client::{VideoSearchError, YouTubeClient};

/// Audio fingerprint recognition
#[async_trait]
pub trait AudioRecognizer: Send + Sync {
    async fn recognize(&self, upload: &UploadedFile) -> Result<FingerprintMatch, RecognitionError>;
}

/// Free-text video catalog search
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search_videos(&self, query: &str) -> Result<Vec<CandidateResult>, VideoSearchError>;
}

/// Movie/TV title search, providers already resolved
#[async_trait]
pub trait MetadataSearch: Send + Sync {
    async fn search_titles(&self, title: &str) -> Result<Vec<CandidateResult>, MetadataError>;
}

/// Per-region watch provider lookup for one item
#[async_trait]
pub trait WatchProviderSource: Send + Sync {
    /// `Ok(None)` when the service has no data for exactly this region
    async fn watch_providers(
        &self,
        item_id: u64,
        media_type: MediaType,
        region: &str,
    ) -> Result<Option<RegionProviders>, MetadataError>;
}

#[async_trait]
impl AudioRecognizer for AuddClient {
    async fn recognize(&self, upload: &UploadedFile) -> Result<FingerprintMatch, RecognitionError> {
        AuddClient::recognize(self, upload).await
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search_videos(&self, query: &str) -> Result<Vec<CandidateResult>, VideoSearchError> {
        self.search(query).await
    }
}

#[async_trait]
impl MetadataSearch for TmdbClient {
    async fn search_titles(&self, title: &str) -> Result<Vec<CandidateResult>, MetadataError> {
        TmdbClient::search_titles(self, title).await
    }
}

#[async_trait]
impl WatchProviderSource for TmdbClient {
    async fn watch_providers(
        &self,
        item_id: u64,
        media_type: MediaType,
        region: &str,
    ) -> Result<Option<RegionProviders>, MetadataError> {
        self.fetch_watch_providers(item_id, media_type, region).await
    }
}

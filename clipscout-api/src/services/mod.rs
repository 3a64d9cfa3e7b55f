//! Services for clipscout-api
//!
//! Upstream clients, provider resolution, result merging and the
//! orchestrator that sequences them.

pub mod audd_client;
pub mod provider_resolver;
pub mod result_merger;
pub mod search_orchestrator;
pub mod tmdb_client;
pub mod traits;
pub mod upload_validator;
pub mod youtube_client;

pub use audd_client::{AuddClient, FingerprintMatch, RecognitionError};
pub use provider_resolver::{ProviderLinks, ProviderResolver};
pub use result_merger::merge_results;
pub use search_orchestrator::{SearchError, SearchOrchestrator, SearchOutcome, SearchStage};
pub use tmdb_client::{MediaType, MetadataError, TmdbClient};
pub use traits::{AudioRecognizer, MetadataSearch, VideoSearch, WatchProviderSource};
pub use upload_validator::{validate_upload, UploadError, UploadedFile, MAX_UPLOAD_BYTES};
pub use youtube_client::{VideoSearchError, YouTubeClient};

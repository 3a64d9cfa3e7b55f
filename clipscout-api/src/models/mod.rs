//! Data models for clipscout-api
//!
//! - [`CandidateResult`]: an unpersisted match produced by an upstream client
//! - [`SearchResult`]: a persisted match
//! - [`AudioSearch`]: one uploaded clip and its processing state

pub mod audio_search;
pub mod candidate;
pub mod search_result;

pub use audio_search::{AudioSearch, AudioSearchSummary};
pub use candidate::{CandidateResult, StreamingLinks};
pub use search_result::SearchResult;

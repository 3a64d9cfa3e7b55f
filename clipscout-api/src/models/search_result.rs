//! Persisted search result

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{CandidateResult, StreamingLinks};

/// One discoverable match, as stored in `search_results`
///
/// `url` is never empty for a stored row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: Uuid,
    pub title: String,
    pub platform: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
    pub channel_name: Option<String>,
    pub view_count: Option<String>,
    #[serde(flatten)]
    pub links: StreamingLinks,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

impl SearchResult {
    /// Build a new row from a candidate
    ///
    /// Returns `None` when the candidate has no URL.
    pub fn from_candidate(candidate: CandidateResult) -> Option<Self> {
        if !candidate.has_url() {
            return None;
        }

        Some(Self {
            id: Uuid::new_v4(),
            title: candidate.title,
            platform: candidate.platform,
            url: candidate.url,
            thumbnail_url: candidate.thumbnail_url,
            duration: candidate.duration,
            channel_name: candidate.channel_name,
            view_count: candidate.view_count,
            links: candidate.links,
            created_at: Utc::now(),
        })
    }
}

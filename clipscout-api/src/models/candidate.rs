//! Candidate results produced by the upstream clients

use serde::{Deserialize, Serialize};

/// One streaming-platform URL per named platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingLinks {
    pub netflix_url: Option<String>,
    pub prime_url: Option<String>,
    pub hulu_url: Option<String>,
    pub disney_url: Option<String>,
}

impl StreamingLinks {
    /// Platform search pages for a free-text query
    ///
    /// Spaces in the query become `+`.
    pub fn search_links(query: &str) -> Self {
        let q = query.trim().replace(' ', "+");
        Self {
            netflix_url: Some(format!("https://www.netflix.com/search?q={}", q)),
            prime_url: Some(format!("https://www.amazon.com/s?k={}&i=instant-video", q)),
            hulu_url: Some(format!("https://www.hulu.com/search?q={}", q)),
            disney_url: Some(format!("https://www.disneyplus.com/search?q={}", q)),
        }
    }
}

/// A match for the recognized audio before it is merged and persisted
///
/// `url` may be empty here; such candidates are dropped before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateResult {
    pub title: String,
    /// Upstream source label ("YouTube", "TMDB")
    pub platform: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
    pub channel_name: Option<String>,
    pub view_count: Option<String>,
    pub links: StreamingLinks,
}

impl CandidateResult {
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

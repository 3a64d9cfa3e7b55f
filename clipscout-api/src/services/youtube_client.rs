//! YouTube Data API video search client

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ServiceConfig, USER_AGENT};
use crate::models::{CandidateResult, StreamingLinks};

pub const PLATFORM_LABEL: &str = "YouTube";

/// Thumbnail used when a video carries no high-resolution thumbnail
pub const DEFAULT_VIDEO_THUMBNAIL: &str = "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg";

#[derive(Debug, Error)]
pub enum VideoSearchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct YouTubeSearchResponse {
    #[serde(default)]
    pub items: Vec<YouTubeItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct YouTubeItem {
    #[serde(default)]
    pub id: YouTubeItemId,
    #[serde(default)]
    pub snippet: Option<YouTubeSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeItemId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: Option<YouTubeThumbnails>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct YouTubeThumbnails {
    pub high: Option<YouTubeThumbnail>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct YouTubeThumbnail {
    pub url: Option<String>,
}

impl YouTubeItem {
    /// Convert a search hit into a candidate
    ///
    /// Hits without a video id (channels, playlists) yield `None`.
    pub fn into_candidate(self, query: &str) -> Option<CandidateResult> {
        let video_id = self.id.video_id.filter(|id| !id.is_empty())?;
        let snippet = self.snippet.unwrap_or_default();

        let thumbnail = snippet
            .thumbnails
            .and_then(|t| t.high)
            .and_then(|t| t.url)
            .unwrap_or_else(|| DEFAULT_VIDEO_THUMBNAIL.to_string());

        let channel = Some(snippet.channel_title).filter(|c| !c.is_empty());

        Some(CandidateResult {
            title: snippet.title,
            platform: PLATFORM_LABEL.to_string(),
            url: format!("https://www.youtube.com/watch?v={}", video_id),
            thumbnail_url: Some(thumbnail),
            duration: None,
            channel_name: channel,
            view_count: None,
            links: StreamingLinks::search_links(query),
        })
    }
}

/// Video search client
pub struct YouTubeClient {
    http_client: reqwest::Client,
    api_key: String,
    search_url: String,
    max_results: u32,
}

impl YouTubeClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, VideoSearchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| VideoSearchError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: config.youtube_api_key.clone(),
            search_url: config.endpoints.youtube_search.clone(),
            max_results: config.youtube_max_results,
        })
    }

    /// Search videos matching a free-text query
    pub async fn search(&self, query: &str) -> Result<Vec<CandidateResult>, VideoSearchError> {
        let max_results = self.max_results.to_string();
        let params = [
            ("part", "snippet"),
            ("q", query),
            ("key", self.api_key.as_str()),
            ("maxResults", max_results.as_str()),
            ("type", "video"),
        ];

        tracing::debug!(query = %query, max_results = self.max_results, "Querying video search");

        let response = self
            .http_client
            .get(&self.search_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| VideoSearchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VideoSearchError::ApiError(status.as_u16(), error_text));
        }

        let body: YouTubeSearchResponse = response
            .json()
            .await
            .map_err(|e| VideoSearchError::ParseError(e.to_string()))?;

        let results: Vec<CandidateResult> = body
            .items
            .into_iter()
            .filter_map(|item| item.into_candidate(query))
            .collect();

        tracing::info!(query = %query, count = results.len(), "Video search complete");

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "kind": "youtube#searchListResponse",
        "items": [
            {
                "id": {"kind": "youtube#video", "videoId": "YkgkThdzX-8"},
                "snippet": {
                    "title": "Imagine - John Lennon & The Plastic Ono Band",
                    "channelTitle": "johnlennon",
                    "thumbnails": {"high": {"url": "https://i.ytimg.com/vi/YkgkThdzX-8/hqdefault.jpg"}}
                }
            },
            {
                "id": {"kind": "youtube#channel", "channelId": "UC123"},
                "snippet": {"title": "John Lennon - Topic", "channelTitle": "John Lennon - Topic"}
            },
            {
                "id": {"kind": "youtube#video", "videoId": "abc"},
                "snippet": {"title": "Imagine (cover)", "channelTitle": ""}
            }
        ]
    }"#;

    fn candidates() -> Vec<CandidateResult> {
        let response: YouTubeSearchResponse = serde_json::from_str(RESPONSE).unwrap();
        response
            .items
            .into_iter()
            .filter_map(|item| item.into_candidate("Imagine John Lennon"))
            .collect()
    }

    #[test]
    fn test_items_without_video_id_skipped() {
        assert_eq!(candidates().len(), 2);
    }

    #[test]
    fn test_candidate_fields() {
        let first = &candidates()[0];
        assert_eq!(first.platform, "YouTube");
        assert_eq!(first.url, "https://www.youtube.com/watch?v=YkgkThdzX-8");
        assert_eq!(
            first.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/YkgkThdzX-8/hqdefault.jpg")
        );
        assert_eq!(first.channel_name.as_deref(), Some("johnlennon"));
        assert_eq!(
            first.links.hulu_url.as_deref(),
            Some("https://www.hulu.com/search?q=Imagine+John+Lennon")
        );
    }

    #[test]
    fn test_missing_thumbnail_uses_default() {
        let second = &candidates()[1];
        assert_eq!(second.thumbnail_url.as_deref(), Some(DEFAULT_VIDEO_THUMBNAIL));
        assert!(second.channel_name.is_none());
    }

    #[test]
    fn test_empty_response() {
        let response: YouTubeSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
    }
}

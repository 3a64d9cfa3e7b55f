//! TMDB movie/TV metadata client
//!
//! Searches titles across movies and TV, keeps only those two media types,
//! and resolves streaming providers for each hit through
//! [`ProviderResolver`](crate::services::provider_resolver::ProviderResolver).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::config::{ServiceConfig, USER_AGENT};
use crate::models::{CandidateResult, StreamingLinks};
use crate::services::provider_resolver::{ProviderLinks, ProviderResolver};

pub const PLATFORM_LABEL: &str = "TMDB";

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Thumbnail used when an item has no poster
pub const DEFAULT_POSTER: &str = "https://via.placeholder.com/500x750/cccccc/000000?text=No+Image";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Media types the service handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Parse the `media_type` tag of a search hit
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            _ => None,
        }
    }

    /// Path segment used by the per-item endpoints
    pub fn as_path(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbSearchItem>,
}

/// One multi-search hit (movie, TV show or person)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TmdbSearchItem {
    pub id: Option<u64>,
    pub media_type: Option<String>,
    /// Movie title
    pub title: Option<String>,
    /// TV show name
    pub name: Option<String>,
    pub poster_path: Option<String>,
}

impl TmdbSearchItem {
    pub fn media(&self) -> Option<MediaType> {
        self.media_type.as_deref().and_then(MediaType::from_tag)
    }

    /// Movie title, or TV show name
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| self.name.clone())
            .unwrap_or_default()
    }

    pub fn poster_url(&self) -> String {
        match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{}{}", POSTER_BASE_URL, path),
            _ => DEFAULT_POSTER.to_string(),
        }
    }

    /// Build a candidate from this hit and its resolved providers
    ///
    /// The candidate URL is the generic watch page, empty when none was
    /// found. Platform slots prefer the resolved link and fall back to a
    /// search link for the title.
    pub fn into_candidate(self, providers: ProviderLinks) -> CandidateResult {
        let title = self.display_title();
        let search = StreamingLinks::search_links(&title);

        CandidateResult {
            thumbnail_url: Some(self.poster_url()),
            platform: PLATFORM_LABEL.to_string(),
            url: providers.watch_page.unwrap_or_default(),
            duration: None,
            channel_name: None,
            view_count: None,
            links: StreamingLinks {
                netflix_url: providers.netflix.or(search.netflix_url),
                prime_url: providers.prime.or(search.prime_url),
                hulu_url: providers.hulu.or(search.hulu_url),
                disney_url: providers.disney.or(search.disney_url),
            },
            title,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WatchProvidersResponse {
    /// Provider data keyed by region code
    #[serde(default)]
    pub results: HashMap<String, RegionProviders>,
}

/// Provider data for one region
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RegionProviders {
    /// Generic watch page for the region
    pub link: Option<String>,
    /// Subscription providers
    #[serde(default)]
    pub flatrate: Vec<WatchProvider>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WatchProvider {
    pub provider_id: Option<u64>,
    #[serde(default)]
    pub provider_name: String,
}

/// Metadata service client
pub struct TmdbClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    preferred_region: String,
}

impl TmdbClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, MetadataError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| MetadataError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: config.tmdb_api_key.clone(),
            base_url: config.endpoints.tmdb.trim_end_matches('/').to_string(),
            preferred_region: config.preferred_region.clone(),
        })
    }

    async fn get_json<T>(&self, url: &str, params: &[(&str, &str)]) -> Result<T, MetadataError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http_client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| MetadataError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| MetadataError::ParseError(e.to_string()))
    }

    /// Multi-search across movies, TV and people
    pub async fn search_multi(&self, query: &str) -> Result<Vec<TmdbSearchItem>, MetadataError> {
        let url = format!("{}/search/multi", self.base_url);
        let params = [
            ("api_key", self.api_key.as_str()),
            ("query", query),
            ("include_adult", "false"),
        ];

        tracing::debug!(query = %query, "Querying metadata search");

        let body: TmdbSearchResponse = self.get_json(&url, &params).await?;
        Ok(body.results)
    }

    /// Provider data for one item in one region, `None` if the region is absent
    pub async fn fetch_watch_providers(
        &self,
        item_id: u64,
        media_type: MediaType,
        region: &str,
    ) -> Result<Option<RegionProviders>, MetadataError> {
        let url = format!(
            "{}/{}/{}/watch/providers",
            self.base_url,
            media_type.as_path(),
            item_id
        );
        let params = [("api_key", self.api_key.as_str()), ("region", region)];

        let mut body: WatchProvidersResponse = self.get_json(&url, &params).await?;
        Ok(body.results.remove(region))
    }

    /// Search titles and resolve providers for every movie/TV hit
    pub async fn search_titles(&self, title: &str) -> Result<Vec<CandidateResult>, MetadataError> {
        let items = self.search_multi(title).await?;
        let resolver = ProviderResolver::new(self, &self.preferred_region);

        let mut results = Vec::new();
        for item in items {
            let Some(media_type) = item.media() else {
                continue;
            };
            let Some(item_id) = item.id else {
                tracing::debug!("Skipping metadata hit without id");
                continue;
            };

            let providers = resolver.resolve(item_id, media_type).await;
            results.push(item.into_candidate(providers));
        }

        tracing::info!(query = %title, count = results.len(), "Metadata search complete");

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH: &str = r#"{
        "page": 1,
        "results": [
            {"id": 1, "media_type": "movie", "title": "Imagine", "poster_path": "/imagine.jpg"},
            {"id": 2, "media_type": "tv", "name": "Imagine Series", "poster_path": null},
            {"id": 3, "media_type": "person", "name": "John Lennon"}
        ]
    }"#;

    #[test]
    fn test_media_type_tags() {
        assert_eq!(MediaType::from_tag("movie"), Some(MediaType::Movie));
        assert_eq!(MediaType::from_tag("tv"), Some(MediaType::Tv));
        assert_eq!(MediaType::from_tag("person"), None);
        assert_eq!(MediaType::Tv.to_string(), "tv");
    }

    #[test]
    fn test_search_items_parse() {
        let response: TmdbSearchResponse = serde_json::from_str(SEARCH).unwrap();
        let items = response.results;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].media(), Some(MediaType::Movie));
        assert_eq!(items[1].display_title(), "Imagine Series");
        assert_eq!(items[2].media(), None);
    }

    #[test]
    fn test_poster_url() {
        let response: TmdbSearchResponse = serde_json::from_str(SEARCH).unwrap();
        assert_eq!(
            response.results[0].poster_url(),
            "https://image.tmdb.org/t/p/w500/imagine.jpg"
        );
        assert_eq!(response.results[1].poster_url(), DEFAULT_POSTER);
    }

    #[test]
    fn test_candidate_uses_resolved_links() {
        let item = TmdbSearchItem {
            id: Some(1),
            media_type: Some("movie".to_string()),
            title: Some("Imagine".to_string()),
            ..Default::default()
        };
        let providers = ProviderLinks {
            netflix: Some("https://www.themoviedb.org/movie/1/watch?locale=US".to_string()),
            watch_page: Some("https://www.themoviedb.org/movie/1/watch?locale=US".to_string()),
            ..Default::default()
        };

        let candidate = item.into_candidate(providers);

        assert_eq!(candidate.platform, "TMDB");
        assert_eq!(candidate.url, "https://www.themoviedb.org/movie/1/watch?locale=US");
        assert_eq!(
            candidate.links.netflix_url.as_deref(),
            Some("https://www.themoviedb.org/movie/1/watch?locale=US")
        );
        assert_eq!(
            candidate.links.hulu_url.as_deref(),
            Some("https://www.hulu.com/search?q=Imagine")
        );
    }

    #[test]
    fn test_candidate_without_watch_page_has_empty_url() {
        let item = TmdbSearchItem {
            id: Some(2),
            media_type: Some("tv".to_string()),
            name: Some("Imagine Series".to_string()),
            ..Default::default()
        };

        let candidate = item.into_candidate(ProviderLinks::default());

        assert!(!candidate.has_url());
        assert_eq!(candidate.thumbnail_url.as_deref(), Some(DEFAULT_POSTER));
    }

    #[test]
    fn test_watch_providers_parse() {
        let json = r#"{
            "id": 1,
            "results": {
                "US": {
                    "link": "https://www.themoviedb.org/movie/1/watch?locale=US",
                    "flatrate": [{"provider_id": 8, "provider_name": "Netflix"}],
                    "rent": [{"provider_id": 2, "provider_name": "Apple TV"}]
                },
                "GB": {"link": "https://www.themoviedb.org/movie/1/watch?locale=GB"}
            }
        }"#;

        let mut response: WatchProvidersResponse = serde_json::from_str(json).unwrap();
        let us = response.results.remove("US").unwrap();
        assert_eq!(us.flatrate.len(), 1);
        assert_eq!(us.flatrate[0].provider_name, "Netflix");

        let gb = response.results.remove("GB").unwrap();
        assert!(gb.flatrate.is_empty());
        assert!(response.results.remove("IN").is_none());
    }
}

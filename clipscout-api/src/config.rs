//! Service configuration for clipscout-api
//!
//! Resolves one explicit [`ServiceConfig`] at startup (CLI → ENV → TOML →
//! compiled default) that is handed to every upstream client. Business logic
//! never reads process environment directly.

use clipscout_common::config::{
    resolve_number, resolve_setting, CompiledDefaults, RootFolderResolver, TomlConfig,
};
use clipscout_common::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const BIND_ADDRESS_ENV: &str = "CLIPSCOUT_BIND_ADDRESS";
pub const AUDD_API_TOKEN_ENV: &str = "CLIPSCOUT_AUDD_API_TOKEN";
pub const YOUTUBE_API_KEY_ENV: &str = "CLIPSCOUT_YOUTUBE_API_KEY";
pub const TMDB_API_KEY_ENV: &str = "CLIPSCOUT_TMDB_API_KEY";
pub const PREFERRED_REGION_ENV: &str = "CLIPSCOUT_PREFERRED_REGION";
pub const HTTP_TIMEOUT_ENV: &str = "CLIPSCOUT_HTTP_TIMEOUT_SECS";

pub const AUDD_BASE_URL: &str = "https://api.audd.io/";
pub const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

pub const USER_AGENT: &str = concat!("ClipScout/", env!("CARGO_PKG_VERSION"));

/// Upstream service endpoints
///
/// Fixed in production; tests point them at local stub servers.
#[derive(Debug, Clone)]
pub struct UpstreamEndpoints {
    pub audd: String,
    pub youtube_search: String,
    pub tmdb: String,
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self {
            audd: AUDD_BASE_URL.to_string(),
            youtube_search: YOUTUBE_SEARCH_URL.to_string(),
            tmdb: TMDB_BASE_URL.to_string(),
        }
    }
}

/// Command-line overrides (highest priority tier)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub audd_api_token: String,
    pub youtube_api_key: String,
    pub tmdb_api_key: String,
    /// First region tried when resolving watch providers
    pub preferred_region: String,
    /// Per-call timeout for every outbound request
    pub http_timeout: Duration,
    pub youtube_max_results: u32,
    pub endpoints: UpstreamEndpoints,
}

impl ServiceConfig {
    /// Resolve configuration from CLI overrides, environment and TOML
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::for_current_platform();

        let root_folder =
            RootFolderResolver::new(cli.root_folder.clone(), toml.root_folder.clone()).resolve();

        let bind_address = cli
            .bind_address
            .clone()
            .or_else(|| resolve_setting(BIND_ADDRESS_ENV, toml.bind_address.as_deref()))
            .unwrap_or(defaults.bind_address);

        let preferred_region =
            resolve_setting(PREFERRED_REGION_ENV, toml.preferred_region.as_deref())
                .map(|r| r.to_ascii_uppercase())
                .unwrap_or(defaults.preferred_region);

        let timeout_secs = resolve_number(HTTP_TIMEOUT_ENV, toml.http_timeout_secs)?
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.http_timeout_secs);

        Ok(Self {
            root_folder,
            bind_address,
            audd_api_token: resolve_setting(AUDD_API_TOKEN_ENV, toml.audd_api_token.as_deref())
                .unwrap_or_default(),
            youtube_api_key: resolve_setting(YOUTUBE_API_KEY_ENV, toml.youtube_api_key.as_deref())
                .unwrap_or_default(),
            tmdb_api_key: resolve_setting(TMDB_API_KEY_ENV, toml.tmdb_api_key.as_deref())
                .unwrap_or_default(),
            preferred_region,
            http_timeout: Duration::from_secs(timeout_secs),
            youtube_max_results: toml
                .youtube_max_results
                .filter(|n| *n > 0)
                .unwrap_or(defaults.youtube_max_results),
            endpoints: UpstreamEndpoints::default(),
        })
    }

    /// Names of credentials that are not configured
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.audd_api_token.is_empty() {
            missing.push("audd_api_token");
        }
        if self.youtube_api_key.is_empty() {
            missing.push("youtube_api_key");
        }
        if self.tmdb_api_key.is_empty() {
            missing.push("tmdb_api_key");
        }
        missing
    }

    /// Log a warning per missing credential; upstream calls will fail
    pub fn warn_missing_credentials(&self) {
        for name in self.missing_credentials() {
            warn!(
                setting = name,
                "API credential not configured; calls to this service will fail"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_values_used() {
        let toml = TomlConfig {
            root_folder: Some(PathBuf::from("/srv/clipscout")),
            audd_api_token: Some("audd-token".to_string()),
            youtube_api_key: Some("yt-key".to_string()),
            tmdb_api_key: Some("tmdb-key".to_string()),
            youtube_max_results: Some(7),
            ..Default::default()
        };
        let cli = CliOverrides {
            bind_address: Some("0.0.0.0:9000".to_string()),
            ..Default::default()
        };

        let config = ServiceConfig::resolve(&cli, &toml).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:9000");
        assert_eq!(config.youtube_max_results, 7);
        assert!(config.missing_credentials().is_empty());
    }

    #[test]
    fn test_missing_credentials_listed() {
        let toml = TomlConfig {
            tmdb_api_key: Some("tmdb-key".to_string()),
            ..Default::default()
        };
        let mut config = ServiceConfig::resolve(&CliOverrides::default(), &toml).unwrap();
        config.audd_api_token.clear();
        config.youtube_api_key.clear();

        assert_eq!(
            config.missing_credentials(),
            vec!["audd_api_token", "youtube_api_key"]
        );
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = UpstreamEndpoints::default();
        assert_eq!(endpoints.audd, "https://api.audd.io/");
        assert_eq!(endpoints.tmdb, "https://api.themoviedb.org/3");
    }
}

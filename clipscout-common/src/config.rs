//! Configuration loading and root folder resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority, where one exists)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unreadable TOML file never stops startup; it is logged and
//! treated as empty.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit TOML config file
pub const CONFIG_PATH_ENV: &str = "CLIPSCOUT_CONFIG";

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "CLIPSCOUT_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "clipscout.db";

/// Upload storage folder inside the root folder
pub const MEDIA_FOLDER_NAME: &str = "media";

/// Compiled defaults used when neither environment nor TOML provide a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub preferred_region: String,
    pub http_timeout_secs: u64,
    pub youtube_max_results: u32,
    pub log_level: String,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was compiled for
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            bind_address: "127.0.0.1:5780".to_string(),
            preferred_region: "US".to_string(),
            http_timeout_secs: 8,
            youtube_max_results: 5,
            log_level: "info".to_string(),
        }
    }
}

/// Logging section of the TOML file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default tracing directive (e.g. "info", "clipscout_api=debug")
    pub level: Option<String>,
}

/// On-disk TOML configuration
///
/// All keys are optional; absent keys fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub audd_api_token: Option<String>,
    pub youtube_api_key: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub preferred_region: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub youtube_max_results: Option<u32>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse TOML text into a config
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }
}

/// Locate the TOML config file
///
/// `CLIPSCOUT_CONFIG` wins; otherwise `<config_dir>/clipscout/config.toml`.
/// The returned path may not exist.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir().map(|d| d.join("clipscout").join("config.toml"))
}

/// Load a TOML config file
///
/// A missing file yields the empty config. A file that exists but does not
/// parse is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        debug!("Config file not found: {}", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    TomlConfig::from_toml_str(&content)
}

/// Load the TOML config from its default location, degrading to empty
pub fn load_default_toml_config() -> TomlConfig {
    let Some(path) = config_file_path() else {
        warn!("Could not determine config directory, using defaults");
        return TomlConfig::default();
    };

    match load_toml_config(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Resolve a string setting: environment variable first, then TOML value
///
/// Blank values are treated as unset at every tier.
pub fn resolve_setting(env_var_name: &str, toml_value: Option<&str>) -> Option<String> {
    if let Ok(value) = std::env::var(env_var_name) {
        if is_set(&value) {
            return Some(value.trim().to_string());
        }
    }

    toml_value
        .filter(|v| is_set(v))
        .map(|v| v.trim().to_string())
}

/// Resolve a numeric setting: environment variable first, then TOML value
///
/// An environment value that does not parse is a configuration error rather
/// than a silent fallback.
pub fn resolve_number<T>(env_var_name: &str, toml_value: Option<T>) -> Result<Option<T>>
where
    T: std::str::FromStr,
{
    if let Ok(raw) = std::env::var(env_var_name) {
        if is_set(&raw) {
            let parsed = raw.trim().parse::<T>().map_err(|_| {
                Error::Config(format!("{} must be a number, got '{}'", env_var_name, raw))
            })?;
            return Ok(Some(parsed));
        }
    }

    Ok(toml_value)
}

/// Non-empty, non-whitespace
pub fn is_set(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Root folder resolution following the standard priority order
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, toml_value: Option<PathBuf>) -> Self {
        Self { cli_arg, toml_value }
    }

    /// Resolve root folder (never fails, falls back to compiled default)
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if is_set(&path) {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_value {
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder layout on first run
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create root and media folders if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        std::fs::create_dir_all(self.media_path())?;
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    pub fn media_path(&self) -> PathBuf {
        self.root_folder.join(MEDIA_FOLDER_NAME)
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("clipscout"))
        .unwrap_or_else(|| PathBuf::from("./clipscout_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_toml() {
        let config = TomlConfig::from_toml_str(
            r#"
            root_folder = "/srv/clipscout"
            bind_address = "0.0.0.0:8080"
            audd_api_token = "audd"
            preferred_region = "DE"
            http_timeout_secs = 3

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/clipscout")));
        assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(config.audd_api_token.as_deref(), Some("audd"));
        assert_eq!(config.preferred_region.as_deref(), Some("DE"));
        assert_eq!(config.http_timeout_secs, Some(3));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert!(config.tmdb_api_key.is_none());
    }

    #[test]
    fn test_empty_toml_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.root_folder.is_none());
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("http_timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_is_set() {
        assert!(is_set("key"));
        assert!(!is_set(""));
        assert!(!is_set("   "));
    }

    #[test]
    fn test_initializer_paths() {
        let init = RootFolderInitializer::new(PathBuf::from("/tmp/cs"));
        assert_eq!(init.database_path(), PathBuf::from("/tmp/cs/clipscout.db"));
        assert_eq!(init.media_path(), PathBuf::from("/tmp/cs/media"));
    }
}

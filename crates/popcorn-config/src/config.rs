use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Public OMDb key shipped with the app; override it in config.toml
pub const DEFAULT_API_KEY: &str = "99947ae6";
pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Store keys double as file names, so only ASCII letters, digits, '-' and '_' are allowed
pub fn is_valid_store_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
    #[serde(default)]
    pub rating: RatingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Queries shorter than this (in characters) never reach the network
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Number of stars on the details panel rating widget
    #[serde(default = "default_max_rating")]
    pub max_rating: u8,
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_min_query_len() -> usize {
    3
}

fn default_storage_key() -> String {
    "watched".to_string()
}

fn default_max_rating() -> u8 {
    10
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { min_query_len: default_min_query_len() }
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self { storage_key: default_storage_key() }
    }
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self { max_rating: default_max_rating() }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults when it does not exist yet
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.omdb.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("omdb.api_key must not be empty"));
        }
        if self.omdb.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("omdb.base_url must not be empty"));
        }
        if self.omdb.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("omdb.timeout_seconds must be positive"));
        }
        if self.search.min_query_len == 0 {
            return Err(anyhow::anyhow!("search.min_query_len must be at least 1"));
        }
        if self.watchlist.storage_key.trim().is_empty() {
            return Err(anyhow::anyhow!("watchlist.storage_key must not be empty"));
        }
        if !is_valid_store_key(&self.watchlist.storage_key) {
            return Err(anyhow::anyhow!(
                "watchlist.storage_key may only contain letters, digits, '-' and '_', got {:?}",
                self.watchlist.storage_key
            ));
        }
        if !(1..=10).contains(&self.rating.max_rating) {
            return Err(anyhow::anyhow!(
                "rating.max_rating must be between 1 and 10, got {}",
                self.rating.max_rating
            ));
        }
        Ok(())
    }
}

pub mod browse;
pub mod config;
pub mod details;
pub mod prompts;
pub mod search;
pub mod watchlist;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use popcorn_config::{Config, PathManager};
use popcorn_core::{FileStore, Watchlist};
use popcorn_sources::{MovieSource, OmdbClient};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Paths and configuration shared by every command that talks to OMDb or the watchlist
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
        debug!(config = %config_file.display(), "Loaded configuration");
        Ok(Self { paths, config })
    }

    pub fn source(&self) -> Result<Arc<dyn MovieSource>> {
        let client = OmdbClient::from_config(&self.config.omdb)
            .map_err(|e| eyre!("Failed to create OMDb client: {}", e))?;
        Ok(Arc::new(client))
    }

    pub fn watchlist(&self) -> Result<Watchlist> {
        let store = FileStore::new(&self.paths.store_dir())
            .map_err(|e| eyre!("Failed to open store at {}: {}", self.paths.store_dir().display(), e))?;
        Ok(Watchlist::load(Arc::new(store), &self.config.watchlist.storage_key))
    }
}

/// Spinner on stderr while a request is pending; hidden when stderr is not a terminal
pub fn spinner(message: &str) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub mod config;
pub mod paths;

pub use config::{Config, OmdbConfig, RatingConfig, SearchConfig, WatchlistConfig, DEFAULT_API_KEY, DEFAULT_BASE_URL, is_valid_store_key};
pub use paths::{PathManager, container_base_path};

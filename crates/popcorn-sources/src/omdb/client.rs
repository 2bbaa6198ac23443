use async_trait::async_trait;
use popcorn_config::OmdbConfig;
use popcorn_models::{MovieDetail, SearchResultSummary};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use crate::error::SourceError;
use crate::omdb::api;
use crate::traits::MovieSource;

/// HTTP client for the OMDb API.
#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            api_key,
            base_url,
        })
    }

    pub fn from_config(config: &OmdbConfig) -> Result<Self, SourceError> {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

#[async_trait]
impl MovieSource for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResultSummary>, SourceError> {
        api::search_titles(&self.client, &self.base_url, &self.api_key, query).await
    }

    async fn get_detail(&self, imdb_id: &str) -> Result<MovieDetail, SourceError> {
        api::get_title(&self.client, &self.base_url, &self.api_key, imdb_id).await
    }
}

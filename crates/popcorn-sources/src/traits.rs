use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResultSummary};
use crate::error::SourceError;

/// A movie metadata provider the fetchers talk to.
#[async_trait]
pub trait MovieSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Titles matching `query`. A "no match" answer is `SourceError::NotFound`.
    async fn search(&self, query: &str) -> Result<Vec<SearchResultSummary>, SourceError>;

    /// Full record for one title id.
    async fn get_detail(&self, imdb_id: &str) -> Result<MovieDetail, SourceError>;
}

use popcorn_models::SearchResultSummary;
use popcorn_sources::MovieSource;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, warn};
use crate::request::{self, InFlight, SharedState};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch movies";
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResultSummary>,
    pub error: Option<String>,
    pub is_loading: bool,
}

/// Search-as-you-type against a [`MovieSource`].
///
/// At most one search is outstanding: each query change cancels the previous
/// request, and only the response of the latest query commits.
pub struct SearchQueryFetcher {
    source: Arc<dyn MovieSource>,
    shared: SharedState<SearchState>,
    in_flight: Option<InFlight>,
    min_query_len: usize,
    changed: Arc<Notify>,
}

impl SearchQueryFetcher {
    pub fn new(source: Arc<dyn MovieSource>, min_query_len: usize, changed: Arc<Notify>) -> Self {
        Self {
            source,
            shared: request::shared(SearchState::default()),
            in_flight: None,
            min_query_len,
            changed,
        }
    }

    pub fn state(&self) -> SearchState {
        request::lock(&self.shared).state.clone()
    }

    pub fn query(&self) -> String {
        request::lock(&self.shared).state.query.clone()
    }

    /// React to a new query. Queries below the minimum length clear results
    /// and error without touching the network.
    pub fn set_query(&mut self, query: &str) {
        if self.query() == query {
            return;
        }
        self.cancel_in_flight();

        let too_short = query.chars().count() < self.min_query_len;
        let sequence = {
            let mut guard = request::lock(&self.shared);
            guard.sequence += 1;
            let state = &mut guard.state;
            state.query = query.to_string();
            state.error = None;
            if too_short {
                state.results.clear();
                state.is_loading = false;
            } else {
                state.is_loading = true;
            }
            guard.sequence
        };
        self.changed.notify_one();

        if too_short {
            debug!(query = %query, "Query below {} characters, not searching", self.min_query_len);
            return;
        }

        debug!(query = %query, sequence, "Starting search");
        let source = Arc::clone(&self.source);
        let owned_query = query.to_string();
        self.in_flight = Some(request::spawn_request(
            Arc::clone(&self.shared),
            sequence,
            Arc::clone(&self.changed),
            async move { source.search(&owned_query).await },
            |state: &mut SearchState, outcome| {
                state.is_loading = false;
                match outcome {
                    Ok(results) => {
                        state.results = results;
                        state.error = None;
                    }
                    Err(e) if e.is_not_found() => {
                        debug!(query = %state.query, "No match: {}", e);
                        state.results.clear();
                        state.error = Some(NOT_FOUND_MESSAGE.to_string());
                    }
                    Err(e) => {
                        warn!(query = %state.query, "Search failed: {}", e);
                        state.error = Some(FETCH_FAILED_MESSAGE.to_string());
                    }
                }
            },
        ));
    }

    /// Cancel the outstanding search, if any, and clear the loading flag.
    pub fn cancel(&mut self) {
        if self.in_flight.is_some() {
            self.cancel_in_flight();
            let mut guard = request::lock(&self.shared);
            guard.sequence += 1;
            guard.state.is_loading = false;
            drop(guard);
            self.changed.notify_one();
        }
    }

    /// Wait for the outstanding search to finish.
    pub async fn settle(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.join().await;
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(sequence = in_flight.sequence(), "Cancelling superseded search");
            in_flight.cancel();
        }
    }
}

impl Drop for SearchQueryFetcher {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

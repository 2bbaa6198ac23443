use popcorn_models::MovieDetail;
use popcorn_sources::MovieSource;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, warn};
use crate::request::{self, InFlight, SharedState};
use crate::search::NOT_FOUND_MESSAGE;

/// Window title shown when no detail is loaded
pub const DEFAULT_TITLE: &str = "usePopcorn";

pub const DETAIL_FAILED_MESSAGE: &str = "Failed to load movie details";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsState {
    pub selected_id: Option<String>,
    pub detail: Option<MovieDetail>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Loads the full record of the selected title.
///
/// Selecting another title while a load is pending cancels it, so only the
/// latest selection's record is ever committed.
pub struct DetailsFetcher {
    source: Arc<dyn MovieSource>,
    shared: SharedState<DetailsState>,
    in_flight: Option<InFlight>,
    changed: Arc<Notify>,
}

impl DetailsFetcher {
    pub fn new(source: Arc<dyn MovieSource>, changed: Arc<Notify>) -> Self {
        Self {
            source,
            shared: request::shared(DetailsState::default()),
            in_flight: None,
            changed,
        }
    }

    pub fn state(&self) -> DetailsState {
        request::lock(&self.shared).state.clone()
    }

    pub fn select(&mut self, imdb_id: &str) {
        if imdb_id.is_empty() {
            self.close();
            return;
        }
        {
            let guard = request::lock(&self.shared);
            // Re-selecting a title whose load failed retries it
            if guard.state.selected_id.as_deref() == Some(imdb_id) && guard.state.error.is_none() {
                return;
            }
        }
        self.cancel_in_flight();

        let sequence = {
            let mut guard = request::lock(&self.shared);
            guard.sequence += 1;
            guard.state = DetailsState {
                selected_id: Some(imdb_id.to_string()),
                detail: None,
                is_loading: true,
                error: None,
            };
            guard.sequence
        };
        self.changed.notify_one();

        debug!(imdb_id = %imdb_id, sequence, "Loading details");
        let source = Arc::clone(&self.source);
        let owned_id = imdb_id.to_string();
        self.in_flight = Some(request::spawn_request(
            Arc::clone(&self.shared),
            sequence,
            Arc::clone(&self.changed),
            async move { source.get_detail(&owned_id).await },
            |state: &mut DetailsState, outcome| {
                state.is_loading = false;
                match outcome {
                    Ok(detail) => {
                        state.detail = Some(detail);
                        state.error = None;
                    }
                    Err(e) if e.is_not_found() => {
                        debug!("No detail for {:?}: {}", state.selected_id, e);
                        state.error = Some(NOT_FOUND_MESSAGE.to_string());
                    }
                    Err(e) => {
                        warn!("Loading details for {:?} failed: {}", state.selected_id, e);
                        state.error = Some(DETAIL_FAILED_MESSAGE.to_string());
                    }
                }
            },
        ));
    }

    /// Drop the selection and any pending load
    pub fn close(&mut self) {
        self.cancel_in_flight();
        let mut guard = request::lock(&self.shared);
        guard.sequence += 1;
        guard.state = DetailsState::default();
        drop(guard);
        self.changed.notify_one();
    }

    /// Title for the terminal window: reflects the loaded record, if any
    pub fn display_title(&self) -> String {
        match &request::lock(&self.shared).state.detail {
            Some(detail) => format!("{}: {}", DEFAULT_TITLE, detail.title),
            None => DEFAULT_TITLE.to_string(),
        }
    }

    pub async fn settle(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.join().await;
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(sequence = in_flight.sequence(), "Cancelling superseded detail load");
            in_flight.cancel();
        }
    }
}

impl Drop for DetailsFetcher {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

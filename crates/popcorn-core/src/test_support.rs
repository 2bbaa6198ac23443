use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResultSummary};
use popcorn_sources::{MovieSource, SourceError};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::oneshot;

type SearchReply = Result<Vec<SearchResultSummary>, SourceError>;
type DetailReply = Result<MovieDetail, SourceError>;

/// Movie source whose answers are released by the test, in any order.
#[derive(Default)]
pub struct FakeSource {
    search_gates: Mutex<HashMap<String, oneshot::Receiver<SearchReply>>>,
    detail_gates: Mutex<HashMap<String, oneshot::Receiver<DetailReply>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending answer for `query`; the request blocks until the sender fires.
    pub fn gate_search(&self, query: &str) -> oneshot::Sender<SearchReply> {
        let (tx, rx) = oneshot::channel();
        self.search_gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    pub fn respond_search(&self, query: &str, reply: SearchReply) {
        let _ = self.gate_search(query).send(reply);
    }

    pub fn gate_detail(&self, imdb_id: &str) -> oneshot::Sender<DetailReply> {
        let (tx, rx) = oneshot::channel();
        self.detail_gates.lock().unwrap().insert(imdb_id.to_string(), rx);
        tx
    }

    pub fn respond_detail(&self, imdb_id: &str, reply: DetailReply) {
        let _ = self.gate_detail(imdb_id).send(reply);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieSource for FakeSource {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResultSummary>, SourceError> {
        self.calls.lock().unwrap().push(format!("search:{}", query));
        let gate = self.search_gates.lock().unwrap().remove(query);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(SourceError::Transport("gate dropped".to_string()))),
            None => Err(SourceError::Transport(format!("no answer for {}", query))),
        }
    }

    async fn get_detail(&self, imdb_id: &str) -> Result<MovieDetail, SourceError> {
        self.calls.lock().unwrap().push(format!("detail:{}", imdb_id));
        let gate = self.detail_gates.lock().unwrap().remove(imdb_id);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(SourceError::Transport("gate dropped".to_string()))),
            None => Err(SourceError::Transport(format!("no answer for {}", imdb_id))),
        }
    }
}

pub fn result(imdb_id: &str, title: &str) -> SearchResultSummary {
    SearchResultSummary {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: "1997".to_string(),
        poster_url: format!("https://example.com/{}.jpg", imdb_id),
    }
}

pub fn detail(imdb_id: &str, title: &str) -> MovieDetail {
    MovieDetail {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: "1999".to_string(),
        director: "Someone".to_string(),
        poster_url: format!("https://example.com/{}.jpg", imdb_id),
        plot: "Things happen.".to_string(),
        genre: "Drama".to_string(),
        actors: "A, B".to_string(),
        critic_rating: 8.0,
        runtime_minutes: 120,
    }
}

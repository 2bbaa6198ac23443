use serde::{Deserialize, Serialize};

/// One row of a title search. Recreated on every successful search, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResultSummary {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
}

/// Full record for a single title, fetched fresh on every selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub director: String,
    pub poster_url: String,
    pub plot: String,
    pub genre: String,
    pub actors: String,
    /// Aggregate critic rating supplied by the metadata source (0 when unknown)
    pub critic_rating: f64,
    /// Runtime in minutes (0 when unknown)
    pub runtime_minutes: u32,
}

use serde::{Deserialize, Serialize};
use crate::lenient;
use crate::movie::MovieDetail;

/// A title the user added to their watchlist together with their own rating.
///
/// Field names on disk follow the `watched` store layout (`imdbID`, `Title`, ...)
/// so existing stores stay readable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistEntry {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Poster")]
    pub poster_url: String,
    #[serde(rename = "runtime", default, deserialize_with = "lenient::deserialize_minutes")]
    pub runtime_minutes: u32,
    #[serde(rename = "imdbRating", default, deserialize_with = "lenient::deserialize_rating")]
    pub critic_rating: f64,
    #[serde(rename = "userRating")]
    pub user_rating: u8,
    #[serde(rename = "timesRated", default)]
    pub times_rated: u32,
}

impl WatchlistEntry {
    /// Build an entry from a loaded detail record. The entry always carries the
    /// detail's id.
    pub fn from_detail(detail: &MovieDetail, user_rating: u8, times_rated: u32) -> Self {
        Self {
            imdb_id: detail.imdb_id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            runtime_minutes: detail.runtime_minutes,
            critic_rating: detail.critic_rating,
            user_rating,
            times_rated,
        }
    }
}

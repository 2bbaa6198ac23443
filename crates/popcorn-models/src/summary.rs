use serde::{Deserialize, Serialize};
use crate::watchlist::WatchlistEntry;

/// Aggregate statistics over a watchlist. Always derived, never stored.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct WatchSummary {
    pub count: usize,
    pub mean_critic_rating: f64,
    pub mean_user_rating: f64,
    pub mean_runtime_minutes: f64,
}

/// Compute the summary of `entries`. Every mean of an empty list is 0.
pub fn summarize(entries: &[WatchlistEntry]) -> WatchSummary {
    if entries.is_empty() {
        return WatchSummary::default();
    }

    let count = entries.len();
    let critic: f64 = entries.iter().map(|e| e.critic_rating).sum();
    let user: f64 = entries.iter().map(|e| f64::from(e.user_rating)).sum();
    let runtime: f64 = entries.iter().map(|e| f64::from(e.runtime_minutes)).sum();

    WatchSummary {
        count,
        mean_critic_rating: critic / count as f64,
        mean_user_rating: user / count as f64,
        mean_runtime_minutes: runtime / count as f64,
    }
}

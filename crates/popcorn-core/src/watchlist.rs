use anyhow::Result;
use popcorn_models::{summarize, WatchSummary, WatchlistEntry};
use std::sync::Arc;
use tracing::info;
use crate::persistent_list::PersistentList;
use crate::store::KeyValueStore;

/// The user's watchlist, persisted under a single store key.
///
/// Duplicate ids are accepted: `add` never checks whether the title is
/// already present. Callers that want to prevent duplicates check `contains`.
pub struct Watchlist {
    list: PersistentList<WatchlistEntry>,
}

impl Watchlist {
    pub fn load(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            list: PersistentList::load(store, key),
        }
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        self.list.items()
    }

    pub fn len(&self) -> usize {
        self.list.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.items().is_empty()
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.list.items().iter().any(|e| e.imdb_id == imdb_id)
    }

    /// Append `entry` to the end of the list
    pub fn add(&mut self, entry: WatchlistEntry) -> Result<()> {
        info!("Adding {} ({}) to watchlist", entry.title, entry.imdb_id);
        self.list.update(|items| items.push(entry))
    }

    /// Remove every entry with `imdb_id`. Returns how many were removed.
    pub fn remove(&mut self, imdb_id: &str) -> Result<usize> {
        let before = self.len();
        if !self.contains(imdb_id) {
            return Ok(0);
        }
        self.list.update(|items| items.retain(|e| e.imdb_id != imdb_id))?;
        let removed = before - self.len();
        info!("Removed {} watchlist entries for {}", removed, imdb_id);
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.list.update(|items| items.clear())
    }

    /// Recomputed on every call
    pub fn summary(&self) -> WatchSummary {
        summarize(self.list.items())
    }
}

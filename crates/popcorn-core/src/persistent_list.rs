use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use crate::store::KeyValueStore;

/// An in-memory list mirrored to a key-value store.
///
/// The list is read once on construction; a missing key or unreadable value
/// yields an empty list. Every mutation rewrites the whole value. This type is
/// the only writer of its key.
pub struct PersistentList<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    items: Vec<T>,
}

impl<T> PersistentList<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn load(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        let items = match store.get(key) {
            Ok(Some(content)) => match serde_json::from_str::<Vec<T>>(&content) {
                Ok(items) => {
                    info!("Loaded {} items from store key '{}'", items.len(), key);
                    items
                }
                Err(e) => {
                    warn!("Store key '{}' is not a valid list ({}). Starting empty.", key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read store key '{}': {}. Starting empty.", key, e);
                Vec::new()
            }
        };

        Self {
            store,
            key: key.to_string(),
            items,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Apply `mutate` and persist the full list.
    ///
    /// The in-memory change is kept even if the write fails.
    pub fn update<F>(&mut self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<T>),
    {
        mutate(&mut self.items);
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string(&self.items)?;
        self.store.set(&self.key, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_missing_key_loads_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let list: PersistentList<u32> = PersistentList::load(store, "numbers");
        assert!(list.items().is_empty());
    }

    #[test]
    fn test_corrupt_value_loads_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set("numbers", "{not json").unwrap();
        let list: PersistentList<u32> = PersistentList::load(store, "numbers");
        assert!(list.items().is_empty());
    }

    #[test]
    fn test_literal_null_loads_empty() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set("numbers", "null").unwrap();
        let list: PersistentList<u32> = PersistentList::load(store, "numbers");
        assert!(list.items().is_empty());
    }

    #[test]
    fn test_update_rewrites_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut list: PersistentList<u32> = PersistentList::load(store.clone(), "numbers");

        list.update(|items| items.push(1)).unwrap();
        list.update(|items| items.push(2)).unwrap();
        assert_eq!(store.get("numbers").unwrap().as_deref(), Some("[1,2]"));

        let reloaded: PersistentList<u32> = PersistentList::load(store, "numbers");
        assert_eq!(reloaded.items(), &[1, 2]);
    }
}

//! Key-value storage layer.
//!
//! Collections are stored whole, one JSON array per key. Reads never fail:
//! a missing or damaged slot reads back as an empty collection, and an
//! element that does not decode is skipped but kept in storage.

mod memory;
mod schema;
mod sqlite;

pub use memory::*;
pub use schema::*;
pub use sqlite::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A string-keyed slot store.
pub trait KeyValueStore {
    /// Raw value stored under `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Drop `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// A collection as loaded for a rewrite.
///
/// Elements that do not decode as `T` are held raw and written back after
/// the decoded ones, so saving never drops a stored record.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    pub items: Vec<T>,
    undecoded: Vec<serde_json::Value>,
}

impl<T> Collection<T> {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            undecoded: Vec::new(),
        }
    }

    /// Number of stored elements that did not decode.
    pub fn undecoded_len(&self) -> usize {
        self.undecoded.len()
    }

    /// Keep at most `limit` elements in total, decoded ones first.
    pub fn truncate(&mut self, limit: usize) {
        self.items.truncate(limit);
        self.undecoded.truncate(limit.saturating_sub(self.items.len()));
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T: DeserializeOwned> Collection<T> {
    /// Load the collection stored under `key`, element by element.
    ///
    /// Absent, unreadable, unparsable or non-array slots load as empty.
    pub fn load(store: &dyn KeyValueStore, key: &str) -> Self {
        let Some(elements) = read_elements(store, key) else {
            return Self::empty();
        };

        let mut collection = Self::empty();
        for (index, element) in elements.into_iter().enumerate() {
            match T::deserialize(&element) {
                Ok(item) => collection.items.push(item),
                Err(e) => {
                    warn!(key, index, error = %e, "skipping element with unexpected shape");
                    collection.undecoded.push(element);
                }
            }
        }
        collection
    }
}

impl<T: Serialize> Collection<T> {
    /// Replace the slot under `key` with the decoded items followed by the
    /// undecoded elements.
    pub fn save(&self, store: &dyn KeyValueStore, key: &str) -> StoreResult<()> {
        let mut elements = self
            .items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        elements.extend(self.undecoded.iter().cloned());
        let json = serde_json::to_string(&elements)?;
        store.set(key, &json)
    }
}

fn read_elements(store: &dyn KeyValueStore, key: &str) -> Option<Vec<serde_json::Value>> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "failed to read collection, treating as empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(serde_json::Value::Array(elements)) => Some(elements),
        Ok(_) => {
            warn!(key, "stored value is not an array, treating as empty");
            None
        }
        Err(e) => {
            warn!(key, error = %e, "corrupt collection, treating as empty");
            None
        }
    }
}

/// Read the collection stored under `key`.
///
/// Elements that do not decode as `T` are skipped. Absent, unreadable,
/// unparsable or non-array slots yield an empty vector.
pub fn read_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    Collection::load(store, key).into_items()
}

/// Serialize `items` and replace the slot under `key`.
pub fn write_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> StoreResult<()> {
    let json = serde_json::to_string(items)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_slot_reads_empty() {
        let store = MemoryStore::new();
        let items: Vec<serde_json::Value> = read_collection(&store, "patients");
        assert!(items.is_empty());
    }

    #[test]
    fn test_corrupt_slot_reads_empty() {
        let store = MemoryStore::new();
        store.set("patients", "{not json").unwrap();
        let items: Vec<serde_json::Value> = read_collection(&store, "patients");
        assert!(items.is_empty());
    }

    #[test]
    fn test_non_array_slot_reads_empty() {
        let store = MemoryStore::new();
        store.set("patients", r#"{"id": "a"}"#).unwrap();
        let items: Vec<serde_json::Value> = read_collection(&store, "patients");
        assert!(items.is_empty());

        store.set("patients", "null").unwrap();
        let items: Vec<serde_json::Value> = read_collection(&store, "patients");
        assert!(items.is_empty());
    }

    #[test]
    fn test_bad_elements_are_skipped() {
        let store = MemoryStore::new();
        store.set("numbers", r#"[1, "two", 3]"#).unwrap();
        let items: Vec<u32> = read_collection(&store, "numbers");
        assert_eq!(items, vec![1, 3]);
    }

    #[test]
    fn test_save_keeps_undecoded_elements() {
        let store = MemoryStore::new();
        store.set("numbers", r#"[1, "two", 3]"#).unwrap();

        let mut numbers: Collection<u32> = Collection::load(&store, "numbers");
        assert_eq!(numbers.undecoded_len(), 1);
        numbers.items.insert(0, 0);
        numbers.save(&store, "numbers").unwrap();

        assert_eq!(store.get("numbers").unwrap().as_deref(), Some(r#"[0,1,3,"two"]"#));
    }

    #[test]
    fn test_truncate_drops_undecoded_last() {
        let store = MemoryStore::new();
        store.set("numbers", r#"["a", 1, "b", 2]"#).unwrap();

        let mut numbers: Collection<u32> = Collection::load(&store, "numbers");
        numbers.truncate(3);
        assert_eq!(numbers.items, vec![1, 2]);
        assert_eq!(numbers.undecoded_len(), 1);

        numbers.truncate(1);
        assert_eq!(numbers.items, vec![1]);
        assert_eq!(numbers.undecoded_len(), 0);
    }

    #[test]
    fn test_write_then_read() {
        let store = MemoryStore::new();
        write_collection(&store, "numbers", &[3u32, 1, 2]).unwrap();
        let items: Vec<u32> = read_collection(&store, "numbers");
        assert_eq!(items, vec![3, 1, 2]);
        assert_eq!(store.get("numbers").unwrap().as_deref(), Some("[3,1,2]"));
    }
}

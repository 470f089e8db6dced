//! Activity log repository.
//!
//! A rolling, newest-first journal capped at [`ACTIVITY_LIMIT`] entries.
//! Older entries fall off the end and are not archived anywhere.

use tracing::debug;

use super::RepoResult;
use crate::models::{ActivityEntry, ActivityMetadata};
use crate::store::{read_collection, write_collection, Collection, KeyValueStore};

/// Maximum number of entries kept.
pub const ACTIVITY_LIMIT: usize = 50;

pub struct ActivityRepository<'a> {
    store: &'a dyn KeyValueStore,
    key: &'a str,
}

impl<'a> ActivityRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore, key: &'a str) -> Self {
        Self { store, key }
    }

    /// All entries, newest first.
    pub fn list(&self) -> Vec<ActivityEntry> {
        read_collection(self.store, self.key)
    }

    /// Prepend a new entry and return the trimmed log.
    ///
    /// An empty message drops the entry and returns the log unchanged.
    pub fn add(&self, message: &str, metadata: ActivityMetadata) -> RepoResult<Vec<ActivityEntry>> {
        if message.is_empty() {
            debug!("dropped activity entry without message");
            return Ok(self.list());
        }

        let entry = ActivityEntry::new(message.to_string(), metadata);
        let mut entries: Collection<ActivityEntry> = Collection::load(self.store, self.key);
        entries.items.insert(0, entry);
        entries.truncate(ACTIVITY_LIMIT);

        entries.save(self.store, self.key)?;
        Ok(entries.into_items())
    }

    /// Remove one entry.
    pub fn delete(&self, id: &str) -> RepoResult<Vec<ActivityEntry>> {
        let mut entries: Collection<ActivityEntry> = Collection::load(self.store, self.key);
        let before = entries.items.len();
        entries.items.retain(|e| e.id != id);

        if entries.items.len() == before {
            debug!(id, "delete skipped, no such activity entry");
            return Ok(entries.into_items());
        }

        entries.save(self.store, self.key)?;
        Ok(entries.into_items())
    }

    /// Empty the log.
    pub fn clear(&self) -> RepoResult<Vec<ActivityEntry>> {
        let entries: Vec<ActivityEntry> = Vec::new();
        write_collection(self.store, self.key, &entries)?;
        debug!("cleared activity log");
        Ok(entries)
    }
}

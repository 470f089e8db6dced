//! Durable store backed by a single SQLite table.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use super::{KeyValueStore, StoreResult, SCHEMA};

/// SQLite connection wrapper exposing the `kv_store` table as slots.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at path, creating it if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> StoreResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// All keys currently stored, sorted.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            [key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn.execute("DELETE FROM kv_store WHERE key = ?", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let store = SqliteStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_set_overwrites() {
        let store = SqliteStore::open_in_memory().unwrap();

        store.set("patients", "[]").unwrap();
        store.set("patients", r#"[{"id":"a"}]"#).unwrap();

        assert_eq!(
            store.get("patients").unwrap(),
            Some(r#"[{"id":"a"}]"#.to_string())
        );
        assert_eq!(store.keys().unwrap(), vec!["patients".to_string()]);
    }

    #[test]
    fn test_get_missing_and_remove() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("activity").unwrap(), None);

        store.set("activity", "[]").unwrap();
        store.remove("activity").unwrap();
        assert_eq!(store.get("activity").unwrap(), None);
        assert!(store.keys().unwrap().is_empty());
    }
}

//! SQLite schema definition.

/// Schema for the durable key-value store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Key-Value Slots (one JSON array per collection)
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

//! Record storage
//!
//! Records are string-keyed JSON values, always read and written whole.
//! `SqliteStore` persists them in `~/.studyquest/progress.db`; `MemoryStore`
//! keeps them in process.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Key-value store holding whole JSON records
pub trait RecordStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    /// Keys starting with `prefix` (e.g. `"player:"`), sorted
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Store key of a learner's progress record
pub fn progress_key(user_id: &str) -> String {
    format!("progress:{user_id}")
}

/// Store key of a player record
pub fn player_key(user_id: &str) -> String {
    format!("player:{user_id}")
}

/// Load and decode a record.
///
/// Missing, unreadable and undecodable records all come back as `None`;
/// the caller starts from a fresh record instead of failing.
pub fn load_record<T: DeserializeOwned>(store: &dyn RecordStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "No stored record, starting fresh");
            return None;
        }
        Err(e) => {
            warn!(key, "Failed to read record, starting fresh: {:#}", e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(key, "Corrupted record replaced by defaults: {}", e);
            None
        }
    }
}

/// Encode and write a record, replacing whatever was stored
pub fn save_record<T: Serialize>(store: &dyn RecordStore, key: &str, record: &T) -> Result<()> {
    let raw = serde_json::to_string(record)
        .with_context(|| format!("Failed to serialize record {key}"))?;
    store.put(key, &raw)
}

/// SQLite-backed record store
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the store at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open progress db: {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::with_connection(conn)
    }

    /// Transient in-memory database (tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory db")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("Progress DB lock poisoned")
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version = schema_version(&conn)?;

        // Migration 1: whole-record table
        if version < 1 {
            conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS records (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                "#,
            )?;
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (1)", [])?;
            debug!("Progress db migrated to schema version 1");
        }

        Ok(())
    }
}

/// Highest applied migration, 0 for a new database
fn schema_version(conn: &Connection) -> Result<i64> {
    let version = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .context("Failed to read schema version")?;
    Ok(version)
}

impl RecordStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let value = conn
            .query_row("SELECT value FROM records WHERE key = ?1", [key], |r| r.get(0))
            .optional()
            .with_context(|| format!("Failed to read record {key}"))?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().timestamp_millis();
        let conn = self.conn();
        conn.execute(
            r#"
            INSERT INTO records (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3
            "#,
            rusqlite::params![key, value, now],
        )
        .with_context(|| format!("Failed to write record {key}"))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM records WHERE key = ?1", [key])
            .with_context(|| format!("Failed to delete record {key}"))?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT key FROM records WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )?;
        let keys = stmt
            .query_map([prefix], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()
            .context("Failed to list record keys")?;
        Ok(keys)
    }
}

const SCHEMA_SQL: &str = r#"
-- Applied migrations; records themselves are created by migration 1
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);
"#;

/// In-process record store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // Map operations are never left half-done by a panic
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.records().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.records().remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .records()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}

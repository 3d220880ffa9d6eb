//! Local metadata store
//!
//! SQLite table mapping server item ids to previously discovered trailer ids.
//! Every call opens the database, runs one statement and drops the
//! connection; nothing is held between lookups.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS metadata (
    item_id    TEXT PRIMARY KEY,
    trailer_id TEXT NOT NULL
)";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("metadata store error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("could not create store directory: {0}")]
    Io(#[from] std::io::Error),
}

/// One cached row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub item_id: String,
    pub trailer_id: String,
}

/// Synchronous trailer cache used while binding cells
pub trait TrailerLookup: Send + Sync {
    /// Trailer id previously recorded for an item
    fn lookup_trailer(&self, item_id: &str) -> Option<String>;

    /// Record a trailer discovered online
    fn remember_trailer(&self, item_id: &str, trailer_id: &str);
}

/// SQLite-backed [`TrailerLookup`]
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `~/.local/share/postergrid/metadata.db`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("postergrid").join("metadata.db"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.path)?;
        conn.execute(SCHEMA, [])?;
        Ok(conn)
    }

    pub fn find_by_item_id(&self, item_id: &str) -> Result<Option<MetadataRecord>, StoreError> {
        let conn = self.open()?;
        let record = conn
            .query_row(
                "SELECT item_id, trailer_id FROM metadata WHERE item_id = ?",
                [item_id],
                |row| {
                    Ok(MetadataRecord {
                        item_id: row.get(0)?,
                        trailer_id: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    pub fn save(&self, record: &MetadataRecord) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO metadata (item_id, trailer_id) VALUES (?1, ?2)
             ON CONFLICT(item_id) DO UPDATE SET trailer_id = excluded.trailer_id",
            params![record.item_id, record.trailer_id],
        )?;
        Ok(())
    }
}

impl TrailerLookup for MetadataStore {
    fn lookup_trailer(&self, item_id: &str) -> Option<String> {
        match self.find_by_item_id(item_id) {
            Ok(record) => record.map(|r| r.trailer_id),
            Err(e) => {
                warn!(item_id, "trailer lookup failed: {}", e);
                None
            }
        }
    }

    fn remember_trailer(&self, item_id: &str, trailer_id: &str) {
        let record = MetadataRecord {
            item_id: item_id.to_string(),
            trailer_id: trailer_id.to_string(),
        };
        match self.save(&record) {
            Ok(()) => debug!(item_id, trailer_id, "trailer cached"),
            Err(e) => warn!(item_id, "could not cache trailer: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(dir.path().join("meta.db"));
        assert_eq!(store.find_by_item_id("1").unwrap(), None);
        assert_eq!(store.lookup_trailer("1"), None);
    }

    #[test]
    fn test_save_then_find() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(dir.path().join("meta.db"));
        store.remember_trailer("42", "abc123");

        let record = store.find_by_item_id("42").unwrap().unwrap();
        assert_eq!(record.trailer_id, "abc123");
        assert_eq!(store.lookup_trailer("42").as_deref(), Some("abc123"));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(dir.path().join("nested").join("meta.db"));
        store.remember_trailer("42", "old");
        store.remember_trailer("42", "new");
        assert_eq!(store.lookup_trailer("42").as_deref(), Some("new"));
    }

    #[test]
    fn test_unopenable_store_degrades_to_miss() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the database file should be
        let store = MetadataStore::new(dir.path());
        assert_eq!(store.lookup_trailer("1"), None);
    }
}

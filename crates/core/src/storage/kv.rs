//! Key-value persistence
//!
//! Stores string blobs under fixed keys.

use chrono::Utc;
use rusqlite::{params, Connection};

use super::parse::OptionalExt;
use crate::error::Result;

/// Key-value store
pub struct KeyValueStore<'a> {
    conn: &'a Connection,
}

impl<'a> KeyValueStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Read the value under `key`
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write (or overwrite) the value under `key`
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    #[test]
    fn test_set_get() {
        let db = Database::open_in_memory().unwrap();
        let store = KeyValueStore::new(&db.conn);

        store.set("greeting", "hello").unwrap();
        assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello"));

        store.set("greeting", "hey").unwrap();
        assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hey"));
    }

    #[test]
    fn test_missing_key() {
        let db = Database::open_in_memory().unwrap();
        let store = KeyValueStore::new(&db.conn);
        assert!(store.get("nope").unwrap().is_none());
    }
}

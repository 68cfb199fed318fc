//! SQLite storage layer for The Move

mod documents;
mod kv;
mod local;
mod migrations;
mod parse;
mod saved;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

use crate::config::StorageBackend;
use crate::error::Result;

pub use documents::DocumentMoveStore;
pub use kv::KeyValueStore;
pub use local::{LocalMoveStore, MOVES_KEY};
pub use saved::{SavedMovesStore, SAVED_KEY};
pub use traits::{load_or_seed, MoveStore};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Get saved-ids store
    pub fn saved(&self) -> SavedMovesStore<'_> {
        SavedMovesStore::new(&self.conn)
    }

    /// Get the move store for the configured backend
    pub fn moves(&self, backend: StorageBackend) -> Box<dyn MoveStore + '_> {
        match backend {
            StorageBackend::Local => Box::new(LocalMoveStore::new(&self.conn)),
            StorageBackend::Documents => Box::new(DocumentMoveStore::new(&self.conn)),
        }
    }
}

//! Saved (bookmarked) move ids

use std::collections::BTreeSet;

use rusqlite::Connection;
use tracing::warn;

use super::kv::KeyValueStore;
use crate::error::Result;

pub const SAVED_KEY: &str = "the-move-saved";

/// Saved ids store, a JSON array under a fixed key
pub struct SavedMovesStore<'a> {
    kv: KeyValueStore<'a>,
}

impl<'a> SavedMovesStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            kv: KeyValueStore::new(conn),
        }
    }

    /// Load saved ids. Malformed data reads as nothing saved.
    pub fn load(&self) -> Result<BTreeSet<String>> {
        let Some(blob) = self.kv.get(SAVED_KEY)? else {
            return Ok(BTreeSet::new());
        };
        match serde_json::from_str::<BTreeSet<String>>(&blob) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                warn!(error = %e, "Saved moves are malformed, ignoring");
                Ok(BTreeSet::new())
            }
        }
    }

    pub fn save(&self, ids: &BTreeSet<String>) -> Result<()> {
        self.kv.set(SAVED_KEY, &serde_json::to_string(ids)?)
    }
}

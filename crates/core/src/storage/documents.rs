//! Document-per-move persistence
//!
//! Each move is its own JSON document keyed by id. Saving syncs the table to
//! the collection: present moves are upserted, missing ones deleted. A marker
//! row in `kv_store` separates an emptied board from one never written.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::kv::KeyValueStore;
use super::traits::MoveStore;
use crate::error::Result;
use crate::models::Move;
use crate::normalize::normalize_move;

/// Set on every sync, so an empty table after it means no moves
const SYNCED_KEY: &str = "the-move-documents-synced";

/// Move store backed by the `move_documents` table
pub struct DocumentMoveStore<'a> {
    conn: &'a Connection,
    kv: KeyValueStore<'a>,
}

impl<'a> DocumentMoveStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            kv: KeyValueStore::new(conn),
        }
    }

    /// Raw document bodies in collection order
    fn documents(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, body FROM move_documents ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut docs = Vec::new();
        for row in rows {
            docs.push(row?);
        }
        Ok(docs)
    }

    /// Write one document
    pub fn upsert(&self, position: usize, mv: &Move) -> Result<()> {
        let body = serde_json::to_string(mv)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO move_documents (id, position, body, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![mv.id, position as i64, body, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

}

impl MoveStore for DocumentMoveStore<'_> {
    #[instrument(skip(self))]
    fn load_moves(&self, now: DateTime<Utc>) -> Result<Option<Vec<Move>>> {
        let docs = self.documents()?;
        if docs.is_empty() {
            let synced = self.kv.get(SYNCED_KEY)?.is_some();
            return Ok(synced.then(Vec::new));
        }

        let mut moves = Vec::with_capacity(docs.len());
        for (id, body) in docs {
            let parsed = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| normalize_move(&value, Some(&id), now));
            match parsed {
                Some(mv) => moves.push(mv),
                None => warn!(move_id = %id, "Skipping malformed move document"),
            }
        }
        Ok(Some(moves))
    }

    #[instrument(skip(self, moves), fields(count = moves.len()))]
    fn save_moves(&self, moves: &[Move]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        let keep: HashSet<&str> = moves.iter().map(|mv| mv.id.as_str()).collect();
        let stale: Vec<String> = {
            let mut stmt = tx.prepare("SELECT id FROM move_documents")?;
            let ids = stmt.query_map([], |row| row.get::<_, String>(0))?;
            let mut stale = Vec::new();
            for id in ids {
                let id = id?;
                if !keep.contains(id.as_str()) {
                    stale.push(id);
                }
            }
            stale
        };
        for id in &stale {
            tx.execute("DELETE FROM move_documents WHERE id = ?1", params![id])?;
        }

        for (position, mv) in moves.iter().enumerate() {
            self.upsert(position, mv)?;
        }
        self.kv.set(SYNCED_KEY, &Utc::now().to_rfc3339())?;

        tx.commit()?;
        debug!(removed = stale.len(), "Synced move documents");
        Ok(())
    }
}

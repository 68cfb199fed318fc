//! Single-blob move persistence
//!
//! The whole collection is one JSON array under a fixed key.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, instrument};

use super::kv::KeyValueStore;
use super::traits::MoveStore;
use crate::error::Result;
use crate::models::Move;
use crate::normalize::parse_move_blob;

pub const MOVES_KEY: &str = "the-move-moves";

/// Move store backed by one key-value blob
pub struct LocalMoveStore<'a> {
    kv: KeyValueStore<'a>,
}

impl<'a> LocalMoveStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            kv: KeyValueStore::new(conn),
        }
    }
}

impl MoveStore for LocalMoveStore<'_> {
    #[instrument(skip(self))]
    fn load_moves(&self, now: DateTime<Utc>) -> Result<Option<Vec<Move>>> {
        let Some(blob) = self.kv.get(MOVES_KEY)? else {
            return Ok(None);
        };
        Ok(parse_move_blob(&blob, now))
    }

    #[instrument(skip(self, moves), fields(count = moves.len()))]
    fn save_moves(&self, moves: &[Move]) -> Result<()> {
        let blob = serde_json::to_string(moves)?;
        self.kv.set(MOVES_KEY, &blob)?;
        debug!(bytes = blob.len(), "Saved moves blob");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_moves;
    use crate::storage::{load_or_seed, Database};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let store = LocalMoveStore::new(&db.conn);
        let moves = seed_moves(now());

        store.save_moves(&moves).unwrap();
        let loaded = store.load_moves(now()).unwrap().unwrap();
        assert_eq!(loaded, moves);
    }

    #[test]
    fn test_empty_store_is_none() {
        let db = Database::open_in_memory().unwrap();
        let store = LocalMoveStore::new(&db.conn);
        assert!(store.load_moves(now()).unwrap().is_none());
        assert_eq!(load_or_seed(&store, now()), seed_moves(now()));
    }

    #[test]
    fn test_emptied_board_is_not_reseeded() {
        let db = Database::open_in_memory().unwrap();
        let store = LocalMoveStore::new(&db.conn);
        store.save_moves(&seed_moves(now())).unwrap();
        store.save_moves(&[]).unwrap();

        assert_eq!(store.load_moves(now()).unwrap(), Some(Vec::new()));
        assert!(load_or_seed(&store, now()).is_empty());
    }

    #[test]
    fn test_malformed_blob_falls_back_to_seed() {
        let db = Database::open_in_memory().unwrap();
        KeyValueStore::new(&db.conn)
            .set(MOVES_KEY, "{not json")
            .unwrap();
        let store = LocalMoveStore::new(&db.conn);
        assert!(store.load_moves(now()).unwrap().is_none());
        assert_eq!(load_or_seed(&store, now()).len(), 3);

        KeyValueStore::new(&db.conn)
            .set(MOVES_KEY, r#"{"id":"move-1"}"#)
            .unwrap();
        assert_eq!(load_or_seed(&store, now()), seed_moves(now()));
    }

    #[test]
    fn test_legacy_blob_is_normalized() {
        let db = Database::open_in_memory().unwrap();
        let legacy = r#"[{
            "id": "move-9",
            "title": "Late night pancakes",
            "description": "Diner run",
            "location": "Clark Street, Evanston",
            "time": "2026-10-18T23:00:00Z",
            "createdAt": "2026-10-18T11:00:00Z",
            "area": "Downtown",
            "hostId": "user-2",
            "hostName": "Maya",
            "attendees": ["Maya"],
            "comments": []
        }]"#;
        KeyValueStore::new(&db.conn).set(MOVES_KEY, legacy).unwrap();

        let store = LocalMoveStore::new(&db.conn);
        let loaded = store.load_moves(now()).unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        let mv = &loaded[0];
        assert_eq!(
            mv.start_time,
            Utc.with_ymd_and_hms(2026, 10, 18, 23, 0, 0).unwrap()
        );
        assert_eq!(mv.end_time - mv.start_time, chrono::Duration::hours(1));
        assert_eq!(mv.max_participants, 12);
    }
}

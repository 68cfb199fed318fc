//! Storage repository traits
//!
//! These traits define the persistence interface for the move collection, so
//! the board can run on either backend (or a mock in tests).

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::Result;
use crate::models::Move;
use crate::seed::seed_moves;

/// Whole-collection move persistence
pub trait MoveStore {
    /// Load and normalize the persisted collection.
    ///
    /// `Ok(None)` means nothing usable is stored (absent or malformed).
    fn load_moves(&self, now: DateTime<Utc>) -> Result<Option<Vec<Move>>>;

    /// Replace the persisted collection
    fn save_moves(&self, moves: &[Move]) -> Result<()>;
}

/// Load the collection, falling back to the seed moves when storage is
/// empty, malformed or unreadable
pub fn load_or_seed<S: MoveStore + ?Sized>(store: &S, now: DateTime<Utc>) -> Vec<Move> {
    match store.load_moves(now) {
        Ok(Some(moves)) => moves,
        Ok(None) => {
            warn!("No stored moves, using seed data");
            seed_moves(now)
        }
        Err(e) => {
            warn!(error = %e, "Failed to read stored moves, using seed data");
            seed_moves(now)
        }
    }
}

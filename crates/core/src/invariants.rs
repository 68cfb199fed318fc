//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::Move;

/// Validate that a move's state is internally consistent
pub fn assert_move_invariants(mv: &Move) {
    debug_assert!(
        mv.end_time > mv.start_time,
        "Move {} ends at {} which is not after its start {}",
        mv.id,
        mv.end_time,
        mv.start_time
    );

    debug_assert!(
        mv.max_participants >= 1,
        "Move {} has max_participants of 0",
        mv.id
    );

    debug_assert!(!mv.id.trim().is_empty(), "Move has an empty id");

    // Roster entries are unique
    let unique: HashSet<&String> = mv.attendees.iter().collect();
    debug_assert!(
        unique.len() == mv.attendees.len(),
        "Move {} has duplicate attendees: {:?}",
        mv.id,
        mv.attendees
    );

    // Nobody is both on the roster and queued
    debug_assert!(
        !mv.waitlist.iter().any(|name| mv.attendees.contains(name)),
        "Move {} has a waitlisted name that is already attending",
        mv.id
    );
}

/// Validate a whole collection: every move is consistent and ids are unique
pub fn assert_collection_invariants(moves: &[Move]) {
    let mut seen = HashSet::new();
    for mv in moves {
        assert_move_invariants(mv);
        debug_assert!(seen.insert(mv.id.as_str()), "Duplicate move id {}", mv.id);
    }
}

//! Application state management
//!
//! `BoardState` owns the database handle and the current snapshot of the
//! board. Every mutation swaps in a new collection and then persists it. A
//! failed write is logged and the in-memory snapshot is kept.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use themove_core::filter::{self, MoveFilter};
use themove_core::mutations;
use themove_core::{
    load_or_seed, BoardConfig, Database, Error, JoinOutcome, LeaveOutcome, Move, MoveDraft,
    Result, StorageBackend, User,
};
use tracing::{info, instrument, warn};

/// Main application state
pub struct BoardState {
    db: Database,
    backend: StorageBackend,
    user: User,
    default_max_participants: u32,
    moves: Vec<Move>,
    saved: BTreeSet<String>,
    now: DateTime<Utc>,
    selected: Option<String>,
    pub filter: MoveFilter,
}

impl BoardState {
    /// Open the configured database and load the board
    pub fn open(config: &BoardConfig) -> Result<Self> {
        let db_path = config.database_path()?;

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;
        info!(path = %db_path.display(), "Opened board database");
        Self::with_database(db, config, Utc::now())
    }

    /// Build state over an already-open database
    pub fn with_database(db: Database, config: &BoardConfig, now: DateTime<Utc>) -> Result<Self> {
        let backend = config.storage.backend;
        let moves = load_or_seed(&*db.moves(backend), now);
        let saved = db.saved().load()?;

        info!(
            backend = ?backend,
            moves = moves.len(),
            saved = saved.len(),
            "Loaded board"
        );

        Ok(Self {
            db,
            backend,
            user: config.user(),
            default_max_participants: config.default_max_participants(),
            moves,
            saved,
            now,
            selected: None,
            filter: MoveFilter::new(),
        })
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Advance the clock. Status and ordering are recomputed from it on read.
    pub fn refresh_clock(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn saved_ids(&self) -> &BTreeSet<String> {
        &self.saved
    }

    pub fn is_saved(&self, move_id: &str) -> bool {
        self.saved.contains(move_id)
    }

    pub fn find(&self, move_id: &str) -> Option<&Move> {
        self.moves.iter().find(|mv| mv.id == move_id)
    }

    /// Select a move for the detail view. Unknown ids clear the selection.
    pub fn select(&mut self, move_id: &str) -> Option<&Move> {
        self.selected = self.find(move_id).map(|mv| mv.id.clone());
        self.selected_move()
    }

    pub fn selected_move(&self) -> Option<&Move> {
        self.selected.as_deref().and_then(|id| self.find(id))
    }

    pub fn explore(&self) -> Vec<Move> {
        filter::explore_feed(&self.moves, &self.filter, self.now)
    }

    pub fn joined(&self) -> Vec<Move> {
        filter::joined_moves(&self.moves, &self.user)
    }

    pub fn hosting(&self) -> Vec<Move> {
        filter::hosting_moves(&self.moves, &self.user)
    }

    pub fn waitlisted(&self) -> Vec<Move> {
        filter::waitlisted_moves(&self.moves, &self.user)
    }

    pub fn saved(&self) -> Vec<Move> {
        filter::saved_moves(&self.moves, &self.saved, self.now)
    }

    /// A blank draft with the configured capacity
    pub fn new_draft(&self) -> MoveDraft {
        MoveDraft {
            max_participants: Some(self.default_max_participants),
            ..MoveDraft::default()
        }
    }

    #[instrument(skip(self), fields(user = %self.user.name))]
    pub fn join(&mut self, move_id: &str, response: Option<&str>) -> Result<JoinOutcome> {
        let (next, outcome) = mutations::join_move_with_response(
            &self.moves,
            move_id,
            &self.user.name,
            response,
            self.now,
        )?;
        if outcome.changed() {
            self.replace_moves(next);
        }
        info!(move_id, ?outcome, "Join");
        Ok(outcome)
    }

    #[instrument(skip(self), fields(user = %self.user.name))]
    pub fn leave(&mut self, move_id: &str) -> LeaveOutcome {
        let (next, outcome) = mutations::leave_move(&self.moves, move_id, &self.user);
        if matches!(outcome, LeaveOutcome::Left { .. } | LeaveOutcome::LeftWaitlist) {
            self.replace_moves(next);
        }
        info!(move_id, ?outcome, "Leave");
        outcome
    }

    /// Cancel a hosted move. Returns whether anything was removed.
    #[instrument(skip(self), fields(user = %self.user.name))]
    pub fn cancel(&mut self, move_id: &str) -> bool {
        let before = self.moves.len();
        let (next, selected) =
            mutations::cancel_move(&self.moves, move_id, &self.user, self.selected.as_deref());
        let removed = next.len() < before;
        self.selected = selected;
        if removed {
            self.replace_moves(next);
            info!(move_id, "Cancelled move");
        } else {
            warn!(move_id, "Cancel ignored");
        }
        removed
    }

    /// Post a move hosted by the session user. Returns the new id.
    #[instrument(skip(self, draft), fields(user = %self.user.name))]
    pub fn create(&mut self, draft: &MoveDraft) -> Result<String> {
        let next = mutations::create_move(&self.moves, draft, &self.user, self.now)?;
        let id = next
            .first()
            .map(|mv| mv.id.clone())
            .ok_or_else(|| Error::InvalidOperation("created move missing".to_string()))?;
        self.replace_moves(next);
        info!(move_id = %id, "Created move");
        Ok(id)
    }

    #[instrument(skip(self, draft), fields(user = %self.user.name))]
    pub fn edit(&mut self, move_id: &str, draft: &MoveDraft) -> Result<()> {
        if self.find(move_id).is_none() {
            return Err(Error::NotFound(format!("move {}", move_id)));
        }
        let next = mutations::update_move(&self.moves, move_id, draft, &self.user)?;
        self.replace_moves(next);
        info!(move_id, "Edited move");
        Ok(())
    }

    pub fn comment(&mut self, move_id: &str, text: &str) -> bool {
        let before = self.find(move_id).map(|mv| mv.comments.len());
        let next = mutations::add_comment(&self.moves, move_id, &self.user.name, text, self.now);
        let added = next
            .iter()
            .find(|mv| mv.id == move_id)
            .map(|mv| Some(mv.comments.len()) != before)
            .unwrap_or(false);
        if added {
            self.replace_moves(next);
        }
        added
    }

    /// Toggle the bookmark. Returns whether the move is now saved.
    pub fn toggle_saved(&mut self, move_id: &str) -> bool {
        self.saved = mutations::toggle_saved(&self.saved, move_id);
        if let Err(e) = self.db.saved().save(&self.saved) {
            warn!(error = %e, "Failed to persist saved moves");
        }
        self.saved.contains(move_id)
    }

    fn replace_moves(&mut self, next: Vec<Move>) {
        themove_core::invariants::assert_collection_invariants(&next);
        self.moves = next;
        if let Err(e) = self.db.moves(self.backend).save_moves(&self.moves) {
            warn!(error = %e, "Failed to persist moves");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use themove_core::{ActivityType, CampusArea, FilterTag, ValidationError};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn state() -> BoardState {
        let db = Database::open_in_memory().unwrap();
        BoardState::with_database(db, &BoardConfig::default(), now()).unwrap()
    }

    fn draft(state: &BoardState) -> MoveDraft {
        MoveDraft {
            title: "Pickup soccer".to_string(),
            description: "Bring cleats".to_string(),
            location: "Tech Lawn".to_string(),
            start_time: Some(now() + Duration::hours(1)),
            end_time: Some(now() + Duration::hours(2)),
            activity_type: Some(ActivityType::Sports),
            area: CampusArea::North,
            ..state.new_draft()
        }
    }

    #[test]
    fn test_starts_from_seed() {
        let state = state();
        assert_eq!(state.moves().len(), 3);
        assert_eq!(state.user().name, "Alec");
        assert_eq!(state.joined().len(), 1);
        assert_eq!(state.hosting().len(), 1);
    }

    #[test]
    fn test_join_persists() {
        let mut state = state();
        assert_eq!(state.join("move-1", None).unwrap(), JoinOutcome::Joined);

        let reloaded = state
            .db
            .moves(StorageBackend::Local)
            .load_moves(now())
            .unwrap()
            .unwrap();
        let mv = reloaded.iter().find(|m| m.id == "move-1").unwrap();
        assert!(mv.is_attendee("Alec"));
    }

    #[test]
    fn test_create_then_cancel_clears_selection() {
        let mut state = state();
        let d = draft(&state);
        let id = state.create(&d).unwrap();
        assert_eq!(state.moves()[0].id, id);
        assert!(state.select(&id).is_some());

        assert!(state.cancel(&id));
        assert!(state.selected_move().is_none());
        assert_eq!(state.moves().len(), 3);
    }

    #[test]
    fn test_create_validation_error_leaves_board() {
        let mut state = state();
        let mut d = draft(&state);
        d.title = "  ".to_string();
        let err = state.create(&d).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingFields)
        ));
        assert_eq!(state.moves().len(), 3);
    }

    #[test]
    fn test_cannot_cancel_others_move() {
        let mut state = state();
        assert!(!state.cancel("move-1"));
        assert!(state.find("move-1").is_some());
    }

    #[test]
    fn test_saved_toggle_persists() {
        let mut state = state();
        assert!(state.toggle_saved("move-3"));
        assert_eq!(state.db.saved().load().unwrap().len(), 1);
        assert_eq!(state.saved().len(), 1);
        assert!(!state.toggle_saved("move-3"));
        assert!(state.saved().is_empty());
    }

    #[test]
    fn test_clock_refresh_moves_status() {
        let mut state = state();
        state.filter.toggle(FilterTag::Area(CampusArea::North));
        let feed = state.explore();
        assert_eq!(feed.len(), 1);
        assert_eq!(
            feed[0].status(state.now()),
            themove_core::MoveStatus::Upcoming
        );

        state.refresh_clock(now() + Duration::hours(2) + Duration::minutes(30));
        assert_eq!(
            state.explore()[0].status(state.now()),
            themove_core::MoveStatus::LiveNow
        );
    }

    #[test]
    fn test_comment_blank_is_ignored() {
        let mut state = state();
        assert!(!state.comment("move-2", "   "));
        assert!(state.comment("move-2", " see you there "));
        assert_eq!(state.find("move-2").unwrap().comments[0].text, "see you there");
    }

    #[test]
    fn test_documents_backend() {
        let db = Database::open_in_memory().unwrap();
        let mut config = BoardConfig::default();
        config.storage.backend = StorageBackend::Documents;
        let mut state = BoardState::with_database(db, &config, now()).unwrap();
        state.join("move-1", None).unwrap();

        let stored = state
            .db
            .moves(StorageBackend::Documents)
            .load_moves(now())
            .unwrap()
            .unwrap();
        assert_eq!(stored.len(), 3);
    }

    #[test]
    fn test_edit_unknown_is_not_found() {
        let mut state = state();
        let d = draft(&state);
        assert!(matches!(state.edit("nope", &d), Err(Error::NotFound(_))));
    }
}

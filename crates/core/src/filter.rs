//! Feed filtering and ordering
//!
//! Computes the visible list for each view from the full collection. All
//! functions are pure; `now` is passed in by the caller.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ActivityType, CampusArea, Move, User};

/// A filter chip. Area and activity chips share one selection set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterTag {
    Area(CampusArea),
    Activity(ActivityType),
}

impl FilterTag {
    pub fn matches(&self, mv: &Move) -> bool {
        match self {
            FilterTag::Area(area) => mv.area == *area,
            FilterTag::Activity(kind) => mv.activity_type == *kind,
        }
    }

    /// Resolve a chip label. Area names are tried first; "Other" therefore
    /// resolves to the area chip.
    pub fn from_label(label: &str) -> Option<Self> {
        CampusArea::from_label(label)
            .map(FilterTag::Area)
            .or_else(|| ActivityType::from_label(label).map(FilterTag::Activity))
    }
}

impl std::fmt::Display for FilterTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterTag::Area(area) => write!(f, "{}", area),
            FilterTag::Activity(kind) => write!(f, "{}", kind),
        }
    }
}

/// Active explore filters: selected chips plus search text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveFilter {
    pub tags: BTreeSet<FilterTag>,
    pub query: String,
}

impl MoveFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: FilterTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Select the chip if unselected, otherwise deselect it
    pub fn toggle(&mut self, tag: FilterTag) {
        if !self.tags.remove(&tag) {
            self.tags.insert(tag);
        }
    }

    /// The "All" chip
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn is_all(&self) -> bool {
        self.tags.is_empty()
    }

    /// Any selected chip matches (OR), and the query is a substring of the searchable text
    pub fn matches(&self, mv: &Move) -> bool {
        let tag_match = self.tags.is_empty() || self.tags.iter().any(|tag| tag.matches(mv));
        tag_match && matches_query(mv, &self.query)
    }
}

fn matches_query(mv: &Move, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    let haystack = format!("{} {} {}", mv.title, mv.description, mv.location).to_lowercase();
    haystack.contains(&query)
}

/// Newest first by `created_at`; stable for ties
pub fn sort_by_newest(moves: &mut [Move]) {
    moves.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Explore feed: filtered, live first, then upcoming, then past; newest first within each
pub fn explore_feed(moves: &[Move], filter: &MoveFilter, now: DateTime<Utc>) -> Vec<Move> {
    let mut feed: Vec<Move> = moves.iter().filter(|mv| filter.matches(mv)).cloned().collect();
    feed.sort_by(|a, b| {
        a.status(now)
            .rank()
            .cmp(&b.status(now).rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    feed
}

/// Moves the user is on the roster of but does not host
pub fn joined_moves(moves: &[Move], user: &User) -> Vec<Move> {
    let mut joined: Vec<Move> = moves
        .iter()
        .filter(|mv| !mv.is_hosted_by(user) && mv.is_attendee(&user.name))
        .cloned()
        .collect();
    sort_by_newest(&mut joined);
    joined
}

pub fn hosting_moves(moves: &[Move], user: &User) -> Vec<Move> {
    let mut hosting: Vec<Move> = moves
        .iter()
        .filter(|mv| mv.is_hosted_by(user))
        .cloned()
        .collect();
    sort_by_newest(&mut hosting);
    hosting
}

/// Moves the user is queued for
pub fn waitlisted_moves(moves: &[Move], user: &User) -> Vec<Move> {
    let mut queued: Vec<Move> = moves
        .iter()
        .filter(|mv| mv.is_waitlisted(&user.name))
        .cloned()
        .collect();
    sort_by_newest(&mut queued);
    queued
}

/// Bookmarked moves that have not ended yet. Ids with no matching move are ignored.
pub fn saved_moves(moves: &[Move], saved: &BTreeSet<String>, now: DateTime<Utc>) -> Vec<Move> {
    let mut kept: Vec<Move> = moves
        .iter()
        .filter(|mv| saved.contains(&mv.id) && !mv.has_ended(now))
        .cloned()
        .collect();
    sort_by_newest(&mut kept);
    kept
}

//! Campus area and activity type tags

use serde::{Deserialize, Serialize};

/// Coarse campus region a move happens in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum CampusArea {
    North,
    South,
    Downtown,
    #[default]
    Other,
}

impl CampusArea {
    pub fn display_name(&self) -> &'static str {
        match self {
            CampusArea::North => "North",
            CampusArea::South => "South",
            CampusArea::Downtown => "Downtown",
            CampusArea::Other => "Other",
        }
    }

    /// All areas in filter-chip order
    pub fn all() -> &'static [CampusArea] {
        &[
            CampusArea::North,
            CampusArea::South,
            CampusArea::Downtown,
            CampusArea::Other,
        ]
    }

    /// Case-insensitive lookup by display name
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::all()
            .iter()
            .copied()
            .find(|area| area.display_name().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for CampusArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// What kind of hangout a move is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum ActivityType {
    Food,
    Study,
    Sports,
    Social,
    #[default]
    Other,
}

impl ActivityType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityType::Food => "Food",
            ActivityType::Study => "Study",
            ActivityType::Sports => "Sports",
            ActivityType::Social => "Social",
            ActivityType::Other => "Other",
        }
    }

    /// Single-glyph marker used for map pins and text cards
    pub fn marker(&self) -> &'static str {
        match self {
            ActivityType::Sports => "⚽",
            ActivityType::Food => "🍴",
            ActivityType::Study => "📚",
            ActivityType::Social => "👥",
            ActivityType::Other => "📍",
        }
    }

    pub fn all() -> &'static [ActivityType] {
        &[
            ActivityType::Food,
            ActivityType::Study,
            ActivityType::Sports,
            ActivityType::Social,
            ActivityType::Other,
        ]
    }

    /// Case-insensitive lookup by display name
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

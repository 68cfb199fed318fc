//! Derived move status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::parse_instant;

/// Where a move sits relative to the current instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveStatus {
    Upcoming,
    LiveNow,
    Past,
}

impl MoveStatus {
    /// Derive the status of a `[start, end]` window at `now`. Both bounds are inclusive.
    pub fn derive(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < start {
            MoveStatus::Upcoming
        } else if now <= end {
            MoveStatus::LiveNow
        } else {
            MoveStatus::Past
        }
    }

    /// Same as [`MoveStatus::derive`] for raw stored strings.
    ///
    /// Anything that does not parse as an RFC 3339 instant reads as `Upcoming`.
    pub fn from_iso(start: &str, end: &str, now: DateTime<Utc>) -> Self {
        match (parse_instant(start), parse_instant(end)) {
            (Some(start), Some(end)) => Self::derive(start, end, now),
            _ => MoveStatus::Upcoming,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoveStatus::Upcoming => "Upcoming",
            MoveStatus::LiveNow => "Live Now",
            MoveStatus::Past => "Past",
        }
    }

    /// Explore feed rank, lower sorts first
    pub fn rank(&self) -> u8 {
        match self {
            MoveStatus::LiveNow => 0,
            MoveStatus::Upcoming => 1,
            MoveStatus::Past => 2,
        }
    }
}

impl std::fmt::Display for MoveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_status_window() {
        let (start, end) = (at(12), at(14));
        assert_eq!(MoveStatus::derive(start, end, at(11)), MoveStatus::Upcoming);
        assert_eq!(MoveStatus::derive(start, end, at(13)), MoveStatus::LiveNow);
        assert_eq!(MoveStatus::derive(start, end, at(15)), MoveStatus::Past);
    }

    #[test]
    fn test_status_bounds_inclusive() {
        let (start, end) = (at(12), at(14));
        assert_eq!(MoveStatus::derive(start, end, start), MoveStatus::LiveNow);
        assert_eq!(MoveStatus::derive(start, end, end), MoveStatus::LiveNow);
        assert_eq!(
            MoveStatus::derive(start, end, end + Duration::seconds(1)),
            MoveStatus::Past
        );
        assert_eq!(
            MoveStatus::derive(start, end, start - Duration::seconds(1)),
            MoveStatus::Upcoming
        );
    }

    #[test]
    fn test_malformed_iso_is_upcoming() {
        assert_eq!(
            MoveStatus::from_iso("not a date", "2026-10-18T14:00:00Z", at(20)),
            MoveStatus::Upcoming
        );
        assert_eq!(
            MoveStatus::from_iso("2026-10-18T12:00:00Z", "", at(20)),
            MoveStatus::Upcoming
        );
        assert_eq!(
            MoveStatus::from_iso("2026-10-18T12:00:00Z", "2026-10-18T14:00:00Z", at(20)),
            MoveStatus::Past
        );
    }

    #[test]
    fn test_labels_and_rank() {
        assert_eq!(MoveStatus::LiveNow.to_string(), "Live Now");
        assert!(MoveStatus::LiveNow.rank() < MoveStatus::Upcoming.rank());
        assert!(MoveStatus::Upcoming.rank() < MoveStatus::Past.rank());
    }
}

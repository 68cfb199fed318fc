//! Move model - a single posted meetup

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{ActivityType, CampusArea, Comment, MoveStatus, SignupResponse, User};
use crate::geo::{default_coordinates_for_area, Coordinates};

/// Roster cap used when a record does not carry a usable one
pub const DEFAULT_MAX_PARTICIPANTS: u32 = 12;

/// Length given to moves that only know when they start
pub fn default_move_duration() -> Duration {
    Duration::hours(1)
}

/// An informal campus meetup.
///
/// Always in canonical shape: records from storage go through
/// [`crate::normalize`] before they become a `Move`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub remarks: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub area: CampusArea,
    pub activity_type: ActivityType,
    pub host_id: String,
    pub host_name: String,
    pub attendees: Vec<String>,
    pub waitlist: Vec<String>,
    pub max_participants: u32,
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub signup_prompt: String,
    #[serde(default)]
    pub signup_prompt_requires_response: bool,
    #[serde(default)]
    pub signup_responses: Vec<SignupResponse>,
}

impl Move {
    pub fn status(&self, now: DateTime<Utc>) -> MoveStatus {
        MoveStatus::derive(self.start_time, self.end_time, now)
    }

    /// Saved moves stay visible until their end time passes
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.end_time < now
    }

    pub fn is_attendee(&self, name: &str) -> bool {
        self.attendees.iter().any(|a| a == name)
    }

    pub fn is_waitlisted(&self, name: &str) -> bool {
        self.waitlist.iter().any(|w| w == name)
    }

    pub fn is_hosted_by(&self, user: &User) -> bool {
        user.hosts(&self.host_id)
    }

    pub fn is_full(&self) -> bool {
        self.attendees.len() >= self.max_participants as usize
    }

    pub fn spots_left(&self) -> usize {
        (self.max_participants as usize).saturating_sub(self.attendees.len())
    }

    /// "going/capacity", as shown on cards
    pub fn capacity_label(&self) -> String {
        format!("{}/{}", self.attendees.len(), self.max_participants)
    }

    /// Short place name for cards: the named location if any, cut at the first comma
    pub fn display_location(&self) -> &str {
        let place = self
            .location_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.location);
        place.split(',').next().unwrap_or(place).trim()
    }

    pub fn has_signup_prompt(&self) -> bool {
        !self.signup_prompt.trim().is_empty()
    }

    pub fn signup_response_for(&self, name: &str) -> Option<&SignupResponse> {
        self.signup_responses.iter().find(|r| r.name == name)
    }

    /// Pin position: stored coordinates when both are present, else the area default
    pub fn coordinates(&self) -> Coordinates {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Coordinates {
                latitude,
                longitude,
            },
            _ => default_coordinates_for_area(self.area),
        }
    }
}

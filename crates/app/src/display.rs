//! Text rendering for move cards and the detail view

use std::collections::BTreeSet;
use std::fmt::Write as _;

use chrono::{DateTime, TimeZone, Utc};
use themove_core::geo::{distance_miles, format_distance, Coordinates};
use themove_core::time::{
    format_date_range_with_relative, format_event_day_date, format_event_time,
    format_event_time_only, format_time_ago,
};
use themove_core::{Move, MoveStatus, User};

/// Everything a card needs besides the move itself
pub struct View<'a, Tz: TimeZone> {
    pub now: DateTime<Utc>,
    pub user: &'a User,
    pub saved: &'a BTreeSet<String>,
    pub tz: &'a Tz,
    /// Viewer position, when known
    pub origin: Option<Coordinates>,
}

impl<Tz: TimeZone> View<'_, Tz>
where
    Tz::Offset: std::fmt::Display,
{
    /// Relationship badges: hosting, going, waitlist position, saved
    fn badges(&self, mv: &Move) -> Vec<String> {
        let mut badges = Vec::new();
        if mv.is_hosted_by(self.user) {
            badges.push("hosting".to_string());
        } else if mv.is_attendee(&self.user.name) {
            badges.push("going".to_string());
        } else if let Some(pos) = mv.waitlist.iter().position(|w| *w == self.user.name) {
            badges.push(format!("waitlist #{}", pos + 1));
        }
        if self.saved.contains(&mv.id) {
            badges.push("saved".to_string());
        }
        badges
    }

    fn distance(&self, mv: &Move) -> Option<String> {
        self.origin
            .map(|origin| format_distance(distance_miles(origin, mv.coordinates())))
    }

    /// Three-line feed card
    pub fn card(&self, mv: &Move) -> String {
        let status = mv.status(self.now);
        let mut out = String::new();

        let _ = write!(
            out,
            "{} {} [{}] {}",
            mv.activity_type.marker(),
            mv.title,
            status.label(),
            mv.id
        );
        let badges = self.badges(mv);
        if !badges.is_empty() {
            let _ = write!(out, " ({})", badges.join(", "));
        }

        let _ = write!(
            out,
            "\n    {}",
            format_date_range_with_relative(mv.start_time, mv.end_time, self.now, self.tz)
        );
        let _ = write!(out, " | {} | {}", mv.display_location(), mv.area);
        if let Some(distance) = self.distance(mv) {
            let _ = write!(out, " | {}", distance);
        }

        let _ = write!(
            out,
            "\n    Hosted by {} | {} going{} | {} comments | posted {}",
            mv.host_name,
            mv.capacity_label(),
            waitlist_note(mv),
            mv.comments.len(),
            format_time_ago(mv.created_at, self.now)
        );
        out
    }

    /// Full detail view
    pub fn detail(&self, mv: &Move) -> String {
        let mut out = self.card(mv);
        let is_host = mv.is_hosted_by(self.user);

        let same_day = mv.start_time.with_timezone(self.tz).date_naive()
            == mv.end_time.with_timezone(self.tz).date_naive();
        if same_day {
            let _ = write!(
                out,
                "\n\n{}\n{}-{}",
                format_event_day_date(mv.start_time, self.tz),
                format_event_time_only(mv.start_time, self.tz),
                format_event_time_only(mv.end_time, self.tz)
            );
        } else {
            let _ = write!(
                out,
                "\n\n{} to {}",
                format_event_time(mv.start_time, self.tz),
                format_event_time(mv.end_time, self.tz)
            );
        }
        let _ = write!(out, "\n\n{}", mv.description);
        if !mv.remarks.is_empty() {
            let _ = write!(out, "\n\nRemarks: {}", mv.remarks);
        }

        let _ = write!(out, "\n\nWhere: {}", mv.location);
        if let Some(url) = &mv.location_url {
            let _ = write!(out, "\nMap: {}", url);
        }

        let _ = write!(out, "\n\nGoing ({}): {}", mv.capacity_label(), mv.attendees.join(", "));
        if !mv.waitlist.is_empty() {
            let _ = write!(out, "\nWaitlist: {}", mv.waitlist.join(", "));
        }

        if mv.has_signup_prompt() {
            let required = if mv.signup_prompt_requires_response {
                " (required)"
            } else {
                ""
            };
            let _ = write!(out, "\n\nSignup question{}: {}", required, mv.signup_prompt);
            if is_host {
                for response in &mv.signup_responses {
                    let _ = write!(out, "\n  {}: {}", response.name, response.response);
                }
            } else if let Some(response) = mv.signup_response_for(&self.user.name) {
                let _ = write!(out, "\n  Your answer: {}", response.response);
            }
        }

        if mv.comments.is_empty() {
            out.push_str("\n\nNo comments yet.");
        } else {
            out.push_str("\n\nComments:");
            for comment in &mv.comments {
                let _ = write!(
                    out,
                    "\n  {} ({}): {}",
                    comment.author,
                    format_time_ago(comment.created_at, self.now),
                    comment.text
                );
            }
        }

        if status_allows_join(mv.status(self.now)) && !is_host {
            if mv.is_attendee(&self.user.name) || mv.is_waitlisted(&self.user.name) {
                let _ = write!(out, "\n\nLeave with: themove leave {}", mv.id);
            } else if mv.is_full() {
                let _ = write!(out, "\n\nFull. Join the waitlist with: themove join {}", mv.id);
            } else {
                let _ = write!(out, "\n\nJoin with: themove join {}", mv.id);
            }
        }
        out
    }

    /// Cards separated by blank lines, or a placeholder
    pub fn list(&self, moves: &[Move], empty: &str) -> String {
        if moves.is_empty() {
            return empty.to_string();
        }
        moves
            .iter()
            .map(|mv| self.card(mv))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn waitlist_note(mv: &Move) -> String {
    if mv.waitlist.is_empty() {
        String::new()
    } else {
        format!(", {} waitlisted", mv.waitlist.len())
    }
}

fn status_allows_join(status: MoveStatus) -> bool {
    status != MoveStatus::Past
}

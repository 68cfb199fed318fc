//! Move mutations
//!
//! Every operation takes the current collection and returns a new one. Moves
//! are never modified in place, and an id that is not in the collection is a
//! silent no-op.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result, ValidationError};
use crate::models::{
    ActivityType, CampusArea, Comment, Move, SignupResponse, User, DEFAULT_MAX_PARTICIPANTS,
};

/// What a join attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    /// Roster was full; queued instead
    Waitlisted,
    AlreadyJoined,
    AlreadyWaitlisted,
    NotFound,
}

impl JoinOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, JoinOutcome::Joined | JoinOutcome::Waitlisted)
    }
}

/// What a leave attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Left the roster; `promoted` is the waitlisted name that took the slot
    Left { promoted: Option<String> },
    LeftWaitlist,
    NotAttending,
    /// Hosts leave only by cancelling the move
    HostCannotLeave,
    NotFound,
}

/// Rebuild the collection with one move replaced by `update`.
///
/// `update` returns `None` to keep the original untouched.
fn replace_move<T>(
    moves: &[Move],
    move_id: &str,
    update: impl FnOnce(&Move) -> (Option<Move>, T),
) -> Option<(Vec<Move>, T)> {
    let index = moves.iter().position(|mv| mv.id == move_id)?;
    let (replacement, outcome) = update(&moves[index]);
    let mut next = moves.to_vec();
    if let Some(replacement) = replacement {
        next[index] = replacement;
    }
    Some((next, outcome))
}

/// Join a move by name. Idempotent; queues on the waitlist once the roster is full.
pub fn join_move(moves: &[Move], move_id: &str, user_name: &str) -> (Vec<Move>, JoinOutcome) {
    let result = replace_move(moves, move_id, |mv| {
        if mv.is_attendee(user_name) {
            return (None, JoinOutcome::AlreadyJoined);
        }
        if mv.is_waitlisted(user_name) {
            return (None, JoinOutcome::AlreadyWaitlisted);
        }

        let mut next = mv.clone();
        if next.is_full() {
            next.waitlist.push(user_name.to_string());
            (Some(next), JoinOutcome::Waitlisted)
        } else {
            next.attendees.push(user_name.to_string());
            (Some(next), JoinOutcome::Joined)
        }
    });

    let (next, outcome) = result.unwrap_or_else(|| (moves.to_vec(), JoinOutcome::NotFound));
    debug!(move_id, user_name, ?outcome, "Join");
    (next, outcome)
}

/// Join a move that may carry a signup prompt.
///
/// A required prompt with a blank answer is rejected without mutating anything.
/// A non-blank answer is recorded (trimmed) once the join goes through.
pub fn join_move_with_response(
    moves: &[Move],
    move_id: &str,
    user_name: &str,
    response: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(Vec<Move>, JoinOutcome)> {
    let Some(target) = moves.iter().find(|mv| mv.id == move_id) else {
        return Ok((moves.to_vec(), JoinOutcome::NotFound));
    };

    let answer = response.map(str::trim).filter(|r| !r.is_empty());
    if target.has_signup_prompt()
        && target.signup_prompt_requires_response
        && answer.is_none()
        && !target.is_attendee(user_name)
        && !target.is_waitlisted(user_name)
    {
        return Err(ValidationError::MissingSignupResponse.into());
    }

    let (mut next, outcome) = join_move(moves, move_id, user_name);
    if let (true, Some(answer)) = (outcome.changed(), answer) {
        if let Some(mv) = next.iter_mut().find(|mv| mv.id == move_id) {
            mv.signup_responses.retain(|r| r.name != user_name);
            mv.signup_responses.push(SignupResponse {
                name: user_name.to_string(),
                response: answer.to_string(),
                created_at: now,
            });
        }
    }
    Ok((next, outcome))
}

/// Leave a move. The host cannot leave their own move this way.
///
/// Leaving the roster frees a slot for the head of the waitlist.
pub fn leave_move(moves: &[Move], move_id: &str, user: &User) -> (Vec<Move>, LeaveOutcome) {
    let result = replace_move(moves, move_id, |mv| {
        if mv.is_hosted_by(user) {
            return (None, LeaveOutcome::HostCannotLeave);
        }

        let name = user.name.as_str();
        if mv.is_waitlisted(name) {
            let mut next = mv.clone();
            next.waitlist.retain(|w| w != name);
            next.signup_responses.retain(|r| r.name != name);
            return (Some(next), LeaveOutcome::LeftWaitlist);
        }
        if !mv.is_attendee(name) {
            return (None, LeaveOutcome::NotAttending);
        }

        let mut next = mv.clone();
        next.attendees.retain(|a| a != name);
        next.signup_responses.retain(|r| r.name != name);

        let promoted = promote_waitlist(&mut next).into_iter().next();
        (Some(next), LeaveOutcome::Left { promoted })
    });

    let (next, outcome) = result.unwrap_or_else(|| (moves.to_vec(), LeaveOutcome::NotFound));
    debug!(move_id, user_name = %user.name, ?outcome, "Leave");
    (next, outcome)
}

/// Move names from the head of the waitlist onto the roster until it is full.
/// Returns the promoted names in order.
fn promote_waitlist(mv: &mut Move) -> Vec<String> {
    let open = mv.spots_left().min(mv.waitlist.len());
    let promoted: Vec<String> = mv.waitlist.drain(..open).collect();
    mv.attendees.extend(promoted.iter().cloned());
    promoted
}

/// Cancel (delete) a move. Only its host may do so; anyone else is a no-op.
///
/// Returns the new collection and the selection to keep: a selection pointing
/// at the cancelled move is cleared.
pub fn cancel_move(
    moves: &[Move],
    move_id: &str,
    user: &User,
    selected: Option<&str>,
) -> (Vec<Move>, Option<String>) {
    let allowed = moves
        .iter()
        .any(|mv| mv.id == move_id && mv.is_hosted_by(user));

    if !allowed {
        debug!(move_id, user_id = %user.id, "Cancel ignored: not found or not host");
        return (moves.to_vec(), selected.map(str::to_string));
    }

    let next = moves.iter().filter(|mv| mv.id != move_id).cloned().collect();
    let selection = selected.filter(|id| *id != move_id).map(str::to_string);
    (next, selection)
}

/// Append a comment. Blank text (after trimming) is a no-op.
pub fn add_comment(
    moves: &[Move],
    move_id: &str,
    author: &str,
    text: &str,
    now: DateTime<Utc>,
) -> Vec<Move> {
    let text = text.trim();
    if text.is_empty() {
        return moves.to_vec();
    }

    replace_move(moves, move_id, |mv| {
        let mut next = mv.clone();
        next.comments
            .push(Comment::new(author.to_string(), text.to_string(), now));
        (Some(next), ())
    })
    .map(|(next, ())| next)
    .unwrap_or_else(|| moves.to_vec())
}

/// Bookmark a move if not saved, otherwise remove the bookmark
pub fn toggle_saved(saved: &BTreeSet<String>, move_id: &str) -> BTreeSet<String> {
    let mut next = saved.clone();
    if !next.remove(move_id) {
        next.insert(move_id.to_string());
    }
    next
}

/// Create/edit form contents
#[derive(Debug, Clone, Default)]
pub struct MoveDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub activity_type: Option<ActivityType>,
    pub area: CampusArea,
    pub max_participants: Option<u32>,
    pub location_name: Option<String>,
    pub location_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub remarks: String,
    pub signup_prompt: String,
    pub signup_prompt_requires_response: bool,
}

/// The draft after validation, with text trimmed
struct ValidDraft {
    title: String,
    description: String,
    location: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    activity_type: ActivityType,
    max_participants: u32,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl MoveDraft {
    fn validate(&self) -> std::result::Result<ValidDraft, ValidationError> {
        let title = self.title.trim();
        let description = self.description.trim();
        let location = self.location.trim();

        let (Some(start_time), Some(end_time), Some(activity_type)) =
            (self.start_time, self.end_time, self.activity_type)
        else {
            return Err(ValidationError::MissingFields);
        };
        if title.is_empty() || description.is_empty() || location.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if end_time <= start_time {
            return Err(ValidationError::EndNotAfterStart);
        }

        let max_participants = self.max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS);
        if max_participants < 1 {
            return Err(ValidationError::InvalidMaxParticipants);
        }

        Ok(ValidDraft {
            title: title.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            start_time,
            end_time,
            activity_type,
            max_participants,
        })
    }

    /// Fill a draft from an existing move, for editing
    pub fn from_move(mv: &Move) -> Self {
        Self {
            title: mv.title.clone(),
            description: mv.description.clone(),
            location: mv.location.clone(),
            start_time: Some(mv.start_time),
            end_time: Some(mv.end_time),
            activity_type: Some(mv.activity_type),
            area: mv.area,
            max_participants: Some(mv.max_participants),
            location_name: mv.location_name.clone(),
            location_url: mv.location_url.clone(),
            latitude: mv.latitude,
            longitude: mv.longitude,
            remarks: mv.remarks.clone(),
            signup_prompt: mv.signup_prompt.clone(),
            signup_prompt_requires_response: mv.signup_prompt_requires_response,
        }
    }
}

/// Post a new move hosted by `host`, prepended to the collection.
///
/// On a validation error nothing is created and the error carries the message to show.
pub fn create_move(
    moves: &[Move],
    draft: &MoveDraft,
    host: &User,
    now: DateTime<Utc>,
) -> std::result::Result<Vec<Move>, ValidationError> {
    let valid = draft.validate()?;

    let created = Move {
        id: Uuid::new_v4().to_string(),
        title: valid.title,
        description: valid.description,
        remarks: draft.remarks.trim().to_string(),
        location: valid.location,
        location_name: non_blank(&draft.location_name),
        location_url: non_blank(&draft.location_url),
        latitude: draft.latitude,
        longitude: draft.longitude,
        start_time: valid.start_time,
        end_time: valid.end_time,
        created_at: now,
        area: draft.area,
        activity_type: valid.activity_type,
        host_id: host.id.clone(),
        host_name: host.name.clone(),
        attendees: vec![host.name.clone()],
        waitlist: Vec::new(),
        max_participants: valid.max_participants,
        comments: Vec::new(),
        signup_prompt: draft.signup_prompt.trim().to_string(),
        signup_prompt_requires_response: draft.signup_prompt_requires_response,
        signup_responses: Vec::new(),
    };

    debug!(move_id = %created.id, host = %host.name, "Created move");
    let mut next = Vec::with_capacity(moves.len() + 1);
    next.push(created);
    next.extend_from_slice(moves);
    Ok(next)
}

/// Replace the host-owned fields of a move from a draft.
///
/// Roster, comments, responses, id and creation time are kept. Raising the
/// capacity promotes waitlisted names in order.
/// Unknown ids are a no-op; a non-host gets `PermissionDenied`.
pub fn update_move(
    moves: &[Move],
    move_id: &str,
    draft: &MoveDraft,
    user: &User,
) -> Result<Vec<Move>> {
    let Some(current) = moves.iter().find(|mv| mv.id == move_id) else {
        return Ok(moves.to_vec());
    };
    if !current.is_hosted_by(user) {
        return Err(Error::PermissionDenied(format!(
            "only the host can edit move {}",
            move_id
        )));
    }

    let valid = draft.validate()?;
    if (valid.max_participants as usize) < current.attendees.len() {
        return Err(ValidationError::MaxBelowAttendees(current.attendees.len()).into());
    }

    let next = replace_move(moves, move_id, |mv| {
        let mut edited = mv.clone();
        edited.title = valid.title;
        edited.description = valid.description;
        edited.location = valid.location;
        edited.start_time = valid.start_time;
        edited.end_time = valid.end_time;
        edited.activity_type = valid.activity_type;
        edited.max_participants = valid.max_participants;
        edited.area = draft.area;
        edited.location_name = non_blank(&draft.location_name);
        edited.location_url = non_blank(&draft.location_url);
        edited.latitude = draft.latitude;
        edited.longitude = draft.longitude;
        edited.remarks = draft.remarks.trim().to_string();
        edited.signup_prompt = draft.signup_prompt.trim().to_string();
        edited.signup_prompt_requires_response = draft.signup_prompt_requires_response;

        let promoted = promote_waitlist(&mut edited);
        if !promoted.is_empty() {
            debug!(move_id, ?promoted, "Promoted from waitlist after capacity change");
        }
        (Some(edited), ())
    })
    .map(|(next, ())| next)
    .unwrap_or_else(|| moves.to_vec());

    Ok(next)
}

//! Boundary normalization of stored move records
//!
//! Records read back from the local blob or from move documents may come from
//! older builds or other clients. They are coerced into one canonical [`Move`]
//! here so nothing past this point has to care about shape:
//!
//! - a legacy single `time` becomes `startTime` plus a one-hour `endTime`
//! - missing or unknown `area` / `activityType` become `Other`
//! - non-array `attendees` / `waitlist` / `comments` become empty
//! - `maxParticipants` falls back to 12 and never drops below the roster size

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    default_move_duration, ActivityType, CampusArea, Comment, Move, SignupResponse,
    DEFAULT_MAX_PARTICIPANTS,
};
use crate::time::parse_instant;

/// Normalize a single record.
///
/// `doc_id` wins over any `id` inside the record (document stores key by it).
/// Returns `None` only when the record is not a JSON object.
pub fn normalize_move(doc: &Value, doc_id: Option<&str>, now: DateTime<Utc>) -> Option<Move> {
    let obj = doc.as_object()?;

    let id = doc_id
        .map(str::to_string)
        .or_else(|| id_field(obj, "id"))
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let start_time = instant_field(obj, "startTime")
        .or_else(|| instant_field(obj, "time"))
        .unwrap_or(now);
    let end_time = instant_field(obj, "endTime")
        .filter(|end| *end > start_time)
        .unwrap_or(start_time + default_move_duration());
    let created_at = instant_field(obj, "createdAt").unwrap_or(now);

    let attendees = dedup(string_list(obj, "attendees"));
    let waitlist: Vec<String> = dedup(string_list(obj, "waitlist"))
        .into_iter()
        .filter(|name| !attendees.contains(name))
        .collect();

    let max_participants = max_participants_field(obj)
        .unwrap_or(DEFAULT_MAX_PARTICIPANTS)
        .max(attendees.len() as u32);

    Some(Move {
        id,
        title: string_field(obj, "title"),
        description: string_field(obj, "description"),
        remarks: string_field(obj, "remarks"),
        location: string_field(obj, "location"),
        location_name: opt_string_field(obj, "locationName"),
        location_url: opt_string_field(obj, "locationUrl"),
        latitude: obj.get("latitude").and_then(Value::as_f64),
        longitude: obj.get("longitude").and_then(Value::as_f64),
        start_time,
        end_time,
        created_at,
        area: obj
            .get("area")
            .and_then(Value::as_str)
            .and_then(CampusArea::from_label)
            .unwrap_or_default(),
        activity_type: obj
            .get("activityType")
            .and_then(Value::as_str)
            .and_then(ActivityType::from_label)
            .unwrap_or_default(),
        host_id: string_field(obj, "hostId"),
        host_name: string_field(obj, "hostName"),
        attendees,
        waitlist,
        max_participants,
        comments: comments_field(obj, now),
        signup_prompt: string_field(obj, "signupPrompt"),
        signup_prompt_requires_response: obj
            .get("signupPromptRequiresResponse")
            .map(truthy)
            .unwrap_or(false),
        signup_responses: signup_responses_field(obj, now),
    })
}

/// Normalize a whole stored collection.
///
/// Anything but a JSON array is "no data". Later records sharing an id with an
/// earlier one are dropped.
pub fn normalize_collection(value: &Value, now: DateTime<Utc>) -> Option<Vec<Move>> {
    let records = value.as_array()?;
    let mut seen = HashSet::new();

    let moves = records
        .iter()
        .filter_map(|record| normalize_move(record, None, now))
        .filter(|mv| {
            let fresh = seen.insert(mv.id.clone());
            if !fresh {
                debug!(move_id = %mv.id, "Dropping duplicate move id");
            }
            fresh
        })
        .collect();

    Some(moves)
}

/// Parse a serialized collection blob. Malformed JSON is "no data".
pub fn parse_move_blob(blob: &str, now: DateTime<Utc>) -> Option<Vec<Move>> {
    match serde_json::from_str::<Value>(blob) {
        Ok(value) => {
            let moves = normalize_collection(&value, now);
            if moves.is_none() {
                warn!("Stored moves are not a list, ignoring");
            }
            moves
        }
        Err(e) => {
            warn!(error = %e, "Stored moves are not valid JSON, ignoring");
            None
        }
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn opt_string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Ids may have been written as numbers by older clients
fn id_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn instant_field(obj: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    obj.get(key).and_then(Value::as_str).and_then(parse_instant)
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn dedup(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Numbers and numeric strings; anything non-finite or below 1 is unusable
fn max_participants_field(obj: &Map<String, Value>) -> Option<u32> {
    let raw = match obj.get("maxParticipants")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if raw.is_finite() && raw >= 1.0 {
        Some(raw.min(u32::MAX as f64) as u32)
    } else {
        None
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}

fn comments_field(obj: &Map<String, Value>, now: DateTime<Utc>) -> Vec<Comment> {
    let Some(items) = obj.get("comments").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|c| {
            let text = c.get("text").and_then(Value::as_str)?;
            Some(Comment {
                id: id_field(c, "id").unwrap_or_else(|| Uuid::new_v4().to_string()),
                author: string_field(c, "author"),
                text: text.to_string(),
                created_at: instant_field(c, "createdAt").unwrap_or(now),
            })
        })
        .collect()
}

fn signup_responses_field(obj: &Map<String, Value>, now: DateTime<Utc>) -> Vec<SignupResponse> {
    let Some(items) = obj.get("signupResponses").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|r| {
            Some(SignupResponse {
                name: r.get("name").and_then(Value::as_str)?.to_string(),
                response: string_field(r, "response"),
                created_at: instant_field(r, "createdAt").unwrap_or(now),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_legacy_time_becomes_one_hour_window() {
        let doc = json!({
            "id": "move-1",
            "title": "Frisbee",
            "time": "2026-10-18T14:00:00Z",
            "attendees": ["Maya"],
        });
        let mv = normalize_move(&doc, None, now()).unwrap();
        assert_eq!(mv.start_time, Utc.with_ymd_and_hms(2026, 10, 18, 14, 0, 0).unwrap());
        assert_eq!(mv.end_time, mv.start_time + Duration::hours(1));
    }

    #[test]
    fn test_defaults_filled() {
        let doc = json!({ "id": "bare" });
        let mv = normalize_move(&doc, None, now()).unwrap();
        assert_eq!(mv.area, CampusArea::Other);
        assert_eq!(mv.activity_type, ActivityType::Other);
        assert!(mv.attendees.is_empty());
        assert!(mv.waitlist.is_empty());
        assert!(mv.comments.is_empty());
        assert_eq!(mv.max_participants, DEFAULT_MAX_PARTICIPANTS);
        assert_eq!(mv.start_time, now());
        assert_eq!(mv.created_at, now());
        assert!(mv.end_time > mv.start_time);
    }

    #[test]
    fn test_non_array_lists_default_empty() {
        let doc = json!({
            "id": "odd",
            "attendees": "Maya",
            "waitlist": { "0": "Zoe" },
            "comments": 3,
        });
        let mv = normalize_move(&doc, None, now()).unwrap();
        assert!(mv.attendees.is_empty());
        assert!(mv.waitlist.is_empty());
        assert!(mv.comments.is_empty());
    }

    #[test]
    fn test_max_participants_raised_to_roster() {
        let doc = json!({
            "id": "crowded",
            "attendees": ["A", "B", "C"],
            "maxParticipants": 2,
        });
        let mv = normalize_move(&doc, None, now()).unwrap();
        assert_eq!(mv.max_participants, 3);

        let doc = json!({ "id": "bad", "maxParticipants": 0 });
        assert_eq!(
            normalize_move(&doc, None, now()).unwrap().max_participants,
            DEFAULT_MAX_PARTICIPANTS
        );

        let doc = json!({ "id": "text", "maxParticipants": "8" });
        assert_eq!(normalize_move(&doc, None, now()).unwrap().max_participants, 8);
    }

    #[test]
    fn test_unknown_tags_become_other() {
        let doc = json!({ "id": "x", "area": "Lakefill", "activityType": "Karaoke" });
        let mv = normalize_move(&doc, None, now()).unwrap();
        assert_eq!(mv.area, CampusArea::Other);
        assert_eq!(mv.activity_type, ActivityType::Other);

        let doc = json!({ "id": "y", "area": "Downtown", "activityType": "Food" });
        let mv = normalize_move(&doc, None, now()).unwrap();
        assert_eq!(mv.area, CampusArea::Downtown);
        assert_eq!(mv.activity_type, ActivityType::Food);
    }

    #[test]
    fn test_end_not_after_start_is_repaired() {
        let doc = json!({
            "id": "backwards",
            "startTime": "2026-10-18T14:00:00Z",
            "endTime": "2026-10-18T13:00:00Z",
        });
        let mv = normalize_move(&doc, None, now()).unwrap();
        assert_eq!(mv.end_time, mv.start_time + Duration::hours(1));
    }

    #[test]
    fn test_doc_id_wins() {
        let doc = json!({ "id": "inner", "title": "t" });
        let mv = normalize_move(&doc, Some("outer"), now()).unwrap();
        assert_eq!(mv.id, "outer");
    }

    #[test]
    fn test_roster_deduplicated() {
        let doc = json!({
            "id": "dupes",
            "attendees": ["Maya", "Alec", "Maya"],
            "waitlist": ["Zoe", "Alec", "Zoe"],
        });
        let mv = normalize_move(&doc, None, now()).unwrap();
        assert_eq!(mv.attendees, vec!["Maya", "Alec"]);
        assert_eq!(mv.waitlist, vec!["Zoe"]);
    }

    #[test]
    fn test_malformed_comments_dropped() {
        let doc = json!({
            "id": "c",
            "comments": [
                { "id": "c1", "author": "Maya", "text": "hi", "createdAt": "2026-10-18T11:00:00Z" },
                { "author": "Zoe" },
                "stray",
                { "author": "Alec", "text": "no id" },
            ],
        });
        let mv = normalize_move(&doc, None, now()).unwrap();
        assert_eq!(mv.comments.len(), 2);
        assert_eq!(mv.comments[0].id, "c1");
        assert_eq!(mv.comments[1].text, "no id");
        assert!(!mv.comments[1].id.is_empty());
    }

    #[test]
    fn test_collection_requires_array() {
        assert!(normalize_collection(&json!({ "moves": [] }), now()).is_none());
        assert_eq!(normalize_collection(&json!([]), now()).unwrap().len(), 0);
    }

    #[test]
    fn test_collection_drops_duplicate_ids_and_non_objects() {
        let value = json!([
            { "id": "a", "title": "first" },
            { "id": "a", "title": "second" },
            42,
            { "id": "b" },
        ]);
        let moves = normalize_collection(&value, now()).unwrap();
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].title, "first");
    }

    #[test]
    fn test_parse_blob_malformed() {
        assert!(parse_move_blob("{not json", now()).is_none());
        assert!(parse_move_blob("\"hello\"", now()).is_none());
        assert_eq!(parse_move_blob("[{\"id\":\"a\"}]", now()).unwrap().len(), 1);
    }

    #[test]
    fn test_canonical_round_trip_is_stable() {
        let doc = json!({
            "id": "m",
            "title": "Boba",
            "startTime": "2026-10-18T14:00:00Z",
            "endTime": "2026-10-18T15:30:00Z",
            "createdAt": "2026-10-18T10:00:00Z",
            "area": "Downtown",
            "activityType": "Food",
            "hostId": "user-3",
            "hostName": "Zoe",
            "attendees": ["Zoe"],
            "maxParticipants": 6,
            "signupPrompt": "Drink order?",
            "signupPromptRequiresResponse": true,
        });
        let mv = normalize_move(&doc, None, now()).unwrap();
        let again = normalize_move(&serde_json::to_value(&mv).unwrap(), None, now()).unwrap();
        assert_eq!(mv, again);
    }
}

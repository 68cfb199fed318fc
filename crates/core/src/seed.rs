//! Starter moves shown when nothing usable is persisted

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    default_move_duration, ActivityType, CampusArea, Comment, Move, DEFAULT_MAX_PARTICIPANTS,
};

struct SeedMove {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    location: &'static str,
    starts_in: Duration,
    created_ago: Duration,
    area: CampusArea,
    activity_type: ActivityType,
    host: (&'static str, &'static str),
    attendees: &'static [&'static str],
    comments: &'static [(&'static str, &'static str, &'static str, i64)],
}

fn build(seed: SeedMove, now: DateTime<Utc>) -> Move {
    let start_time = now + seed.starts_in;
    Move {
        id: seed.id.to_string(),
        title: seed.title.to_string(),
        description: seed.description.to_string(),
        remarks: String::new(),
        location: seed.location.to_string(),
        location_name: None,
        location_url: None,
        latitude: None,
        longitude: None,
        start_time,
        end_time: start_time + default_move_duration(),
        created_at: now - seed.created_ago,
        area: seed.area,
        activity_type: seed.activity_type,
        host_id: seed.host.0.to_string(),
        host_name: seed.host.1.to_string(),
        attendees: seed.attendees.iter().map(|a| a.to_string()).collect(),
        waitlist: Vec::new(),
        max_participants: DEFAULT_MAX_PARTICIPANTS,
        comments: seed
            .comments
            .iter()
            .map(|(id, author, text, mins_ago)| Comment {
                id: id.to_string(),
                author: author.to_string(),
                text: text.to_string(),
                created_at: now - Duration::minutes(*mins_ago),
            })
            .collect(),
        signup_prompt: String::new(),
        signup_prompt_requires_response: false,
        signup_responses: Vec::new(),
    }
}

/// Three sample moves timed relative to `now`
pub fn seed_moves(now: DateTime<Utc>) -> Vec<Move> {
    let seeds = [
        SeedMove {
            id: "move-1",
            title: "Frisbee at the Lakefill",
            description: "Sunset toss and casual hangout by the lake. Bring a water bottle.",
            location: "Lakefill Fields",
            starts_in: Duration::hours(2),
            created_ago: Duration::minutes(5),
            area: CampusArea::North,
            activity_type: ActivityType::Sports,
            host: ("user-2", "Maya"),
            attendees: &["Maya"],
            comments: &[(
                "comment-1",
                "Maya",
                "Meet by the picnic tables facing the lake.",
                4,
            )],
        },
        SeedMove {
            id: "move-2",
            title: "Study Sprint at Main Library",
            description: "Power hour in the commons with focus playlists.",
            location: "Main Library, 2nd Floor",
            starts_in: Duration::minutes(210),
            created_ago: Duration::minutes(45),
            area: CampusArea::South,
            activity_type: ActivityType::Study,
            host: ("user-1", "Alec"),
            attendees: &["Alec"],
            comments: &[],
        },
        SeedMove {
            id: "move-3",
            title: "Bubble Tea Run",
            description: "Quick trip downtown for boba and a walk back.",
            location: "Davis Street CTA",
            starts_in: Duration::minutes(90),
            created_ago: Duration::hours(2),
            area: CampusArea::Downtown,
            activity_type: ActivityType::Food,
            host: ("user-3", "Zoe"),
            attendees: &["Zoe", "Alec"],
            comments: &[(
                "comment-2",
                "Zoe",
                "Reply if you want a specific drink!",
                90,
            )],
        },
    ];

    seeds.into_iter().map(|seed| build(seed, now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::assert_collection_invariants;
    use crate::models::MoveStatus;
    use chrono::TimeZone;

    #[test]
    fn test_seed_moves_are_upcoming_and_consistent() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let moves = seed_moves(now);
        assert_eq!(moves.len(), 3);
        assert_collection_invariants(&moves);
        assert!(moves.iter().all(|m| m.status(now) == MoveStatus::Upcoming));
        assert!(moves.iter().all(|m| m.is_attendee(&m.host_name)));
    }

    #[test]
    fn test_seed_hosts() {
        let moves = seed_moves(Utc::now());
        let hosts: Vec<&str> = moves.iter().map(|m| m.host_name.as_str()).collect();
        assert_eq!(hosts, vec!["Maya", "Alec", "Zoe"]);
        assert_eq!(moves[2].attendees, vec!["Zoe", "Alec"]);
        assert_eq!(moves[2].comments[0].author, "Zoe");
    }
}

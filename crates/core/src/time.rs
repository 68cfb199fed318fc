//! Time parsing and display formatting
//!
//! Every function takes the current instant and display zone as arguments.
//! Nothing here reads the system clock.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

/// Form-input layouts accepted in addition to RFC 3339
const LOCAL_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse an RFC 3339 instant
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a form value: RFC 3339, or a zone-less date and time read in `tz`
pub fn parse_local_input<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(instant) = parse_instant(value) {
        return Some(instant);
    }

    LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// "just now", "5m ago", "3h ago", "2d ago"
pub fn format_time_ago(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - instant).max(Duration::zero());

    if diff < Duration::minutes(1) {
        "just now".to_string()
    } else if diff < Duration::hours(1) {
        format!("{}m ago", diff.num_minutes())
    } else if diff < Duration::days(1) {
        format!("{}h ago", diff.num_hours())
    } else {
        format!("{}d ago", diff.num_days())
    }
}

/// [`format_time_ago`] for a raw stored string. Malformed input reads as "just now".
pub fn format_time_ago_iso(iso: &str, now: DateTime<Utc>) -> String {
    match parse_instant(iso) {
        Some(instant) => format_time_ago(instant, now),
        None => "just now".to_string(),
    }
}

/// "Sun, Oct 18, 2026, 7:05 PM"
pub fn format_event_time<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant
        .with_timezone(tz)
        .format("%a, %b %-d, %Y, %-I:%M %p")
        .to_string()
}

/// "Sun, Oct 18, 2026"
pub fn format_event_day_date<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%a, %b %-d, %Y").to_string()
}

/// "7:05 PM"
pub fn format_event_time_only<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%-I:%M %p").to_string()
}

/// Card line for a move window: "10/18/2026, 7:00 PM-8:00 PM (Today)".
///
/// The suffix is "Today" or "Tomorrow" relative to `now` in `tz`, otherwise
/// the short weekday of the start.
pub fn format_date_range_with_relative<Tz: TimeZone>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let local_start = start.with_timezone(tz);
    let local_end = end.with_timezone(tz);
    let today = now.with_timezone(tz).date_naive();
    let start_day = local_start.date_naive();

    let relative = if start_day == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(start_day) {
        "Tomorrow".to_string()
    } else {
        local_start.format("%a").to_string()
    };

    format!(
        "{}, {}-{} ({})",
        local_start.format("%m/%d/%Y"),
        local_start.format("%-I:%M %p"),
        local_end.format("%-I:%M %p"),
        relative
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = noon();
        assert_eq!(format_time_ago(now - Duration::seconds(30), now), "just now");
        assert_eq!(format_time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(format_time_ago(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(format_time_ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(format_time_ago(now - Duration::days(2), now), "2d ago");
    }

    #[test]
    fn test_time_ago_future_clamps() {
        let now = noon();
        assert_eq!(format_time_ago(now + Duration::hours(2), now), "just now");
    }

    #[test]
    fn test_time_ago_iso_malformed() {
        assert_eq!(format_time_ago_iso("yesterday-ish", noon()), "just now");
        assert_eq!(format_time_ago_iso("2026-10-18T10:00:00Z", noon()), "2h ago");
    }

    #[test]
    fn test_event_formats() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 19, 5, 0).unwrap();
        assert_eq!(format_event_time(at, &Utc), "Sun, Oct 18, 2026, 7:05 PM");
        assert_eq!(format_event_day_date(at, &Utc), "Sun, Oct 18, 2026");
        assert_eq!(format_event_time_only(at, &Utc), "7:05 PM");
    }

    #[test]
    fn test_event_time_respects_zone() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 19, 5, 0).unwrap();
        let central = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(format_event_time_only(at, &central), "2:05 PM");
    }

    #[test]
    fn test_date_range_relative_day() {
        let now = noon();
        let start = Utc.with_ymd_and_hms(2026, 10, 18, 19, 0, 0).unwrap();
        let end = start + Duration::hours(1);
        assert_eq!(
            format_date_range_with_relative(start, end, now, &Utc),
            "10/18/2026, 7:00 PM-8:00 PM (Today)"
        );

        let tomorrow = start + Duration::days(1);
        assert!(format_date_range_with_relative(tomorrow, tomorrow + Duration::hours(1), now, &Utc)
            .ends_with("(Tomorrow)"));

        let later = start + Duration::days(3);
        assert!(format_date_range_with_relative(later, later + Duration::hours(1), now, &Utc)
            .ends_with("(Wed)"));
    }

    #[test]
    fn test_parse_local_input() {
        let central = FixedOffset::west_opt(5 * 3600).unwrap();
        let parsed = parse_local_input("2026-10-18T14:30", &central).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 10, 18, 19, 30, 0).unwrap());

        let parsed = parse_local_input("2026-10-18T14:30:00Z", &central).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 10, 18, 14, 30, 0).unwrap());

        assert!(parse_local_input("   ", &central).is_none());
        assert!(parse_local_input("tomorrow at 5", &central).is_none());
    }
}

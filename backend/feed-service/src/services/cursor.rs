//! Cursor resolution for timestamp pagination
//!
//! A request carries an optional `timestamp` and a `type` (`old`|`new`).
//! Anything that does not parse is treated as "no cursor" and the page
//! starts from the newest post.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use crate::models::{Direction, FeedCursor};

/// Parse a cursor timestamp.
///
/// Accepts RFC 3339 with an offset or `Z`, and naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// which is read as UTC. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut value = trimmed.to_string();

    // A literal '+' in the offset decodes to a space in query strings
    let len = value.len();
    if len > 6 && value.as_bytes()[len - 6] == b' ' {
        value.replace_range(len - 6..len - 5, "+");
    }

    if value.ends_with('Z') || value.ends_with('z') {
        value.pop();
        value.push_str("+00:00");
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl FeedCursor {
    /// Resolve the raw `timestamp` and `type` query values.
    ///
    /// Without a usable timestamp the direction is always `Older`. Unknown
    /// `type` values fall back to `Older` as well.
    pub fn from_params(timestamp: Option<&str>, kind: Option<&str>) -> Self {
        let parsed = timestamp.and_then(|raw| {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                debug!(timestamp = raw, "ignoring unparseable feed timestamp");
            }
            parsed
        });

        let Some(timestamp) = parsed else {
            return FeedCursor::default();
        };

        let direction = match kind.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("new") => Direction::Newer,
            _ => Direction::Older,
        };

        FeedCursor {
            timestamp: Some(timestamp),
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn parses_offset_and_zulu_forms() {
        let expected = utc(2024, 5, 1, 10, 30, 0);
        assert_eq!(parse_timestamp("2024-05-01T10:30:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:30:00+02:00"), Some(expected));
    }

    #[test]
    fn restores_plus_decoded_as_space() {
        assert_eq!(
            parse_timestamp("2024-05-01T12:30:00 02:00"),
            Some(utc(2024, 5, 1, 10, 30, 0))
        );
    }

    #[test]
    fn naive_timestamps_are_utc() {
        assert_eq!(
            parse_timestamp("2024-05-01T10:30:00"),
            Some(utc(2024, 5, 1, 10, 30, 0))
        );
        let with_fraction = parse_timestamp("2024-05-01T10:30:00.250000").unwrap();
        assert_eq!(with_fraction.timestamp_subsec_micros(), 250_000);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_timestamp("garbage"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-45T99:00:00Z"), None);
    }

    #[test]
    fn garbage_timestamp_behaves_like_absent() {
        let cursor = FeedCursor::from_params(Some("garbage"), Some("old"));
        assert_eq!(cursor, FeedCursor::default());

        let cursor = FeedCursor::from_params(Some("garbage"), Some("new"));
        assert_eq!(cursor.direction, Direction::Older);
        assert!(cursor.timestamp.is_none());
    }

    #[test]
    fn missing_timestamp_ignores_type() {
        let cursor = FeedCursor::from_params(None, Some("new"));
        assert_eq!(cursor.direction, Direction::Older);
        assert!(cursor.timestamp.is_none());
    }

    #[test]
    fn type_selects_direction() {
        let ts = "2024-05-01T10:30:00Z";
        assert_eq!(
            FeedCursor::from_params(Some(ts), Some("new")).direction,
            Direction::Newer
        );
        assert_eq!(
            FeedCursor::from_params(Some(ts), Some("old")).direction,
            Direction::Older
        );
        assert_eq!(
            FeedCursor::from_params(Some(ts), Some("sideways")).direction,
            Direction::Older
        );
        assert_eq!(
            FeedCursor::from_params(Some(ts), None).direction,
            Direction::Older
        );
    }
}

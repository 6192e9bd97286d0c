use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// ISO-like forms whose offset lacks the colon RFC 3339 requires
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Interpret a feed-provided timestamp as a point in time.
///
/// Accepts RFC 3339, RFC 2822 (RSS `pubDate`), offset-less ISO-8601
/// date-times (taken as UTC) and bare `YYYY-MM-DD` dates (midnight UTC).
/// A `pubDate` weekday that disagrees with its date is ignored.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = without_weekday(s).and_then(|rest| DateTime::parse_from_rfc2822(rest).ok()) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// RFC 2822 text with its leading `Xxx,` day name removed
fn without_weekday(s: &str) -> Option<&str> {
    let (day, rest) = s.split_once(',')?;
    let day = day.trim();
    (!day.is_empty() && day.chars().all(|c| c.is_ascii_alphabetic())).then(|| rest.trim())
}

/// Milliseconds since the epoch, with unparsable input pinned to zero
pub fn sort_key(raw: &str) -> i64 {
    parse_timestamp(raw)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

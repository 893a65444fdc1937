//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a publication date in the formats post feeds commonly use
///
/// Returns `None` when no format matches; callers decide where undated posts go.
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset, normalized to UTC
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    None
}

/// Format date in full format (like "January 15, 2024")
pub fn full_date(date: &NaiveDateTime) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Format a date in ISO 8601 date form, as used in `<time datetime>` attributes
pub fn date_iso(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let dt = parse_date_string("2024-01-15").unwrap();
        assert_eq!(date_iso(&dt), "2024-01-15");
        assert!(parse_date_string("2024/01/15").is_some());
    }

    #[test]
    fn test_parse_datetime_and_rfc3339() {
        let dt = parse_date_string("2024-01-15 10:30:00").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "10:30");

        let dt = parse_date_string("2024-01-15T23:30:00+02:00").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 21:30");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_date_string("not a date").is_none());
        assert!(parse_date_string("2024-13-45").is_none());
        assert!(parse_date_string("").is_none());
    }

    #[test]
    fn test_full_date() {
        let dt = parse_date_string("2024-01-05").unwrap();
        assert_eq!(full_date(&dt), "January 5, 2024");
    }
}

//! Lenient ISO date parsing for feed `published` fields.

use chrono::NaiveDate;

/// Parse the date part of an ISO-ish timestamp.
///
/// Accepts `YYYY-MM-DD` with or without zero padding and with or
/// without a trailing time component (`2024-01-15`, `2024-1-5`,
/// `2024-01-15T10:00:00Z`). Returns `None` for anything else; callers
/// treat unparseable dates as "keep, but score as old".
#[must_use]
pub fn parse_iso_date(published: &str) -> Option<NaiveDate> {
    let date_part = published.split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_date() {
        assert_eq!(
            parse_iso_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn parses_date_with_time_suffix() {
        assert_eq!(
            parse_iso_date("2024-01-15T10:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(
            parse_iso_date("2024-01-15 10:00:00"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn parses_unpadded_date() {
        assert_eq!(
            parse_iso_date("2024-1-5"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_iso_date("last tuesday"), None);
        assert_eq!(parse_iso_date(""), None);
        assert_eq!(parse_iso_date("2024-13-99"), None);
    }
}

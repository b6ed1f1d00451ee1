//! Date normalization for free-text spreadsheet cells
//!
//! Recognized dates come out as UTC timestamps with millisecond precision
//! (`2024-01-15T00:00:00.000Z`). Anything else comes back trimmed and
//! otherwise untouched, to be shown as display text.
//!
//! Slash dates are read month-first. Two-digit years are not expanded.
//! Slash dates with a year of 2000 or earlier (`12/31/1999`) are left as text.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

/// Full date-time forms accepted as-is (no zone means UTC)
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Calendar-date forms, read as UTC midnight
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b. %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d-%b-%Y",
];

/// Normalize a date cell. Never fails; unparseable text is returned trimmed.
pub fn normalize_date(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    if let Some(parsed) = parse_native(text) {
        return render(parsed);
    }

    if let Some(date) = parse_month_first(text) {
        return render(midnight(date));
    }

    text.to_string()
}

/// Remove thousands separators from a fee or amount cell
pub fn strip_thousands(text: &str) -> String {
    text.trim().replace(',', "")
}

fn parse_native(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return plausible(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return plausible(dt.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return plausible(midnight(date));
        }
    }

    None
}

/// `M/D/YYYY` with month 1-12, day 1-31 and a year after 2000
fn parse_month_first(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split('/').map(str::trim).collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    let month: u32 = parts[0].parse().ok()?;
    let day: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || year <= 2000 {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

// Short numeric years ("10/12/13" read as %Y/%m/%d) are not real dates here
fn plausible(dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
    (1000..=9999).contains(&dt.year()).then_some(dt)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn render(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // SLASH DATES (month-first)
    // -------------------------------------------------------------------------

    #[test]
    fn test_month_first_slash_date() {
        assert_eq!(normalize_date("01/15/2024"), "2024-01-15T00:00:00.000Z");
    }

    #[test]
    fn test_month_first_without_padding() {
        assert_eq!(normalize_date("3/1/2024"), "2024-03-01T00:00:00.000Z");
    }

    #[test]
    fn test_month_first_grid() {
        for (month, day, year) in [(1, 1, 2001), (2, 29, 2024), (12, 31, 2030), (7, 4, 2099)] {
            let input = format!("{:02}/{:02}/{}", month, day, year);
            let expected = format!("{}-{:02}-{:02}T00:00:00.000Z", year, month, day);
            assert_eq!(normalize_date(&input), expected, "input {}", input);
        }
    }

    #[test]
    fn test_day_first_is_not_guessed() {
        // 15 cannot be a month; kept as text
        assert_eq!(normalize_date("15/01/2024"), "15/01/2024");
    }

    #[test]
    fn test_impossible_calendar_date_kept() {
        assert_eq!(normalize_date("02/30/2024"), "02/30/2024");
    }

    #[test]
    fn test_year_not_after_2000_kept() {
        assert_eq!(normalize_date("01/15/2000"), "01/15/2000");
        assert_eq!(normalize_date("01/15/99"), "01/15/99");
        assert_eq!(normalize_date("12/31/1999"), "12/31/1999");
    }

    #[test]
    fn test_two_digit_year_not_expanded() {
        assert_eq!(normalize_date("10/12/13"), "10/12/13");
    }

    // -------------------------------------------------------------------------
    // NATIVE FORMS
    // -------------------------------------------------------------------------

    #[test]
    fn test_iso_date() {
        assert_eq!(normalize_date("2024-03-01"), "2024-03-01T00:00:00.000Z");
    }

    #[test]
    fn test_iso_timestamp_is_stable() {
        let once = normalize_date("2024-01-15T00:00:00.000Z");
        assert_eq!(once, "2024-01-15T00:00:00.000Z");
        assert_eq!(normalize_date(&once), once);
    }

    #[test]
    fn test_rfc3339_offset_converted_to_utc() {
        assert_eq!(
            normalize_date("2024-01-15T08:00:00+08:00"),
            "2024-01-15T00:00:00.000Z"
        );
    }

    #[test]
    fn test_month_name_forms() {
        assert_eq!(normalize_date("January 15, 2024"), "2024-01-15T00:00:00.000Z");
        assert_eq!(normalize_date("Jan 15, 2024"), "2024-01-15T00:00:00.000Z");
        assert_eq!(normalize_date("15 January 2024"), "2024-01-15T00:00:00.000Z");
        assert_eq!(normalize_date("15-Jan-2024"), "2024-01-15T00:00:00.000Z");
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(normalize_date("  2024-03-01  "), "2024-03-01T00:00:00.000Z");
    }

    // -------------------------------------------------------------------------
    // PASSTHROUGH
    // -------------------------------------------------------------------------

    #[test]
    fn test_non_dates_pass_through_trimmed() {
        assert_eq!(normalize_date(""), "");
        assert_eq!(normalize_date("   "), "");
        assert_eq!(normalize_date("N/A"), "N/A");
        assert_eq!(normalize_date(" TBD "), "TBD");
        assert_eq!(normalize_date("for compliance"), "for compliance");
        assert_eq!(normalize_date("1/2"), "1/2");
    }

    #[test]
    fn test_strip_thousands() {
        assert_eq!(strip_thousands(" 1,500.00 "), "1500.00");
        assert_eq!(strip_thousands("12,345,678"), "12345678");
        assert_eq!(strip_thousands("waived"), "waived");
    }
}

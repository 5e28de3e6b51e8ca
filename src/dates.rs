// 📅 Date Formatter - Renders date-like values in the firm's chosen layout
// Best effort: what parses gets formatted, what doesn't passes through

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// DATE FORMAT
// ============================================================================

/// DateFormat - The three layouts a firm can pick for date fields
///
/// Built from its tag string; any unknown tag means `DD-MM-YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DateFormat {
    #[default]
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
}

impl DateFormat {
    /// The persisted tag, e.g. "DD-MM-YYYY"
    pub fn tag(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "DD-MM-YYYY",
            DateFormat::MonthDayYear => "MM-DD-YYYY",
            DateFormat::YearMonthDay => "YYYY-MM-DD",
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "%d-%m-%Y",
            DateFormat::MonthDayYear => "%m-%d-%Y",
            DateFormat::YearMonthDay => "%Y-%m-%d",
        }
    }
}

impl From<&str> for DateFormat {
    fn from(tag: &str) -> Self {
        match tag {
            "MM-DD-YYYY" => DateFormat::MonthDayYear,
            "YYYY-MM-DD" => DateFormat::YearMonthDay,
            _ => DateFormat::DayMonthYear,
        }
    }
}

impl From<String> for DateFormat {
    fn from(tag: String) -> Self {
        DateFormat::from(tag.as_str())
    }
}

impl From<DateFormat> for String {
    fn from(format: DateFormat) -> Self {
        format.tag().to_string()
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ============================================================================
// DATE INPUT
// ============================================================================

/// DateInput - Anything the formatter accepts as a date
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    Text(&'a str),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(s: &'a str) -> Self {
        DateInput::Text(s)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(s: &'a String) -> Self {
        DateInput::Text(s.as_str())
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(d: NaiveDate) -> Self {
        DateInput::Date(d)
    }
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(dt: NaiveDateTime) -> Self {
        DateInput::DateTime(dt)
    }
}

// Date-time layouts the app stores, most specific first
const DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// Date-only layouts: ISO, slashed ISO, and the bank-statement MM/DD/YYYY
const DATE_PATTERNS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a date string into a date-time (date-only inputs land on midnight)
///
/// RFC 3339 timestamps keep the calendar date as written; no timezone shift.
pub fn parse_date_like(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }

    for pattern in DATETIME_PATTERNS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, pattern) {
            return Some(dt);
        }
    }

    DATE_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDate::parse_from_str(input, pattern).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Resolve an input to a date-time, or hand back the text to pass through
fn resolve(input: DateInput<'_>) -> Result<NaiveDateTime, &str> {
    match input {
        DateInput::Text(s) => parse_date_like(s).ok_or(s),
        DateInput::Date(d) => d.and_hms_opt(0, 0, 0).ok_or(""),
        DateInput::DateTime(dt) => Ok(dt),
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Format a date-like value as DD-MM-YYYY, MM-DD-YYYY or YYYY-MM-DD
///
/// - Empty input → ""
/// - Unparseable input → the original string, unchanged
pub fn format_date<'a>(input: impl Into<DateInput<'a>>, format: DateFormat) -> String {
    match resolve(input.into()) {
        Ok(dt) => dt.format(format.pattern()).to_string(),
        Err(original) => {
            if !original.is_empty() {
                tracing::trace!(input = original, "unparseable date, passing through");
            }
            original.to_string()
        }
    }
}

/// Same date as `format_date`, then a space and the short time ("09:30 AM")
pub fn format_date_time<'a>(input: impl Into<DateInput<'a>>, format: DateFormat) -> String {
    match resolve(input.into()) {
        Ok(dt) => format!("{} {}", dt.format(format.pattern()), dt.format("%I:%M %p")),
        Err(original) => original.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FORMATS: [DateFormat; 3] = [
        DateFormat::DayMonthYear,
        DateFormat::MonthDayYear,
        DateFormat::YearMonthDay,
    ];

    #[test]
    fn test_format_date_three_layouts() {
        assert_eq!(format_date("2024-01-05", "DD-MM-YYYY".into()), "05-01-2024");
        assert_eq!(format_date("2024-01-05", "MM-DD-YYYY".into()), "01-05-2024");
        assert_eq!(format_date("2024-01-05", "YYYY-MM-DD".into()), "2024-01-05");
    }

    #[test]
    fn test_unknown_format_falls_back_to_day_month_year() {
        assert_eq!(DateFormat::from("DD/MM/YY"), DateFormat::DayMonthYear);
        assert_eq!(format_date("2024-12-31", "whatever".into()), "31-12-2024");
    }

    #[test]
    fn test_empty_and_unparseable_inputs() {
        for format in ALL_FORMATS {
            assert_eq!(format_date("", format), "");
            assert_eq!(format_date("not-a-date", format), "not-a-date");
            assert_eq!(format_date_time("", format), "");
            assert_eq!(format_date_time("not-a-date", format), "not-a-date");
        }
    }

    #[test]
    fn test_invalid_calendar_date_passes_through() {
        assert_eq!(format_date("2024-02-30", DateFormat::default()), "2024-02-30");
    }

    #[test]
    fn test_accepts_stored_layouts() {
        let expected = "05-01-2024";
        assert_eq!(format_date("2024-01-05T10:15:00", DateFormat::DayMonthYear), expected);
        assert_eq!(format_date("2024-01-05T10:15:00.250Z", DateFormat::DayMonthYear), expected);
        assert_eq!(format_date("2024-01-05 10:15:00", DateFormat::DayMonthYear), expected);
        assert_eq!(format_date("2024/01/05", DateFormat::DayMonthYear), expected);
        assert_eq!(format_date("01/05/2024", DateFormat::DayMonthYear), expected);
    }

    #[test]
    fn test_rfc3339_keeps_written_calendar_date() {
        // Late evening with an offset must not roll into the next day
        assert_eq!(
            format_date("2024-03-31T23:30:00+05:30", DateFormat::YearMonthDay),
            "2024-03-31"
        );
    }

    #[test]
    fn test_chrono_values() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 9).unwrap();
        assert_eq!(format_date(date, DateFormat::MonthDayYear), "07-09-2023");

        let dt = date.and_hms_opt(14, 5, 0).unwrap();
        assert_eq!(format_date_time(dt, DateFormat::DayMonthYear), "09-07-2023 02:05 PM");
    }

    #[test]
    fn test_format_date_time_contains_format_date() {
        for input in ["2024-01-05", "2024-01-05T09:30:00", "2025-11-20T18:45:10Z"] {
            for format in ALL_FORMATS {
                let date = format_date(input, format);
                let date_time = format_date_time(input, format);
                assert!(date_time.starts_with(&format!("{} ", date)), "{} vs {}", date_time, date);
            }
        }
    }

    #[test]
    fn test_format_date_time_midnight_for_date_only() {
        assert_eq!(format_date_time("2024-01-05", DateFormat::DayMonthYear), "05-01-2024 12:00 AM");
    }

    #[test]
    fn test_date_format_serde_roundtrip_tag() {
        let format: DateFormat = serde_json::from_str("\"MM-DD-YYYY\"").unwrap();
        assert_eq!(format, DateFormat::MonthDayYear);
        assert_eq!(serde_json::to_string(&format).unwrap(), "\"MM-DD-YYYY\"");

        let unknown: DateFormat = serde_json::from_str("\"D.M.Y\"").unwrap();
        assert_eq!(unknown, DateFormat::DayMonthYear);
    }
}

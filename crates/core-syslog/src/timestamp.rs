//! Timestamp element.
//!
//! Two stock formats: ISO-8601 (`%Y-%m-%dT%H:%M:%S`) and the traditional
//! syslog stamp (`%b %d %H:%M:%S`). The traditional format carries no year;
//! the year is captured once at construction so parsing itself stays pure.

use crate::parser::ParseError;
use chrono::{Datelike, Local, NaiveDateTime};

#[derive(Debug, Clone)]
pub struct LogTimestamp {
    format: String,
    needs_year: bool,
    current_year: i32,
}

impl LogTimestamp {
    pub fn from_iso8601() -> Self {
        LogTimestamp::new("%Y-%m-%dT%H:%M:%S")
    }

    pub fn from_traditional() -> Self {
        LogTimestamp::new("%b %d %H:%M:%S")
    }

    pub fn new(format: &str) -> Self {
        LogTimestamp {
            format: format.to_string(),
            needs_year: !format.contains("%Y"),
            current_year: Local::now().year(),
        }
    }

    /// Number of whitespace-delimited input fields the stamp spans; the line
    /// parser consumes exactly this many.
    pub fn field_count(&self) -> usize {
        self.format.split_whitespace().count()
    }

    pub fn parse(&self, text: &str) -> Result<NaiveDateTime, ParseError> {
        // Days in traditional stamps are space-padded ("Jan  5"); collapse
        // whitespace runs before handing the text to the format.
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let (input, format) = if self.needs_year {
            (
                format!("{} {}", self.current_year, collapsed),
                format!("%Y {}", self.format),
            )
        } else {
            (collapsed, self.format.clone())
        };
        NaiveDateTime::parse_from_str(&input, &format)
            .map_err(|_| ParseError::InvalidTimestamp(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn iso8601_parses() {
        let stamp = LogTimestamp::from_iso8601();
        let parsed = stamp.parse("2021-01-05T10:11:12").unwrap();
        let expected = NaiveDate::from_ymd_opt(2021, 1, 5)
            .and_then(|d| d.and_hms_opt(10, 11, 12))
            .unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(stamp.field_count(), 1);
    }

    #[test]
    fn traditional_fills_in_the_current_year() {
        let stamp = LogTimestamp::from_traditional();
        let parsed = stamp.parse("Jan  5 10:11:12").unwrap();
        assert_eq!(parsed.year(), Local::now().year());
        assert_eq!(parsed.month(), 1);
        assert_eq!(parsed.day(), 5);
        assert_eq!(parsed.hour(), 10);
        assert_eq!(stamp.field_count(), 3);
    }

    #[test]
    fn garbage_is_rejected() {
        let stamp = LogTimestamp::from_iso8601();
        assert!(matches!(
            stamp.parse("not-a-date"),
            Err(ParseError::InvalidTimestamp(_))
        ));
    }
}

//! Format-driven line parser.
//!
//! The format string names the fields of one input line with `${...}`
//! macros; everything else must match literally, with whitespace between
//! tokens collapsed. `${MESSAGE}` swallows the rest of the line and must be
//! the final token.

use crate::timestamp::LogTimestamp;
use crate::{Facility, LogHost, Logline, Severity};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unknown syslog macro ${{{0}}}")]
    UnknownMacro(String),
    #[error("${{MESSAGE}} is only supported as the final token")]
    MessageNotLast,
    #[error("unterminated ${{...}} macro in format string")]
    UnterminatedMacro,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected literal '{expected}', found {found:?}")]
    LiteralMismatch { expected: char, found: Option<char> },
    #[error("line ended before all format tokens were matched")]
    UnexpectedEnd,
    #[error("message does not look like a syslog process message")]
    MalformedMessage,
    #[error("process field carries an invalid PID")]
    InvalidPid,
    #[error("unknown facility '{0}'")]
    UnknownFacility(String),
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
    #[error("facility number {0} out of range")]
    FacilityOutOfRange(i32),
    #[error("severity number {0} out of range")]
    SeverityOutOfRange(i32),
    #[error("unparseable timestamp '{0}'")]
    InvalidTimestamp(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatToken {
    Literal(char),
    Origin,
    Facility,
    FacilityNum,
    IsoDate,
    TradDate,
    Severity,
    SeverityNum,
    Message,
    Ignore,
}

#[derive(Debug)]
pub struct LoglineParser {
    tokens: Vec<FormatToken>,
    iso_stamp: LogTimestamp,
    trad_stamp: LogTimestamp,
}

impl LoglineParser {
    pub fn new(format: &str) -> Result<Self, FormatError> {
        let mut tokens = Vec::new();
        let mut cursor = 0;
        while cursor < format.len() {
            let rest = &format[cursor..];
            if let Some(body) = rest.strip_prefix("${") {
                let end = body.find('}').ok_or(FormatError::UnterminatedMacro)?;
                let keyword = &body[..end];
                let token = match keyword {
                    "ORIGIN" => FormatToken::Origin,
                    "FACILITY" => FormatToken::Facility,
                    "FACILITY_NUM" => FormatToken::FacilityNum,
                    "ISODATE" => FormatToken::IsoDate,
                    "DATE" => FormatToken::TradDate,
                    "SEVERITY" => FormatToken::Severity,
                    "SEVERITY_NUM" => FormatToken::SeverityNum,
                    "MESSAGE" => FormatToken::Message,
                    "IGNORE" => FormatToken::Ignore,
                    _ => return Err(FormatError::UnknownMacro(keyword.to_string())),
                };
                cursor += 2 + end + 1;
                if token == FormatToken::Message && cursor != format.len() {
                    return Err(FormatError::MessageNotLast);
                }
                tokens.push(token);
                continue;
            }
            // Unreachable only on empty rest, which the loop guard excludes.
            let Some(c) = rest.chars().next() else { break };
            if !c.is_whitespace() {
                tokens.push(FormatToken::Literal(c));
            }
            cursor += c.len_utf8();
        }
        Ok(LoglineParser {
            tokens,
            iso_stamp: LogTimestamp::from_iso8601(),
            trad_stamp: LogTimestamp::from_traditional(),
        })
    }

    pub fn parse_line(&self, line: &str) -> Result<Logline, ParseError> {
        let mut logline = Logline::default();
        let mut rest = line;
        for token in &self.tokens {
            match token {
                FormatToken::Literal(expected) => {
                    let trimmed = rest.trim_start();
                    let mut chars = trimmed.chars();
                    match chars.next() {
                        Some(c) if c == *expected => rest = chars.as_str(),
                        found => {
                            return Err(ParseError::LiteralMismatch {
                                expected: *expected,
                                found,
                            })
                        }
                    }
                }
                FormatToken::Origin => {
                    let (word, tail) = take_word(rest)?;
                    logline.set_origin(LogHost::from(word));
                    rest = tail;
                }
                FormatToken::Facility => {
                    let (word, tail) = take_word(rest)?;
                    let facility = Facility::from_name(word)
                        .ok_or_else(|| ParseError::UnknownFacility(word.to_string()))?;
                    logline.set_facility(facility);
                    rest = tail;
                }
                FormatToken::FacilityNum => {
                    let (word, tail) = take_word(rest)?;
                    let number: i32 = word
                        .parse()
                        .map_err(|_| ParseError::InvalidNumber(word.to_string()))?;
                    let facility = Facility::from_number(number)
                        .ok_or(ParseError::FacilityOutOfRange(number))?;
                    logline.set_facility(facility);
                    rest = tail;
                }
                FormatToken::Severity => {
                    let (word, tail) = take_word(rest)?;
                    // Unknown severity names are tolerated and leave the
                    // field unset.
                    if let Some(severity) = Severity::from_name(word) {
                        logline.set_severity(severity);
                    }
                    rest = tail;
                }
                FormatToken::SeverityNum => {
                    let (word, tail) = take_word(rest)?;
                    let number: i32 = word
                        .parse()
                        .map_err(|_| ParseError::InvalidNumber(word.to_string()))?;
                    let severity = Severity::from_number(number)
                        .ok_or(ParseError::SeverityOutOfRange(number))?;
                    logline.set_severity(severity);
                    rest = tail;
                }
                FormatToken::IsoDate => {
                    let (word, tail) = take_word(rest)?;
                    logline.set_timestamp(self.iso_stamp.parse(word)?);
                    rest = tail;
                }
                FormatToken::TradDate => {
                    let (fields, tail) = take_fields(rest, self.trad_stamp.field_count())?;
                    logline.set_timestamp(self.trad_stamp.parse(&fields)?);
                    rest = tail;
                }
                FormatToken::Ignore => {
                    if let Ok((_, tail)) = take_word(rest) {
                        rest = tail;
                    }
                }
                FormatToken::Message => {
                    logline.set_full_message(rest.trim_start())?;
                    rest = "";
                }
            }
        }
        Ok(logline)
    }
}

fn take_word(rest: &str) -> Result<(&str, &str), ParseError> {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        return Err(ParseError::UnexpectedEnd);
    }
    let end = trimmed
        .find(char::is_whitespace)
        .unwrap_or(trimmed.len());
    Ok((&trimmed[..end], &trimmed[end..]))
}

fn take_fields(rest: &str, count: usize) -> Result<(String, &str), ParseError> {
    let mut fields = Vec::with_capacity(count);
    let mut tail = rest;
    for _ in 0..count {
        let (word, next_tail) = take_word(tail)?;
        fields.push(word);
        tail = next_tail;
    }
    Ok((fields.join(" "), tail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_the_default_format() {
        let parser = LoglineParser::new("${DATE} ${ORIGIN} ${MESSAGE}").unwrap();
        let line = parser
            .parse_line("Jan  5 10:11:12 loghost01 sshd[4321]: Accepted password for root")
            .unwrap();
        let stamp = line.timestamp().unwrap();
        assert_eq!((stamp.month(), stamp.day(), stamp.hour()), (1, 5, 10));
        assert_eq!(line.origin().unwrap().to_string(), "loghost01");
        assert_eq!(line.process(), "sshd");
        assert_eq!(line.pid(), Some(4321));
        assert_eq!(line.message(), "Accepted password for root");
    }

    #[test]
    fn parses_iso_dates_and_literals() {
        let parser = LoglineParser::new("${ISODATE} - ${SEVERITY} ${MESSAGE}").unwrap();
        let line = parser
            .parse_line("2021-01-05T10:11:12 - warning cron[7]: job started")
            .unwrap();
        assert_eq!(line.timestamp().unwrap().year(), 2021);
        assert_eq!(line.severity(), Some(crate::Severity::Warning));
        assert_eq!(line.process(), "cron");
    }

    #[test]
    fn ignore_skips_a_field() {
        let parser = LoglineParser::new("${IGNORE} ${MESSAGE}").unwrap();
        let line = parser.parse_line("junk sshd: session opened").unwrap();
        assert_eq!(line.process(), "sshd");
        assert_eq!(line.message(), "session opened");
    }

    #[test]
    fn numeric_facility_and_severity() {
        let parser =
            LoglineParser::new("<${FACILITY_NUM}.${SEVERITY_NUM}> ${MESSAGE}").unwrap();
        let line = parser.parse_line("<3 . 6 > app: ready").unwrap();
        assert_eq!(line.facility(), Some(crate::Facility::Daemon));
        assert_eq!(line.severity(), Some(crate::Severity::Info));
    }

    #[test]
    fn unknown_macro_is_a_format_error() {
        assert_eq!(
            LoglineParser::new("${BOGUS} ${MESSAGE}").unwrap_err(),
            FormatError::UnknownMacro("BOGUS".to_string())
        );
    }

    #[test]
    fn message_must_be_last() {
        assert_eq!(
            LoglineParser::new("${MESSAGE} ${ORIGIN}").unwrap_err(),
            FormatError::MessageNotLast
        );
    }

    #[test]
    fn unterminated_macro_is_rejected() {
        assert_eq!(
            LoglineParser::new("${MESSAGE").unwrap_err(),
            FormatError::UnterminatedMacro
        );
    }

    #[test]
    fn literal_mismatch_is_reported() {
        let parser = LoglineParser::new("! ${MESSAGE}").unwrap();
        assert_eq!(
            parser.parse_line("? sshd: hi").unwrap_err(),
            ParseError::LiteralMismatch {
                expected: '!',
                found: Some('?'),
            }
        );
    }

    #[test]
    fn unknown_facility_name_is_rejected() {
        let parser = LoglineParser::new("${FACILITY} ${MESSAGE}").unwrap();
        assert_eq!(
            parser.parse_line("bogus sshd: hi").unwrap_err(),
            ParseError::UnknownFacility("bogus".to_string())
        );
    }

    #[test]
    fn truncated_line_is_rejected() {
        let parser = LoglineParser::new("${DATE} ${ORIGIN} ${MESSAGE}").unwrap();
        assert_eq!(
            parser.parse_line("Jan 5").unwrap_err(),
            ParseError::UnexpectedEnd
        );
    }
}

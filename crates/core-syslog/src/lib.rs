//! Syslog-style log records.
//!
//! A [`Logline`] carries the fields a format-driven [`LoglineParser`]
//! extracts from one input line. Only the `process` and `message` fields
//! feed the clustering core; the rest is kept for output and debugging.

mod host;
mod parser;
mod timestamp;

pub use host::LogHost;
pub use parser::{FormatError, LoglineParser, ParseError};
pub use timestamp::LogTimestamp;

use chrono::NaiveDateTime;
use std::fmt::Write as _;

/// Syslog facilities, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facility {
    Kern,
    User,
    Mail,
    Daemon,
    Auth,
    Lpr,
    News,
    Uucp,
    Clock,
    Authpriv,
    Ftp,
    Ntp,
    Audit,
    Alert,
    Cron,
    Local0,
    Local1,
    Local2,
    Local3,
    Local4,
    Local5,
    Local6,
    Local7,
}

impl Facility {
    pub fn from_name(name: &str) -> Option<Facility> {
        Some(match name {
            "kern" => Facility::Kern,
            "user" => Facility::User,
            "mail" => Facility::Mail,
            "daemon" => Facility::Daemon,
            "auth" => Facility::Auth,
            "lpr" => Facility::Lpr,
            "news" => Facility::News,
            "uucp" => Facility::Uucp,
            "clock" => Facility::Clock,
            "authpriv" => Facility::Authpriv,
            "ftp" => Facility::Ftp,
            "ntp" => Facility::Ntp,
            "audit" => Facility::Audit,
            "alert" => Facility::Alert,
            "cron" => Facility::Cron,
            "local0" => Facility::Local0,
            "local1" => Facility::Local1,
            "local2" => Facility::Local2,
            "local3" => Facility::Local3,
            "local4" => Facility::Local4,
            "local5" => Facility::Local5,
            "local6" => Facility::Local6,
            "local7" => Facility::Local7,
            _ => return None,
        })
    }

    pub fn from_number(number: i32) -> Option<Facility> {
        const ALL: [Facility; 23] = [
            Facility::Kern,
            Facility::User,
            Facility::Mail,
            Facility::Daemon,
            Facility::Auth,
            Facility::Lpr,
            Facility::News,
            Facility::Uucp,
            Facility::Clock,
            Facility::Authpriv,
            Facility::Ftp,
            Facility::Ntp,
            Facility::Audit,
            Facility::Alert,
            Facility::Cron,
            Facility::Local0,
            Facility::Local1,
            Facility::Local2,
            Facility::Local3,
            Facility::Local4,
            Facility::Local5,
            Facility::Local6,
            Facility::Local7,
        ];
        usize::try_from(number).ok().and_then(|i| ALL.get(i).copied())
    }
}

/// Syslog severities, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Emerg,
    Alert,
    Crit,
    Err,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Severity {
    pub fn from_name(name: &str) -> Option<Severity> {
        Some(match name {
            "emerg" => Severity::Emerg,
            "alert" => Severity::Alert,
            "crit" => Severity::Crit,
            "err" => Severity::Err,
            "warning" => Severity::Warning,
            "notice" => Severity::Notice,
            "info" => Severity::Info,
            "debug" => Severity::Debug,
            _ => return None,
        })
    }

    pub fn from_number(number: i32) -> Option<Severity> {
        const ALL: [Severity; 8] = [
            Severity::Emerg,
            Severity::Alert,
            Severity::Crit,
            Severity::Err,
            Severity::Warning,
            Severity::Notice,
            Severity::Info,
            Severity::Debug,
        ];
        usize::try_from(number).ok().and_then(|i| ALL.get(i).copied())
    }
}

/// One parsed record of the input stream.
#[derive(Debug, Clone, Default)]
pub struct Logline {
    timestamp: Option<NaiveDateTime>,
    facility: Option<Facility>,
    severity: Option<Severity>,
    origin: Option<LogHost>,
    process: String,
    pid: Option<i32>,
    message: String,
}

impl Logline {
    /// Dissect `proc[pid]: message` into the process, PID and message
    /// fields. The substring up to the first `:` names the process, with an
    /// optional bracketed PID immediately before the colon; the message is
    /// everything after the colon and the following space.
    pub fn set_full_message(&mut self, full_message: &str) -> Result<(), ParseError> {
        let delim = full_message
            .find(':')
            .filter(|pos| *pos >= 1)
            .ok_or(ParseError::MalformedMessage)?;
        self.message = full_message.get(delim + 2..).unwrap_or("").to_string();

        let mut process_end = delim;
        if full_message[..delim].ends_with(']') {
            let bracket = full_message[..delim]
                .rfind('[')
                .ok_or(ParseError::MalformedMessage)?;
            let digits = &full_message[bracket + 1..delim - 1];
            self.pid = Some(digits.parse().map_err(|_| ParseError::InvalidPid)?);
            process_end = bracket;
        }
        self.process = full_message[..process_end].to_string();
        Ok(())
    }

    /// `process[pid]: message`, the inverse of [`Logline::set_full_message`].
    pub fn full_message(&self) -> String {
        let mut out = self.process.clone();
        if let Some(pid) = self.pid {
            let _ = write!(out, "[{pid}]");
        }
        out.push_str(": ");
        out.push_str(&self.message);
        out
    }

    /// `process: message`, the per-process clustering key.
    pub fn tagged_message(&self) -> String {
        format!("{}: {}", self.process, self.message)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: String) {
        self.message = message;
    }

    pub fn process(&self) -> &str {
        &self.process
    }

    pub fn pid(&self) -> Option<i32> {
        self.pid
    }

    pub fn origin(&self) -> Option<&LogHost> {
        self.origin.as_ref()
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    pub fn facility(&self) -> Option<Facility> {
        self.facility
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    pub(crate) fn set_origin(&mut self, origin: LogHost) {
        self.origin = Some(origin);
    }

    pub(crate) fn set_timestamp(&mut self, timestamp: NaiveDateTime) {
        self.timestamp = Some(timestamp);
    }

    pub(crate) fn set_facility(&mut self, facility: Facility) {
        self.facility = Some(facility);
    }

    pub(crate) fn set_severity(&mut self, severity: Severity) {
        self.severity = Some(severity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dissects_process_pid_and_message() {
        let mut line = Logline::default();
        line.set_full_message("sshd[4321]: Accepted password for root")
            .unwrap();
        assert_eq!(line.process(), "sshd");
        assert_eq!(line.pid(), Some(4321));
        assert_eq!(line.message(), "Accepted password for root");
        assert_eq!(line.full_message(), "sshd[4321]: Accepted password for root");
        assert_eq!(line.tagged_message(), "sshd: Accepted password for root");
    }

    #[test]
    fn dissects_without_pid() {
        let mut line = Logline::default();
        line.set_full_message("kernel: device eth0 entered promiscuous mode")
            .unwrap();
        assert_eq!(line.process(), "kernel");
        assert_eq!(line.pid(), None);
        assert_eq!(line.message(), "device eth0 entered promiscuous mode");
    }

    #[test]
    fn rejects_lines_without_a_process_delimiter() {
        let mut line = Logline::default();
        assert_eq!(
            line.set_full_message("no delimiter here"),
            Err(ParseError::MalformedMessage)
        );
        assert_eq!(
            line.set_full_message(": starts with colon"),
            Err(ParseError::MalformedMessage)
        );
    }

    #[test]
    fn rejects_non_numeric_pids() {
        let mut line = Logline::default();
        assert_eq!(
            line.set_full_message("sshd[abc]: hi"),
            Err(ParseError::InvalidPid)
        );
    }

    #[test]
    fn facility_and_severity_lookups() {
        assert_eq!(Facility::from_name("daemon"), Some(Facility::Daemon));
        assert_eq!(Facility::from_name("bogus"), None);
        assert_eq!(Facility::from_number(0), Some(Facility::Kern));
        assert_eq!(Facility::from_number(99), None);
        assert_eq!(Severity::from_name("warning"), Some(Severity::Warning));
        assert_eq!(Severity::from_number(7), Some(Severity::Debug));
        assert_eq!(Severity::from_number(-1), None);
    }
}

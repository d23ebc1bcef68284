//! The fixed library of domain filters.
//!
//! Each constructor compiles its pattern eagerly; the patterns are
//! constants, so compilation cannot fail at runtime.

use crate::number::NumberConstantFilter;
use crate::regex_filter::RegexFilter;
use regex::Regex;

fn compiled(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => unreachable!("hard-coded filter pattern failed to compile: {err}"),
    }
}

/// `<...>` spans, keeping the brackets.
pub fn pointed_bracket_filter() -> RegexFilter {
    RegexFilter::with_replacement(compiled(r"<.*?>"), "<$$v>")
}

/// `[...]` spans, keeping the brackets.
pub fn square_bracket_filter() -> RegexFilter {
    RegexFilter::with_replacement(compiled(r"\[.*?\]"), "[$$v]")
}

pub fn hexadec_constant_filter() -> RegexFilter {
    RegexFilter::new(compiled(r"\b0x[[:xdigit:]]+\b"))
}

pub fn mac_address_filter() -> RegexFilter {
    RegexFilter::new(compiled(
        r"\b(?:[[:xdigit:]]{2}[:-]){5}[[:xdigit:]]{2}\b",
    ))
}

/// Dotted-quad addresses with an optional `:port` suffix.
pub fn ipv4_address_filter() -> RegexFilter {
    RegexFilter::new(compiled(
        r"\b(?:(?:25[0-5]|2[0-4]?[0-9]?|1\d{0,2}|[1-9][0-9]?|0)\.){3}(?:25[0-5]|2[0-4]?[0-9]?|1\d{0,2}|[1-9][0-9]?|0)(?::\d{1,5})?\b",
    ))
}

pub fn time_duration_filter() -> RegexFilter {
    RegexFilter::new(compiled(r"\b-?\d+(?:\.\d+)?\s*(?:ms|s|seconds?)\b"))
}

pub fn data_size_filter() -> RegexFilter {
    RegexFilter::new(compiled(r"(?i)\b\d+(?:\.\d+)?\s*[MKGTP]?i?B\b"))
}

pub fn uuid_filter() -> RegexFilter {
    RegexFilter::new(compiled(
        r"\b\{?[[:xdigit:]]{8}-(?:[[:xdigit:]]{4}-){3}[[:xdigit:]]{12}\}?\b",
    ))
}

/// Free-standing integers between common delimiters. Runs last in the
/// standard stack so structured fragments are collapsed first.
pub fn number_constant_filter() -> NumberConstantFilter {
    NumberConstantFilter::new()
}

/// Any integer with plain word boundaries, delimiters notwithstanding.
pub fn aggressive_number_constant_filter() -> RegexFilter {
    RegexFilter::new(compiled(r"\b-?\d+\b"))
}

pub fn time_filter() -> RegexFilter {
    RegexFilter::new(compiled(r"\b\d{2}:\d{2}:\d{2}\b"))
}

pub fn date_filter() -> RegexFilter {
    RegexFilter::new(compiled(r"\b\d{2}/\d{2}/\d{2}\b"))
}

/// `[Www Mmm] 2023-04-05 06:07:08 [TZA]` style stamps.
pub fn long_date_filter() -> RegexFilter {
    RegexFilter::new(compiled(
        r"\b(?:[[:upper:]][[:lower:]]{2}\s+){0,2}\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}(?:\s+[[:upper:]]{3})?\b",
    ))
}

/// `Www Mmm dd [yyyy] hh:mm:ss [TZA[+zzzz]] [yyyy]` style stamps.
pub fn extended_date_filter() -> RegexFilter {
    RegexFilter::new(compiled(
        r"\b(?:[[:upper:]][[:lower:]]{2}\s+){2}\d{2}(?:\s+\d{4})?\s+\d{2}:\d{2}:\d{2}(?:\s+[[:upper:]]{3}(?:\+\d{4})?)?(?:\s+\d{4})?\b",
    ))
}

pub fn linux_mem_size_filter() -> RegexFilter {
    RegexFilter::new(compiled(r"(?i)\b\d+(?:\.\d+)?\s*[GKM]\b"))
}

/// Predictable network interface device names (enp0s3, wlx0123456789ab,
/// eth0, ...) in the schemes systemd/udev generate.
pub fn linux_netif_filter() -> RegexFilter {
    RegexFilter::new(compiled(
        r"\b(?:(?:P\d+)?(?:en|wl|ww)(?:o\d+|x[[:xdigit:]]{12}|(?:p\d+)?s\d+(?:f\d+)?(?:d\d+)?|p\d+s\d+(?:f\d+)?(?:u\d+)*(?:c\d+)?(?:i\d+)?)|(?:eth|wlan|wwan)\d+)\b",
    ))
}

/// Kernel audit records carry an `audit(unix_time:record_id)` token.
pub fn linux_kernel_audit_filter() -> RegexFilter {
    RegexFilter::with_replacement(compiled(r"\baudit\(\d+\.\d+:\d+\)"), "audit($$v)")
}

/// The timestamp/thread-id prefix libvirtd puts in front of its messages.
pub fn libvirtd_filter() -> RegexFilter {
    RegexFilter::new(compiled(
        r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}\+\d{4}: \d+:",
    ))
}

/// Inserts a space after `: , . = / \ " '` when an alphanumeric character
/// follows, so packed `key:value` text tokenizes.
pub fn separation_inserter() -> RegexFilter {
    RegexFilter::with_replacement(compiled(r#"([:,.=/\\"'])([[:alnum:]])"#), "${1} ${2}")
}

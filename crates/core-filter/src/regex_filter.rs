//! Regex-driven replacement filter.

use crate::LineFilter;
use regex::Regex;

/// Replaces every match of a pattern with an expansion template (default:
/// the literal parameter token `$v`). The extraction template (default: the
/// whole match) feeds `apply_extract`.
pub struct RegexFilter {
    regex: Regex,
    replacement: String,
    extraction: String,
}

impl RegexFilter {
    pub fn new(regex: Regex) -> Self {
        RegexFilter::with_replacement(regex, "$$v")
    }

    /// `replacement` uses the `regex` crate's expansion syntax: `$$` is a
    /// literal dollar, `${1}` references a capture group.
    pub fn with_replacement(regex: Regex, replacement: &str) -> Self {
        RegexFilter::with_extraction(regex, replacement, "${0}")
    }

    pub fn with_extraction(regex: Regex, replacement: &str, extraction: &str) -> Self {
        RegexFilter {
            regex,
            replacement: replacement.to_string(),
            extraction: extraction.to_string(),
        }
    }
}

impl LineFilter for RegexFilter {
    fn apply(&self, line: &str) -> String {
        self.regex
            .replace_all(line, self.replacement.as_str())
            .into_owned()
    }

    fn apply_extract(&self, line: &str, extracted: &mut Vec<String>) -> String {
        let mut result = String::with_capacity(line.len());
        let mut tail = 0;
        for captures in self.regex.captures_iter(line) {
            let Some(matched) = captures.get(0) else {
                continue;
            };
            result.push_str(&line[tail..matched.start()]);
            captures.expand(&self.replacement, &mut result);
            let mut fragment = String::new();
            captures.expand(&self.extraction, &mut fragment);
            extracted.push(fragment);
            tail = matched.end();
        }
        result.push_str(&line[tail..]);
        result
    }
}

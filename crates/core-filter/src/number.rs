//! Number constant filter.
//!
//! Replaces free-standing integers whose neighboring characters are
//! delimiters. Both boundaries are checked in code around a plain digit
//! run rather than in the pattern itself, which keeps adjacent matches
//! (`12:34`) working without consuming delimiter characters.

use crate::LineFilter;
use regex::Regex;
use std::sync::OnceLock;

// Note the asymmetry: '.' opens a number, ',' closes one.
const OPENING: &[char] = &['(', '=', '/', '\\', '\'', '"', '%', '#', '@', ':', '.'];
const CLOSING: &[char] = &[')', '/', '\\', '\'', '"', ',', '%', '#', '@', ':'];

fn number_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| match Regex::new(r"-?\d+") {
        Ok(regex) => regex,
        Err(err) => unreachable!("hard-coded number pattern failed to compile: {err}"),
    })
}

pub struct NumberConstantFilter {
    replacement: String,
}

impl NumberConstantFilter {
    pub fn new() -> Self {
        NumberConstantFilter {
            replacement: "$v".to_string(),
        }
    }
}

impl Default for NumberConstantFilter {
    fn default() -> Self {
        NumberConstantFilter::new()
    }
}

fn opens_number(c: char) -> bool {
    c.is_whitespace() || OPENING.contains(&c)
}

fn closes_number(c: char) -> bool {
    c.is_whitespace() || CLOSING.contains(&c)
}

impl NumberConstantFilter {
    fn replace(&self, line: &str, mut extracted: Option<&mut Vec<String>>) -> String {
        let mut result = String::with_capacity(line.len());
        let mut tail = 0;
        for matched in number_run().find_iter(line) {
            let before_ok = line[..matched.start()]
                .chars()
                .next_back()
                .map_or(true, opens_number);
            let after_ok = line[matched.end()..]
                .chars()
                .next()
                .map_or(true, closes_number);
            result.push_str(&line[tail..matched.start()]);
            if before_ok && after_ok {
                result.push_str(&self.replacement);
                if let Some(fragments) = extracted.as_deref_mut() {
                    fragments.push(matched.as_str().to_string());
                }
            } else {
                result.push_str(matched.as_str());
            }
            tail = matched.end();
        }
        result.push_str(&line[tail..]);
        result
    }
}

impl LineFilter for NumberConstantFilter {
    fn apply(&self, line: &str) -> String {
        self.replace(line, None)
    }

    fn apply_extract(&self, line: &str, extracted: &mut Vec<String>) -> String {
        self.replace(line, Some(extracted))
    }
}

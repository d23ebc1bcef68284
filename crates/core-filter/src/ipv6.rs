//! IPv6 address filter.
//!
//! IPv6 literals are too irregular for a single pattern (group elision,
//! bracketed forms, trailing colons that belong to the sentence rather than
//! the address), so candidates are scanned as maximal runs of hex digits and
//! colons and validated with the standard library's address parser. At most
//! one trailing colon is given back to the sentence. Ports after bracketed
//! addresses are left for the number constant filter that runs at the end of
//! the standard stack.

use crate::LineFilter;
use std::net::Ipv6Addr;

pub struct Ipv6AddressFilter {
    replacement: String,
}

impl Ipv6AddressFilter {
    pub fn new() -> Self {
        Ipv6AddressFilter {
            replacement: "$v".to_string(),
        }
    }
}

impl Default for Ipv6AddressFilter {
    fn default() -> Self {
        Ipv6AddressFilter::new()
    }
}

fn is_candidate_char(c: char) -> bool {
    c.is_ascii_hexdigit() || c == ':'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte length of the address at the start of `run`: the full run when it
/// parses, else the run minus one trailing sentence colon.
fn parseable_len(run: &str) -> Option<usize> {
    if run.parse::<Ipv6Addr>().is_ok() {
        return Some(run.len());
    }
    let trimmed = run.strip_suffix(':')?;
    trimmed
        .parse::<Ipv6Addr>()
        .is_ok()
        .then_some(trimmed.len())
}

impl LineFilter for Ipv6AddressFilter {
    fn apply(&self, line: &str) -> String {
        self.replace(line, None)
    }

    fn apply_extract(&self, line: &str, extracted: &mut Vec<String>) -> String {
        self.replace(line, Some(extracted))
    }
}

impl Ipv6AddressFilter {
    fn replace(&self, line: &str, mut extracted: Option<&mut Vec<String>>) -> String {
        let mut result = String::with_capacity(line.len());
        let mut cursor = 0;

        while cursor < line.len() {
            let rest = &line[cursor..];
            let Some(rel_start) = rest.find(is_candidate_char) else {
                result.push_str(rest);
                break;
            };
            let run_start = cursor + rel_start;
            let run_len = line[run_start..]
                .find(|c| !is_candidate_char(c))
                .unwrap_or(line.len() - run_start);
            let run_end = run_start + run_len;
            let run = &line[run_start..run_end];

            let boundary_ok = {
                let before = line[..run_start].chars().next_back();
                let after = line[run_end..].chars().next();
                !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
            };

            let address_len = if boundary_ok && run.matches(':').count() >= 2 {
                parseable_len(run)
            } else {
                None
            };

            match address_len {
                Some(address_len) => {
                    result.push_str(&line[cursor..run_start]);
                    result.push_str(&self.replacement);
                    result.push_str(&line[run_start + address_len..run_end]);
                    if let Some(fragments) = extracted.as_deref_mut() {
                        fragments.push(run[..address_len].to_string());
                    }
                }
                None => result.push_str(&line[cursor..run_end]),
            }
            cursor = run_end;
        }
        result
    }
}

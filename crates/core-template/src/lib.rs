//! Online, hierarchical template mining.
//!
//! Loglines are routed through a three-level index (token count, then an
//! anchor token: the first token, or the last when the first looks like a
//! parameter, then a flat list of templates) and either merged into the
//! most similar existing template (wildcarding the positions that differ) or
//! appended as a new one. Each template records the parameter values it has
//! absorbed; once observation ends, [`OnlineTemplater::split_templates`]
//! replaces over-generalized templates whose parameter positions co-vary
//! one-to-one by their concrete realizations.

mod layers;
mod node;

pub use layers::{LengthLayer, TemplateLayer, TokenLayer};
pub use node::TemplateNode;

use regex::Regex;
use std::io::{self, Write};
use std::sync::OnceLock;

/// The wildcard token inserted at positions where merged loglines disagree.
pub const WILDCARD: &str = "<*>";

/// A token is a possible parameter when it contains anything outside
/// `[a-zA-Z0-9:]`, or the literal replacement token `$v`.
pub fn is_possible_param(token: &str) -> bool {
    static POSSIBLE_PARAM: OnceLock<Regex> = OnceLock::new();
    let regex = POSSIBLE_PARAM.get_or_init(|| match Regex::new(r"[^a-zA-Z\d:]|\$v") {
        Ok(regex) => regex,
        Err(err) => unreachable!("hard-coded token pattern failed to compile: {err}"),
    });
    regex.is_match(token)
}

#[derive(Debug, Clone)]
pub struct TemplaterConfig {
    /// Similarity cutoff: a logline merges into a template when the share of
    /// equal tokens exceeds this.
    pub threshold: f64,
    /// Record parameter values per wildcard position.
    pub store_params: bool,
    /// Parameter table size bound; exceeding positions are dropped from
    /// bookkeeping entirely.
    pub max_param_table_entries: usize,
    /// Token excluded from the equality count during the similarity check.
    pub sentinel: String,
}

impl Default for TemplaterConfig {
    fn default() -> Self {
        TemplaterConfig {
            threshold: 0.5,
            store_params: false,
            max_param_table_entries: 500,
            sentinel: "&v".to_string(),
        }
    }
}

impl TemplaterConfig {
    pub fn new(threshold: f64, store_params: bool) -> Self {
        TemplaterConfig {
            threshold,
            store_params,
            ..TemplaterConfig::default()
        }
    }
}

/// The templater entry point: feed loglines with [`observe`], then
/// optionally [`split_templates`], then write or inspect the result.
///
/// [`observe`]: OnlineTemplater::observe
/// [`split_templates`]: OnlineTemplater::split_templates
pub struct OnlineTemplater {
    lengths: LengthLayer,
}

impl OnlineTemplater {
    pub fn new(config: TemplaterConfig) -> Self {
        OnlineTemplater {
            lengths: LengthLayer::new(config),
        }
    }

    pub fn observe(&mut self, logline: &str) {
        if !logline.is_empty() {
            self.lengths.observe(logline);
        }
    }

    pub fn split_templates(&mut self) {
        self.lengths.split_all();
    }

    /// All live templates: unsplit ones plus the children of split ones.
    pub fn current_templates(&self) -> Vec<&TemplateNode> {
        self.lengths.current_templates()
    }

    pub fn write_templates<W: Write>(&self, out: &mut W, save_params: bool) -> io::Result<()> {
        self.lengths.write(out, save_params)
    }
}

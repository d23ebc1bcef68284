//! A single mined template.

use crate::{is_possible_param, TemplaterConfig, WILDCARD};
use core_token::{count_words_with_seps, words_with_seps};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use tracing::trace;

type ParamTableEntry = BTreeMap<usize, String>;

/// A wildcarded template string plus the parameter bookkeeping that drives
/// splitting.
///
/// Invariants: the token count never changes across updates (the length
/// layer only routes same-length loglines here); positions recorded in
/// `exceeded_positions` appear in no parameter-table entry.
#[derive(Debug, Clone)]
pub struct TemplateNode {
    template: String,
    length: usize,
    config: TemplaterConfig,
    params: BTreeMap<usize, BTreeSet<String>>,
    param_table: BTreeSet<ParamTableEntry>,
    exceeded_positions: BTreeSet<usize>,
    was_split: bool,
}

impl TemplateNode {
    pub fn new(template: &str, config: TemplaterConfig) -> Self {
        TemplateNode::with_params(template, config, BTreeMap::new())
    }

    fn with_params(
        template: &str,
        config: TemplaterConfig,
        params: BTreeMap<usize, BTreeSet<String>>,
    ) -> Self {
        TemplateNode {
            length: count_words_with_seps(template),
            template: template.to_string(),
            config,
            params,
            param_table: BTreeSet::new(),
            exceeded_positions: BTreeSet::new(),
            was_split: false,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn was_split(&self) -> bool {
        self.was_split
    }

    pub fn params(&self) -> &BTreeMap<usize, BTreeSet<String>> {
        &self.params
    }

    pub fn param_table_len(&self) -> usize {
        self.param_table.len()
    }

    pub fn exceeded_positions(&self) -> &BTreeSet<usize> {
        &self.exceeded_positions
    }

    /// Share of equal tokens minus the configured threshold, or zero when
    /// the logline cannot belong to this template at all (diverging
    /// separator runs, or a disagreeing non-parameter `key=` pair).
    ///
    /// Tokens equal to the configured sentinel are excluded from the count.
    pub fn similarity(&self, logline: &str) -> f64 {
        let mut equal = 0usize;
        let mut line_iter = words_with_seps(logline);
        let mut templ_iter = words_with_seps(&self.template);
        let mut line_trailing = "";
        let mut templ_trailing = "";
        loop {
            match (line_iter.next(), templ_iter.next()) {
                (Some(line_tok), Some(templ_tok)) => {
                    if line_tok.word() == templ_tok.word()
                        && line_tok.word() != self.config.sentinel
                    {
                        equal += 1;
                    } else if line_tok.prev_seps() != templ_tok.prev_seps() {
                        return 0.0;
                    } else if line_tok.next_seps() == "="
                        && templ_tok.next_seps() == "="
                        && !is_possible_param(line_tok.word())
                        && !is_possible_param(templ_tok.word())
                    {
                        return 0.0;
                    }
                    line_trailing = line_tok.next_seps();
                    templ_trailing = templ_tok.next_seps();
                }
                (None, None) => break,
                // Guarded by the length layer; a stray length mismatch is
                // simply not similar.
                _ => return 0.0,
            }
        }
        if line_trailing != templ_trailing {
            return 0.0;
        }
        equal as f64 / self.length as f64 - self.config.threshold
    }

    /// Merge `logline` into this template: positions that disagree become
    /// the wildcard, separator runs are taken from the logline, and the
    /// replaced values enter the parameter bookkeeping.
    pub fn update(&mut self, logline: &str) {
        let mut new_template = String::with_capacity(logline.len());
        let mut templ_replaced = ParamTableEntry::new();
        let mut line_replaced = ParamTableEntry::new();
        {
            let mut templ_iter = words_with_seps(&self.template);
            for (pos, line_tok) in words_with_seps(logline).enumerate() {
                let templ_word = templ_iter.next().map(|t| t.word()).unwrap_or_default();
                if pos == 0 {
                    new_template.push_str(line_tok.prev_seps());
                }
                let tracked = !self.exceeded_positions.contains(&pos);
                if line_tok.word() != templ_word && templ_word != WILDCARD {
                    if tracked {
                        if self.config.store_params {
                            let at_pos = self.params.entry(pos).or_default();
                            at_pos.insert(line_tok.word().to_string());
                            at_pos.insert(templ_word.to_string());
                        }
                        templ_replaced.insert(pos, templ_word.to_string());
                        line_replaced.insert(pos, line_tok.word().to_string());
                    }
                    new_template.push_str(WILDCARD);
                } else {
                    if templ_word == WILDCARD && tracked {
                        if self.config.store_params {
                            self.params
                                .entry(pos)
                                .or_default()
                                .insert(line_tok.word().to_string());
                        }
                        line_replaced.insert(pos, line_tok.word().to_string());
                    }
                    new_template.push_str(templ_word);
                }
                new_template.push_str(line_tok.next_seps());
            }
        }
        self.template = new_template;
        self.update_param_table(templ_replaced, line_replaced);
    }

    fn update_param_table(&mut self, templ_params: ParamTableEntry, line_params: ParamTableEntry) {
        if !templ_params.is_empty() {
            if self.param_table.is_empty() {
                self.param_table.insert(templ_params);
            } else {
                // Newly wildcarded positions extend every recorded entry;
                // positions an entry already holds keep their value.
                let mut updated = BTreeSet::new();
                for entry in &self.param_table {
                    let mut entry = entry.clone();
                    for (pos, value) in &templ_params {
                        entry.entry(*pos).or_insert_with(|| value.clone());
                    }
                    updated.insert(entry);
                }
                self.param_table = updated;
            }
        }
        self.param_table.insert(line_params);
        if self.param_table.len() > self.config.max_param_table_entries {
            self.reduce_param_table();
        }
    }

    /// Drop the positions with the most unique realizations until the table
    /// fits its bound again, recording them as exceeded.
    fn reduce_param_table(&mut self) {
        let mut unique_at: BTreeMap<usize, BTreeSet<&str>> = BTreeMap::new();
        for entry in &self.param_table {
            for (pos, value) in entry {
                unique_at.entry(*pos).or_default().insert(value);
            }
        }
        let mut by_unique_count: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
        for (pos, values) in &unique_at {
            by_unique_count.entry(values.len()).or_default().insert(*pos);
        }

        let mut dropped = BTreeSet::new();
        while self.param_table.len() > self.config.max_param_table_entries {
            let Some((_, positions)) = by_unique_count.pop_last() else {
                break;
            };
            let mut reduced = BTreeSet::new();
            for entry in &self.param_table {
                let mut entry = entry.clone();
                for pos in &positions {
                    entry.remove(pos);
                }
                reduced.insert(entry);
            }
            dropped.extend(positions);
            self.param_table = reduced;
        }
        trace!(
            target: "template",
            template = %self.template,
            dropped = dropped.len(),
            "parameter table reduced"
        );
        self.exceeded_positions.extend(dropped);
    }

    fn entry_value<'e>(entry: &'e ParamTableEntry, pos: usize) -> &'e str {
        entry.get(&pos).map(String::as_str).unwrap_or("")
    }

    /// Positions the parameter table tracks, read off its first entry.
    fn param_positions(&self) -> BTreeSet<usize> {
        self.param_table
            .iter()
            .next()
            .map(|entry| entry.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Whether realizations at `p` determine realizations at `q` across the
    /// whole table. Also reports whether the two positions are equal in
    /// every entry, which disqualifies them as a real bijection.
    fn covariation(&self, p: usize, q: usize) -> (bool, bool) {
        let mut mapping: BTreeMap<&str, &str> = BTreeMap::new();
        let mut single_valued = true;
        let mut always_equal = true;
        for entry in &self.param_table {
            let vp = TemplateNode::entry_value(entry, p);
            let vq = TemplateNode::entry_value(entry, q);
            if vp != vq {
                always_equal = false;
            }
            match mapping.get(vp) {
                None => {
                    mapping.insert(vp, vq);
                }
                Some(mapped) if *mapped != vq => {
                    single_valued = false;
                    break;
                }
                Some(_) => {}
            }
        }
        (single_valued, always_equal)
    }

    /// Replace this template by concrete children when the parameter table
    /// reveals positions whose realizations co-vary one-to-one. Returns the
    /// children (empty when no bijection exists); a non-empty result
    /// tombstones this node via `was_split`.
    pub fn split(&mut self) -> Vec<TemplateNode> {
        self.was_split = false;

        // Step 1: bucket tracked positions by their unique-realization
        // count, separating positions where every value looks like a
        // parameter from the rest.
        let mut by_count_mixed: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut by_count_params: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for pos in self.param_positions() {
            let mut unique = BTreeSet::new();
            let mut all_params = true;
            for entry in &self.param_table {
                let value = TemplateNode::entry_value(entry, pos);
                if all_params && !is_possible_param(value) {
                    all_params = false;
                }
                unique.insert(value);
            }
            let bucket = if all_params {
                &mut by_count_params
            } else {
                &mut by_count_mixed
            };
            bucket.entry(unique.len()).or_default().push(pos);
        }

        // Step 2a: pairwise bijections within mixed buckets of plausible
        // size. Positions that are simply equal everywhere are excluded.
        let mut bijections = BTreeSet::new();
        let mut equal_positions = BTreeSet::new();
        for (&unique_count, positions) in &by_count_mixed {
            if unique_count < 2 || unique_count + 2 > self.length {
                continue;
            }
            for (i, &p) in positions.iter().enumerate() {
                for &q in &positions[i + 1..] {
                    let (single_valued, always_equal) = self.covariation(p, q);
                    if always_equal {
                        equal_positions.insert(p);
                        equal_positions.insert(q);
                    } else if single_valued {
                        bijections.insert(p);
                        bijections.insert(q);
                    }
                }
            }
        }
        for pos in &equal_positions {
            bijections.remove(pos);
        }

        // Step 2b: all-parameter positions whose bucket matches a mixed
        // bucket with an established bijection join it when they co-vary.
        let mut additions = BTreeSet::new();
        for (&unique_count, positions) in &by_count_mixed {
            let Some(param_positions) = by_count_params.get(&unique_count) else {
                continue;
            };
            for &p in positions {
                if !bijections.contains(&p) {
                    continue;
                }
                for &q in param_positions {
                    let (single_valued, _) = self.covariation(p, q);
                    if single_valued {
                        additions.insert(q);
                    }
                }
            }
        }
        bijections.extend(additions);

        if bijections.is_empty() {
            return Vec::new();
        }

        // Step 3: one concrete child per table entry, deduplicated on the
        // synthesized template string.
        let mut children: BTreeMap<String, BTreeMap<usize, BTreeSet<String>>> = BTreeMap::new();
        for entry in &self.param_table {
            let mut child = String::with_capacity(self.template.len());
            let mut params_to_store: BTreeMap<usize, String> = BTreeMap::new();
            for (pos, templ_tok) in words_with_seps(&self.template).enumerate() {
                if pos == 0 {
                    child.push_str(templ_tok.prev_seps());
                }
                if bijections.contains(&pos) {
                    child.push_str(TemplateNode::entry_value(entry, pos));
                } else {
                    child.push_str(templ_tok.word());
                    if self.config.store_params && templ_tok.word() == WILDCARD {
                        params_to_store
                            .insert(pos, TemplateNode::entry_value(entry, pos).to_string());
                    }
                }
                child.push_str(templ_tok.next_seps());
            }

            match children.entry(child) {
                std::collections::btree_map::Entry::Vacant(vacant) => {
                    let mut merged: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
                    for (pos, value) in params_to_store {
                        let values = if self.exceeded_positions.contains(&pos) {
                            BTreeSet::from(["*".to_string()])
                        } else {
                            BTreeSet::from([value])
                        };
                        merged.insert(pos, values);
                    }
                    vacant.insert(merged);
                }
                std::collections::btree_map::Entry::Occupied(mut occupied) => {
                    for (pos, value) in params_to_store {
                        if !self.exceeded_positions.contains(&pos) {
                            occupied.get_mut().entry(pos).or_default().insert(value);
                        }
                    }
                }
            }
        }

        let split: Vec<TemplateNode> = children
            .into_iter()
            .map(|(template, params)| {
                TemplateNode::with_params(&template, self.config.clone(), params)
            })
            .collect();
        if !split.is_empty() {
            trace!(
                target: "template",
                parent = %self.template,
                children = split.len(),
                "template split"
            );
            self.was_split = true;
        }
        split
    }

    pub fn write<W: Write>(&self, out: &mut W, save_params: bool) -> io::Result<()> {
        writeln!(out, "{}", self.template)?;
        if save_params {
            for (pos, values) in &self.params {
                write!(out, "  Params at pos {pos}:")?;
                for value in values {
                    write!(out, " {value}")?;
                }
                writeln!(out)?;
            }
            if !self.exceeded_positions.is_empty() {
                write!(out, "  Positions with max num of tokens exceeded:")?;
                for pos in &self.exceeded_positions {
                    write!(out, " {pos}")?;
                }
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

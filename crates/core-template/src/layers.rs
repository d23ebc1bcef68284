//! The three-level template index.

use crate::node::TemplateNode;
use crate::{is_possible_param, TemplaterConfig};
use core_token::{count_words_with_seps, words_with_seps};
use std::collections::HashMap;
use std::io::{self, Write};

/// A flat list of templates for one `(length, anchor)` bucket.
pub struct TemplateLayer {
    nodes: Vec<TemplateNode>,
    split_nodes: Vec<TemplateNode>,
    config: TemplaterConfig,
}

impl TemplateLayer {
    fn new(config: TemplaterConfig) -> Self {
        TemplateLayer {
            nodes: Vec::new(),
            split_nodes: Vec::new(),
            config,
        }
    }

    /// Update the most similar template, or start a new one when none is
    /// similar at all.
    pub fn observe(&mut self, logline: &str) {
        let mut best: Option<(f64, usize)> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            let similarity = node.similarity(logline);
            if similarity > 0.0 && best.map_or(true, |(max, _)| similarity > max) {
                best = Some((similarity, index));
            }
        }
        match best {
            Some((_, index)) => self.nodes[index].update(logline),
            None => self
                .nodes
                .push(TemplateNode::new(logline, self.config.clone())),
        }
    }

    pub fn split_all(&mut self) {
        let mut split_nodes = Vec::new();
        for node in &mut self.nodes {
            split_nodes.extend(node.split());
        }
        self.split_nodes = split_nodes;
    }

    /// Unsplit templates plus split children; tombstoned parents are hidden.
    pub fn current_templates(&self) -> impl Iterator<Item = &TemplateNode> {
        self.nodes
            .iter()
            .filter(|node| !node.was_split())
            .chain(self.split_nodes.iter())
    }

    fn write<W: Write>(&self, out: &mut W, save_params: bool) -> io::Result<()> {
        for node in self.nodes.iter().filter(|node| !node.was_split()) {
            node.write(out, save_params)?;
        }
        for node in &self.split_nodes {
            if save_params {
                write!(out, "Split: ")?;
            }
            node.write(out, save_params)?;
        }
        Ok(())
    }
}

/// Buckets same-length loglines by their anchor token: the first token when
/// it does not look like a parameter, else the last, else the catch-all
/// `"*"` bucket.
pub struct TokenLayer {
    by_first: HashMap<String, TemplateLayer>,
    by_last: HashMap<String, TemplateLayer>,
    config: TemplaterConfig,
}

impl TokenLayer {
    fn new(config: TemplaterConfig) -> Self {
        TokenLayer {
            by_first: HashMap::new(),
            by_last: HashMap::new(),
            config,
        }
    }

    pub fn observe(&mut self, logline: &str) {
        self.bucket_for(logline).observe(logline);
    }

    fn bucket_for(&mut self, logline: &str) -> &mut TemplateLayer {
        let config = &self.config;
        let first = words_with_seps(logline)
            .next()
            .map(|token| token.word().to_string())
            .unwrap_or_default();
        if !is_possible_param(&first) {
            return self
                .by_first
                .entry(first)
                .or_insert_with(|| TemplateLayer::new(config.clone()));
        }
        let last = words_with_seps(logline)
            .last()
            .map(|token| token.word().to_string())
            .unwrap_or_default();
        if !is_possible_param(&last) {
            self.by_last
                .entry(last)
                .or_insert_with(|| TemplateLayer::new(config.clone()))
        } else {
            self.by_first
                .entry("*".to_string())
                .or_insert_with(|| TemplateLayer::new(config.clone()))
        }
    }

    pub fn split_all(&mut self) {
        for layer in self.by_first.values_mut() {
            layer.split_all();
        }
        for layer in self.by_last.values_mut() {
            layer.split_all();
        }
    }

    fn layers(&self) -> impl Iterator<Item = &TemplateLayer> {
        self.by_first.values().chain(self.by_last.values())
    }
}

/// The top level: one token layer per logline token count.
pub struct LengthLayer {
    config: TemplaterConfig,
    by_length: HashMap<usize, TokenLayer>,
}

impl LengthLayer {
    pub fn new(config: TemplaterConfig) -> Self {
        LengthLayer {
            config,
            by_length: HashMap::new(),
        }
    }

    pub fn observe(&mut self, logline: &str) {
        let length = count_words_with_seps(logline);
        let config = &self.config;
        self.by_length
            .entry(length)
            .or_insert_with(|| TokenLayer::new(config.clone()))
            .observe(logline);
    }

    pub fn split_all(&mut self) {
        for layer in self.by_length.values_mut() {
            layer.split_all();
        }
    }

    pub fn current_templates(&self) -> Vec<&TemplateNode> {
        self.by_length
            .values()
            .flat_map(TokenLayer::layers)
            .flat_map(TemplateLayer::current_templates)
            .collect()
    }

    pub fn write<W: Write>(&self, out: &mut W, save_params: bool) -> io::Result<()> {
        for token_layer in self.by_length.values() {
            for layer in token_layer.layers() {
                layer.write(out, save_params)?;
            }
        }
        Ok(())
    }
}

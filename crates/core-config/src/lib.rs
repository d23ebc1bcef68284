//! Configuration loading and parsing.
//!
//! Parses `logsieve.toml` (or an override path provided by the binary) into
//! the knobs the tools expose: the logistic position weight, the clustering
//! cutoff (absent means auto-selection via the two-means classifier), and
//! the templater settings. Every section is optional and unknown fields are
//! ignored, so configurations stay forward-compatible.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File discovered in the working directory when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "logsieve.toml";

/// Logistic position weight `1 / (1 + exp(scale * k - nu))`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WeightConfig {
    pub nu: f64,
    pub scale: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        WeightConfig {
            nu: -1.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct ClusterConfig {
    /// Fixed edge cutoff. When absent, each process bucket picks its own
    /// cutoff from the distance distribution.
    pub cutoff: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TemplateConfig {
    pub threshold: f64,
    pub store_params: bool,
    pub max_table_entries: usize,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        TemplateConfig {
            threshold: 0.5,
            store_params: true,
            max_table_entries: 500,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub weight: WeightConfig,
    pub cluster: ClusterConfig,
    pub template: TemplateConfig,
}

impl Config {
    /// Load from `path` when given, else from `logsieve.toml` in the working
    /// directory when present, else defaults. An explicit path that cannot
    /// be read or parsed is an error; a missing discovery file is not.
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        let candidate: Option<PathBuf> = match path {
            Some(explicit) => Some(explicit.to_path_buf()),
            None => {
                let discovered = PathBuf::from(CONFIG_FILE_NAME);
                discovered.exists().then_some(discovered)
            }
        };
        let Some(path) = candidate else {
            info!(target: "config", "no configuration file found, using defaults");
            return Ok(Config::default());
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("parsing configuration {}", path.display()))?;
        info!(target: "config", path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

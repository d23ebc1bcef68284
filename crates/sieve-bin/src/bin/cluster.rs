//! Log clustering entrypoint.

use anyhow::Result;
use clap::Parser;
use core_config::Config;
use std::path::PathBuf;
use tracing::info;

/// Cluster the messages of a syslog-style archive by structure.
///
/// Produces `<input>-filtered` (normalized messages), `<input>-clustered`
/// (each message prefixed by its cluster id) and `<input>-wed-values` (one
/// pairwise distance per line).
#[derive(Parser, Debug)]
#[command(name = "cluster", version, about = "Cluster log messages by structure")]
struct Args {
    /// Input log file.
    pub input: PathBuf,
    /// Line format; `${MESSAGE}` must come last.
    #[arg(long = "format", default_value = "${DATE} ${ORIGIN} ${MESSAGE}")]
    pub format: String,
    /// Optional configuration file path (overrides discovery of
    /// `logsieve.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    logsieve::init_tracing();
    let args = Args::parse();
    let config = Config::load_from(args.config.as_deref())?;
    let outcome = logsieve::pipeline::run_cluster(&args.input, &args.format, &config)?;
    info!(
        target: "cluster",
        lines = outcome.lines,
        buckets = outcome.buckets,
        clusters = outcome.clusters,
        "done"
    );
    Ok(())
}

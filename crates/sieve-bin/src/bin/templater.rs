//! Template mining entrypoint.

use anyhow::Result;
use clap::Parser;
use core_config::Config;
use std::path::PathBuf;
use tracing::info;

/// Mine recurring message templates from a log file.
#[derive(Parser, Debug)]
#[command(name = "templater", version, about = "Mine recurring message templates from a log file")]
struct Args {
    /// Input log file, one message per line.
    pub input: PathBuf,
    /// Output file for the mined templates. Per-position parameter listings
    /// are written next to it with a `_pars` suffix.
    pub output: PathBuf,
    /// Optional configuration file path (overrides discovery of
    /// `logsieve.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    logsieve::init_tracing();
    let args = Args::parse();
    let config = Config::load_from(args.config.as_deref())?;
    let outcome = logsieve::pipeline::run_templater(&args.input, &args.output, &config)?;
    info!(
        target: "templater",
        lines = outcome.lines,
        unique = outcome.unique_filtered,
        templates = outcome.templates,
        "done"
    );
    Ok(())
}

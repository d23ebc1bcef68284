//! The batch pipelines behind the `templater` and `cluster` binaries.
//!
//! Both tools read a log file, normalize variable fragments with the
//! standard filter stack, and hand the residual messages to their core:
//! online template mining for `templater`, per-process WED clustering for
//! `cluster`. All file products land next to the input/output paths the
//! caller names.

use anyhow::{Context, Result};
use core_cache::SyncSymmetricCache;
use core_cluster::{agglomerative_clustering, classification_threshold};
use core_config::Config;
use core_distance::{levenshtein_str, logistic_decrease, weighted_edit_distance};
use core_filter::{FilterArray, LineFilter};
use core_syslog::{Logline, LoglineParser};
use core_template::{OnlineTemplater, TemplaterConfig};
use core_token::words_quoted;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{info, warn};

/// `path` with `suffix` appended to its final component.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

pub struct TemplaterOutcome {
    pub lines: usize,
    pub unique_filtered: usize,
    pub templates: usize,
}

/// `templater <input> <output>`: filter, deduplicate, mine, split, dump.
pub fn run_templater(input: &Path, output: &Path, config: &Config) -> Result<TemplaterOutcome> {
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("opening log file {}", input.display()))?,
    );
    info!(target: "templater", input = %input.display(), "filtering log file");

    let filters = FilterArray::standard();
    let mut unique = BTreeSet::new();
    let mut lines = 0usize;
    for line in reader.lines() {
        let line = line.with_context(|| format!("reading {}", input.display()))?;
        lines += 1;
        unique.insert(filters.apply(&line));
    }
    info!(
        target: "templater",
        lines,
        unique = unique.len(),
        "templating log file"
    );

    let mut templater = OnlineTemplater::new(TemplaterConfig {
        threshold: config.template.threshold,
        store_params: config.template.store_params,
        max_param_table_entries: config.template.max_table_entries,
        ..TemplaterConfig::default()
    });
    for line in &unique {
        templater.observe(line);
    }
    templater.split_templates();

    let mut templates_out = BufWriter::new(
        File::create(output).with_context(|| format!("creating {}", output.display()))?,
    );
    templater.write_templates(&mut templates_out, false)?;
    templates_out.flush()?;

    let pars_path = with_suffix(output, "_pars");
    let mut pars_out = BufWriter::new(
        File::create(&pars_path).with_context(|| format!("creating {}", pars_path.display()))?,
    );
    templater.write_templates(&mut pars_out, true)?;
    pars_out.flush()?;

    Ok(TemplaterOutcome {
        lines,
        unique_filtered: unique.len(),
        templates: templater.current_templates().len(),
    })
}

pub struct ClusterOutcome {
    pub lines: usize,
    pub buckets: usize,
    pub clusters: usize,
}

/// `cluster <input>`: parse, filter in parallel, then cluster each process
/// bucket under its own (configured or auto-selected) cutoff.
pub fn run_cluster(input: &Path, format: &str, config: &Config) -> Result<ClusterOutcome> {
    let parser = LoglineParser::new(format).context("compiling the line format")?;
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("opening log file {}", input.display()))?,
    );

    let mut lines: Vec<Logline> = Vec::new();
    for line in reader.lines() {
        let line = line.with_context(|| format!("reading {}", input.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        lines.push(
            parser
                .parse_line(&line)
                .with_context(|| format!("parsing line {:?}", line))?,
        );
    }
    info!(target: "cluster", lines = lines.len(), "parsed loglines");

    filter_messages(&mut lines);
    write_filtered(&with_suffix(input, "-filtered"), &lines)?;

    // Group distinct messages by emitting process.
    let mut buckets: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for line in &lines {
        buckets.entry(line.process()).or_default().insert(line.message());
    }

    let nu = config.weight.nu;
    let scale = config.weight.scale;
    let token_cache =
        SyncSymmetricCache::new(move |a: &String, b: &String| levenshtein_str(a, b) as f64);
    let wed = |a: &String, b: &String| {
        weighted_edit_distance(
            words_quoted(a),
            words_quoted(b),
            |l, r| token_cache.call(l.word().to_string(), r.word().to_string()),
            |k| logistic_decrease(k as f64, nu, scale),
        )
    };
    let wed_cache = SyncSymmetricCache::new(wed);

    let clustered_path = with_suffix(input, "-clustered");
    let mut clustered = BufWriter::new(
        File::create(&clustered_path)
            .with_context(|| format!("creating {}", clustered_path.display()))?,
    );
    let wed_path = with_suffix(input, "-wed-values");
    let mut wed_out = BufWriter::new(
        File::create(&wed_path).with_context(|| format!("creating {}", wed_path.display()))?,
    );

    let mut cluster_id = 0usize;
    let bucket_count = buckets.len();
    for (process, messages) in &buckets {
        if messages.len() < 2 {
            for message in messages {
                writeln!(clustered, "{cluster_id} -> {message}")?;
            }
            cluster_id += 1;
            continue;
        }
        info!(
            target: "cluster",
            process = %process,
            messages = messages.len(),
            "clustering process bucket"
        );

        let list: Vec<&str> = messages.iter().copied().collect();
        let mut wed_values = Vec::with_capacity(list.len() * (list.len() - 1) / 2);
        for (i, left) in list.iter().enumerate() {
            for right in &list[i + 1..] {
                let value = wed_cache.call(left.to_string(), right.to_string());
                writeln!(wed_out, "{value}")?;
                wed_values.push(value);
            }
        }

        let cutoff = match config.cluster.cutoff {
            Some(fixed) => fixed,
            None => match classification_threshold(&mut wed_values) {
                Ok(cutoff) => cutoff,
                Err(err) => {
                    // A bucket whose distances cannot be told apart stays
                    // one cluster.
                    warn!(target: "cluster", process = %process, %err, "no usable cutoff");
                    for message in messages {
                        writeln!(clustered, "{cluster_id} -> {message}")?;
                    }
                    cluster_id += 1;
                    continue;
                }
            },
        };

        let nodes: HashSet<&str> = list.iter().copied().collect();
        let clusters = agglomerative_clustering(nodes, |a: &&str, b: &&str| {
            wed_cache.call(a.to_string(), b.to_string()) < cutoff
        });
        for cluster in clusters {
            for message in cluster {
                writeln!(clustered, "{cluster_id} -> {message}")?;
            }
            cluster_id += 1;
        }
    }
    clustered.flush()?;
    wed_out.flush()?;

    Ok(ClusterOutcome {
        lines: lines.len(),
        buckets: bucket_count,
        clusters: cluster_id,
    })
}

/// Message normalization is independent per line; fan out over the
/// available cores.
fn filter_messages(lines: &mut [Logline]) {
    let filters = FilterArray::standard();
    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    let chunk_size = lines.len().div_ceil(workers).max(1);
    thread::scope(|scope| {
        for chunk in lines.chunks_mut(chunk_size) {
            let filters = &filters;
            scope.spawn(move || {
                for line in chunk {
                    line.set_message(filters.apply(line.message()));
                }
            });
        }
    });
}

fn write_filtered(path: &Path, lines: &[Logline]) -> Result<()> {
    let mut out = BufWriter::new(
        File::create(path).with_context(|| format!("creating {}", path.display()))?,
    );
    for line in lines {
        write!(out, "Process '{}' ", line.process())?;
        if let Some(pid) = line.pid() {
            write!(out, "with PID '{pid}' ")?;
        }
        writeln!(out, "wrote '{}'", line.message())?;
    }
    out.flush()?;
    Ok(())
}

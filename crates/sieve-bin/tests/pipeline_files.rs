//! File-level behavior of the two tool pipelines.

use core_config::Config;
use logsieve::pipeline::{run_cluster, run_templater, with_suffix};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

const SYSLOG_SAMPLE: &str = "\
Jan  5 10:11:12 host01 sshd[4321]: Accepted password for karl from 192.168.0.1 port 22
Jan  5 10:11:13 host01 sshd[4322]: Accepted password for karla from 192.168.0.7 port 2222
Jan  5 10:11:14 host01 sshd[4323]: Accepted password for karlas from 192.168.0.9 port 22022
Jan  5 10:12:01 host01 sshd[4330]: Failed password for invalid user admin from 192.168.0.1 port 22
Jan  5 10:12:02 host01 kernel: device eth0 entered promiscuous mode
";

fn clustered_groups(path: &Path) -> HashMap<String, HashSet<String>> {
    let mut groups: HashMap<String, HashSet<String>> = HashMap::new();
    for line in fs::read_to_string(path).unwrap().lines() {
        let (id, message) = line.split_once(" -> ").expect("cluster line shape");
        groups
            .entry(id.to_string())
            .or_default()
            .insert(message.to_string());
    }
    groups
}

#[test]
fn cluster_tool_writes_all_three_products() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "sample.log", SYSLOG_SAMPLE);
    let outcome = run_cluster(&input, "${DATE} ${ORIGIN} ${MESSAGE}", &Config::default()).unwrap();
    assert_eq!(outcome.lines, 5);
    assert_eq!(outcome.buckets, 2);

    let filtered = fs::read_to_string(with_suffix(&input, "-filtered")).unwrap();
    assert!(filtered.contains(
        "Process 'sshd' with PID '4321' wrote 'Accepted password for karl from $v port $v'"
    ));
    assert!(filtered.contains("Process 'kernel' wrote 'device $v entered promiscuous mode'"));
    assert_eq!(filtered.lines().count(), 5);

    // Only the sshd bucket has pairs: C(4, 2) distances.
    let wed_values = fs::read_to_string(with_suffix(&input, "-wed-values")).unwrap();
    assert_eq!(wed_values.lines().count(), 6);
    assert!(wed_values
        .lines()
        .all(|line| line.parse::<f64>().is_ok_and(|v| v >= 0.0)));

    let groups = clustered_groups(&with_suffix(&input, "-clustered"));
    let total: usize = groups.values().map(HashSet::len).sum();
    assert_eq!(total, 5);
    assert_eq!(groups.len(), 3);

    // The three near-identical sshd messages share one cluster; the failed
    // login and the kernel message sit alone.
    let accepted: HashSet<String> = [
        "Accepted password for karl from $v port $v",
        "Accepted password for karla from $v port $v",
        "Accepted password for karlas from $v port $v",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert!(groups.values().any(|members| *members == accepted));
    assert!(groups
        .values()
        .any(|members| members.len() == 1
            && members.contains("Failed password for invalid user admin from $v port $v")));
}

#[test]
fn cluster_tool_honors_a_fixed_cutoff() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "fixed.log", SYSLOG_SAMPLE);
    let config = Config {
        cluster: core_config::ClusterConfig { cutoff: Some(0.2) },
        ..Config::default()
    };
    run_cluster(&input, "${DATE} ${ORIGIN} ${MESSAGE}", &config).unwrap();
    let groups = clustered_groups(&with_suffix(&input, "-clustered"));
    // Cutoff 0.2 still separates accepted from failed logins.
    assert_eq!(groups.len(), 3);
}

#[test]
fn cluster_tool_fails_on_unparseable_lines() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "broken.log", "no syslog shape at all\n");
    assert!(run_cluster(&input, "${DATE} ${ORIGIN} ${MESSAGE}", &Config::default()).is_err());
}

#[test]
fn cluster_tool_fails_on_missing_input() {
    let config = Config::default();
    assert!(run_cluster(Path::new("/nonexistent.log"), "${MESSAGE}", &config).is_err());
}

#[test]
fn templater_tool_writes_templates_and_params() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        "tasks.log",
        "task 17 started on node7\ntask 18 started on node9\ntask 17 stopped on node7\n",
    );
    let output = dir.path().join("templates.txt");
    let outcome = run_templater(&input, &output, &Config::default()).unwrap();
    assert_eq!(outcome.lines, 3);
    assert_eq!(outcome.unique_filtered, 3);
    assert_eq!(outcome.templates, 1);

    let templates = fs::read_to_string(&output).unwrap();
    assert_eq!(templates, "task $v <*> on <*>\n");

    let pars = fs::read_to_string(with_suffix(&output, "_pars")).unwrap();
    assert!(pars.contains("task $v <*> on <*>\n"));
    assert!(pars.contains("  Params at pos 2: started stopped\n"));
    assert!(pars.contains("  Params at pos 4: node7 node9\n"));
}

#[test]
fn templater_tool_fails_on_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");
    assert!(run_templater(Path::new("/nonexistent.log"), &output, &Config::default()).is_err());
}

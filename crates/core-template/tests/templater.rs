//! End-to-end templater behavior through the public API.

use core_template::{OnlineTemplater, TemplaterConfig};

fn config(threshold: f64) -> TemplaterConfig {
    TemplaterConfig {
        threshold,
        store_params: true,
        ..TemplaterConfig::default()
    }
}

#[test]
fn two_observations_merge_into_one_wildcarded_template() {
    let mut templater = OnlineTemplater::new(config(0.5));
    templater.observe("foo bar 12");
    templater.observe("foo bar 34");

    let templates = templater.current_templates();
    assert_eq!(templates.len(), 1);
    let template = templates[0];
    assert_eq!(template.template(), "foo bar <*>");
    assert_eq!(template.length(), 3);
    let params: Vec<&str> = template
        .params()
        .get(&2)
        .map(|set| set.iter().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(params, vec!["12", "34"]);
}

#[test]
fn bijective_parameters_split_into_concrete_templates() {
    let mut templater = OnlineTemplater::new(config(0.34));
    for line in [
        "req A from 1",
        "req B from 2",
        "req A from 1",
        "req B from 2",
    ] {
        templater.observe(line);
    }
    templater.split_templates();

    let mut templates: Vec<&str> = templater
        .current_templates()
        .iter()
        .map(|t| t.template())
        .collect();
    templates.sort_unstable();
    assert_eq!(templates, vec!["req A from 1", "req B from 2"]);
}

#[test]
fn different_lengths_never_merge() {
    let mut templater = OnlineTemplater::new(config(0.1));
    templater.observe("service restarted");
    templater.observe("service restarted by admin");
    assert_eq!(templater.current_templates().len(), 2);
}

#[test]
fn written_dump_lists_templates_and_params() {
    let mut templater = OnlineTemplater::new(config(0.5));
    templater.observe("foo bar 12");
    templater.observe("foo bar 34");

    let mut plain = Vec::new();
    templater.write_templates(&mut plain, false).unwrap();
    assert_eq!(String::from_utf8(plain).unwrap(), "foo bar <*>\n");

    let mut with_params = Vec::new();
    templater.write_templates(&mut with_params, true).unwrap();
    let text = String::from_utf8(with_params).unwrap();
    assert!(text.contains("foo bar <*>\n"));
    assert!(text.contains("  Params at pos 2: 12 34\n"));
}

#[test]
fn split_children_are_marked_in_the_param_dump() {
    let mut templater = OnlineTemplater::new(config(0.34));
    for line in ["req A from 1", "req B from 2"] {
        templater.observe(line);
    }
    templater.split_templates();

    let mut out = Vec::new();
    templater.write_templates(&mut out, true).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Split: req A from 1\n"));
    assert!(text.contains("Split: req B from 2\n"));
    assert!(!text.contains("req <*> from <*>"));
}

#[test]
fn filtered_parameter_tokens_route_to_a_shared_bucket() {
    let mut templater = OnlineTemplater::new(config(0.34));
    // Post-filter lines whose first and last tokens are both parameters.
    templater.observe("$v connected to $v");
    templater.observe("$v connected to $v");
    assert_eq!(templater.current_templates().len(), 1);
}

//! End-to-end clustering over the weighted edit distance, with the inner
//! Levenshtein and the outer WED both memoized in symmetric caches.

use core_cache::SyncSymmetricCache;
use core_cluster::{agglomerative_clustering, find_minimum_distance_cluster};
use core_distance::{levenshtein_str, logistic_decrease, weighted_edit_distance};
use core_token::words_quoted;
use std::collections::HashSet;

fn wed(a: &str, b: &str) -> f64 {
    weighted_edit_distance(
        words_quoted(a),
        words_quoted(b),
        |l, r| levenshtein_str(l.word(), r.word()) as f64,
        |k| logistic_decrease(k as f64, 0.0, 1.0),
    )
}

#[test]
fn greetings_split_into_two_components() {
    let nodes: HashSet<&str> = ["Hallo Peter", "Hallo Heter", "Hallo Karl", "Hallp Peter"]
        .into_iter()
        .collect();
    let cached_wed = SyncSymmetricCache::new(|a: &&str, b: &&str| wed(a, b));
    let clusters =
        agglomerative_clustering(nodes.clone(), |a: &&str, b: &&str| {
            cached_wed.call(*a, *b) < 0.3
        });

    // Disjoint cover of the input.
    let total: usize = clusters.iter().map(HashSet::len).sum();
    assert_eq!(total, nodes.len());
    let union: HashSet<&str> = clusters.iter().flatten().copied().collect();
    assert_eq!(union, nodes);

    // "Hallp Peter" joins via "Hallo Peter" (first-position weight 0.269),
    // while "Hallo Karl" differs by four edits in the second token and stays
    // alone.
    assert_eq!(clusters.len(), 2);
    let karl = clusters
        .iter()
        .find(|c| c.contains("Hallo Karl"))
        .expect("Karl cluster");
    assert_eq!(karl.len(), 1);
    let rest = clusters
        .iter()
        .find(|c| c.contains("Hallo Peter"))
        .expect("Peter cluster");
    assert!(rest.contains("Hallo Heter"));
    assert!(rest.contains("Hallp Peter"));
}

#[test]
fn late_position_variants_form_one_component() {
    let nodes: HashSet<&str> = ["Hallo Peter", "Hallo Heter", "Hallo Heder", "Hallo Peder"]
        .into_iter()
        .collect();
    let cached_wed = SyncSymmetricCache::new(|a: &&str, b: &&str| wed(a, b));
    let clusters =
        agglomerative_clustering(nodes.clone(), |a: &&str, b: &&str| {
            cached_wed.call(*a, *b) < 0.25
        });
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0], nodes);
}

#[test]
fn minimum_distance_cluster_finds_the_nearest_component() {
    let nodes: HashSet<&str> = ["Hallo Peter", "Hallo Heter", "error reading disk"]
        .into_iter()
        .collect();
    let clusters = agglomerative_clustering(nodes, |a: &&str, b: &&str| wed(a, b) < 0.25);
    let (d, nearest) =
        find_minimum_distance_cluster(&"Hallo Pter", &clusters, |x, y: &&str| wed(x, y))
            .expect("non-empty clusters");
    assert!(nearest.contains("Hallo Peter"));
    assert!(d < 0.25);
}

#[test]
fn wed_agrees_with_its_cached_form() {
    let cached = SyncSymmetricCache::new(|a: &String, b: &String| wed(a, b));
    let a = "Hallo Peter".to_string();
    let b = "Hallo Heter".to_string();
    assert_eq!(cached.call(a.clone(), b.clone()), wed(&a, &b));
    assert_eq!(cached.call(b.clone(), a.clone()), wed(&a, &b));
    assert_eq!(cached.len(), 1);
}

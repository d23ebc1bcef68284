//! Parallel agglomerative clustering.
//!
//! Contract:
//! - Input: a node set and a deterministic, symmetric edge predicate.
//! - Output: disjoint non-empty clusters whose union equals the input; two
//!   nodes share a cluster iff they are connected in the graph the predicate
//!   induces. Asymmetric predicates are undefined behavior at the contract
//!   level (the working set would be left inconsistent).
//! - Cluster output order follows acceptance order within each batch; no
//!   cross-run determinism is guaranteed.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::panic;
use std::thread;
use tracing::debug;

/// Connected component reachable from `seed`, using `edge` as the adjacency
/// test. Reads `nodes` only.
pub fn bfs<N, F>(seed: N, nodes: &HashSet<N>, edge: &F) -> HashSet<N>
where
    N: Eq + Hash + Clone,
    F: Fn(&N, &N) -> bool,
{
    let mut connected = HashSet::new();
    connected.insert(seed.clone());
    let mut queue = VecDeque::new();
    queue.push_back(seed);

    while let Some(front) = queue.pop_front() {
        for node in nodes {
            if !connected.contains(node) && edge(&front, node) {
                connected.insert(node.clone());
                queue.push_back(node.clone());
            }
        }
    }
    connected
}

/// Partition `nodes` into connected components under `edge`.
///
/// Each outer pass seeds up to `available_parallelism` BFS tasks on scoped
/// threads, then serially accepts every returned component whose
/// representative is still unclaimed. Duplicate components (two seeds inside
/// the same component) are discarded; by symmetry of `edge` a component is
/// either wholly inside the working set or wholly claimed.
pub fn agglomerative_clustering<N, F>(mut nodes: HashSet<N>, edge: F) -> Vec<HashSet<N>>
where
    N: Eq + Hash + Clone + Send + Sync,
    F: Fn(&N, &N) -> bool + Sync,
{
    let max_tasks = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    let mut clusters = Vec::new();

    while !nodes.is_empty() {
        let seeds: Vec<N> = nodes.iter().take(max_tasks).cloned().collect();
        let components: Vec<HashSet<N>> = thread::scope(|scope| {
            let handles: Vec<_> = seeds
                .into_iter()
                .map(|seed| {
                    let nodes = &nodes;
                    let edge = &edge;
                    scope.spawn(move || bfs(seed, nodes, edge))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| panic::resume_unwind(payload))
                })
                .collect()
        });

        for component in components {
            debug_assert!(!component.is_empty());
            let still_unclaimed = component
                .iter()
                .next()
                .is_some_and(|representative| nodes.contains(representative));
            if still_unclaimed {
                for node in &component {
                    nodes.remove(node);
                }
                clusters.push(component);
            }
        }
        debug!(
            target: "cluster",
            accepted = clusters.len(),
            remaining = nodes.len(),
            "finished seed batch"
        );
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: &i32, b: &i32) -> bool {
        (a - b).abs() <= 1
    }

    #[test]
    fn bfs_finds_transitive_closure() {
        let nodes: HashSet<i32> = [1, 2, 3, 10].into_iter().collect();
        let component = bfs(1, &nodes, &near);
        assert_eq!(component, [1, 2, 3].into_iter().collect());
    }

    #[test]
    fn clustering_partitions_the_node_set() {
        let nodes: HashSet<i32> = [1, 2, 3, 10, 11, 20].into_iter().collect();
        let clusters = agglomerative_clustering(nodes.clone(), near);
        let total: usize = clusters.iter().map(HashSet::len).sum();
        assert_eq!(total, nodes.len());
        let union: HashSet<i32> = clusters.iter().flatten().copied().collect();
        assert_eq!(union, nodes);
        let mut sizes: Vec<usize> = clusters.iter().map(HashSet::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 2, 3]);
    }

    #[test]
    fn every_cluster_is_non_empty() {
        let nodes: HashSet<i32> = (0..100).map(|i| i * 10).collect();
        let clusters = agglomerative_clustering(nodes, near);
        assert_eq!(clusters.len(), 100);
        assert!(clusters.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn reflexive_predicate_yields_one_cluster() {
        let nodes: HashSet<i32> = (0..16).collect();
        let clusters = agglomerative_clustering(nodes, |_: &i32, _: &i32| true);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 16);
    }
}

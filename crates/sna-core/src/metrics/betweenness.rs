//! Subset betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a node lies on shortest paths
//! between other pairs of nodes. The subset variant only counts paths that
//! start in a designated source set `S` and end in a target set `T`. In the
//! friend-of-friend analysis both sets are the registered users, so friends
//! who are not users themselves still earn credit for brokering between
//! users, but paths ending at them count for nothing.
//!
//! # Algorithm
//!
//! For each source `s ∈ S`:
//!
//! 1. Run a BFS ([`ShortestPaths`]) to get distances, path counts `σ` and
//!    predecessor lists.
//! 2. Walk the reachable nodes farthest first. For node `w` with
//!    dependency `δ(w)`, every predecessor `v` receives
//!    `σ(v) / σ(w) × (1 + δ(w))` when `w ∈ T` (and `w ≠ s`), or
//!    `σ(v) / σ(w) × δ(w)` otherwise. Only paths ending at a target carry
//!    the unit endpoint credit.
//! 3. Add `δ(w)` to the running score of every `w ≠ s`.
//!
//! `δ(w)` is non-zero only when `w` is an interior vertex of some `s → t`
//! shortest path, so sources and targets never earn credit for being an
//! endpoint, including the zero-length path to themselves.
//!
//! Sources are spread across a [`WorkerPool`]; partial score vectors are
//! summed and then scaled once by [`Normalization::divisor`].
//!
//! Complexity: O(|S| · (V + E)).
//!
//! # Output
//!
//! A `HashMap<String, f64>` with one non-negative score per graph node.

use std::collections::HashMap;

use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use tracing::{debug, instrument};

use crate::config::{CentralityConfig, Normalization};
use crate::error::CentralityError;
use crate::graph::build::SocialGraph;
use crate::metrics::shortest_paths::ShortestPaths;
use crate::pool::WorkerPool;

/// Compute betweenness restricted to paths from `sources` to `targets`.
///
/// Duplicate ids collapse. A node may appear in both sets. Empty `sources`
/// or `targets` give an all-zero result.
///
/// # Errors
///
/// Returns [`CentralityError::UnknownNode`] if an id is not a node of `g`,
/// and [`CentralityError::WorkerPool`] if the worker threads cannot start.
#[instrument(skip(g, sources, targets), fields(sources = sources.len(), targets = targets.len()))]
pub fn subset_betweenness<S: AsRef<str>>(
    g: &SocialGraph,
    sources: &[S],
    targets: &[S],
    config: &CentralityConfig,
) -> Result<HashMap<String, f64>, CentralityError> {
    let n = g.node_count();
    let sources = resolve_unique(g, sources)?;
    let target_list = resolve_unique(g, targets)?;

    let mut target_set = FixedBitSet::with_capacity(n);
    for t in &target_list {
        target_set.insert(t.index());
    }

    if sources.is_empty() || target_list.is_empty() {
        debug!("empty source or target set; all scores are zero");
        return Ok(scores_by_id(g, &vec![0.0; n]));
    }

    let overlap = sources.iter().any(|s| target_set.contains(s.index()));
    let divisor = config
        .normalization
        .divisor(sources.len(), target_list.len(), overlap);

    let pool = WorkerPool::new(config.workers);
    let mut totals = pool.run(&sources, n, |chunk| {
        accumulate_sources(g, chunk, &target_set)
    })?;

    if let Some(d) = divisor {
        for score in &mut totals {
            *score /= d;
        }
    } else if config.normalization != Normalization::Raw {
        debug!("single overlapping source; scores left unscaled");
    }

    Ok(scores_by_id(g, &totals))
}

/// Un-normalized dependency sums for one chunk of sources.
///
/// Returns a dense vector indexed by `NodeIndex::index()`. This is the unit
/// of work each pool worker runs; per-source buffers are reused across the
/// chunk and dropped at the end.
#[must_use]
pub fn accumulate_sources(
    g: &SocialGraph,
    sources: &[NodeIndex],
    targets: &FixedBitSet,
) -> Vec<f64> {
    let n = g.node_count();
    let mut scores = vec![0.0; n];
    let mut delta = vec![0.0; n];
    let mut sp = ShortestPaths::with_capacity(n);

    for &s in sources {
        sp.compute(g, s);
        back_propagate(&sp, targets, &mut delta, &mut scores);
    }

    scores
}

/// Reverse-order dependency accumulation for the source of `sp`.
///
/// `delta` must be all zeros on entry and is all zeros again on return.
fn back_propagate(sp: &ShortestPaths, targets: &FixedBitSet, delta: &mut [f64], scores: &mut [f64]) {
    let Some(s) = sp.source() else { return };

    for w in sp.reverse_order() {
        let wi = w.index();
        let sigma_w = sp.sigma(w);

        if sigma_w > 0.0 {
            let endpoint = if w != s && targets.contains(wi) { 1.0 } else { 0.0 };
            let coeff = (endpoint + delta[wi]) / sigma_w;
            if coeff > 0.0 {
                for &v in sp.predecessors(w) {
                    delta[v.index()] += sp.sigma(v) * coeff;
                }
            }
        }

        if w != s {
            scores[wi] += delta[wi];
        }
    }

    for v in sp.reachable() {
        delta[v.index()] = 0.0;
    }
}

/// Map ids to node indices, dropping repeats and keeping first-seen order.
fn resolve_unique<S: AsRef<str>>(
    g: &SocialGraph,
    ids: &[S],
) -> Result<Vec<NodeIndex>, CentralityError> {
    let mut seen = FixedBitSet::with_capacity(g.node_count());
    let mut out = Vec::with_capacity(ids.len());

    for id in ids {
        let id = id.as_ref();
        let idx = g
            .node_index(id)
            .ok_or_else(|| CentralityError::UnknownNode(id.to_string()))?;
        if !seen.put(idx.index()) {
            out.push(idx);
        }
    }

    Ok(out)
}

fn scores_by_id(g: &SocialGraph, scores: &[f64]) -> HashMap<String, f64> {
    g.graph
        .node_indices()
        .filter_map(|idx| {
            let id = g.node_id(idx)?;
            Some((id.to_string(), scores.get(idx.index()).copied().unwrap_or(0.0)))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> SocialGraph {
        SocialGraph::from_edges(nodes.iter().copied(), edges.iter().copied()).0
    }

    fn raw() -> CentralityConfig {
        CentralityConfig {
            normalization: Normalization::Raw,
            ..CentralityConfig::default()
        }
    }

    fn all_ids(g: &SocialGraph) -> Vec<String> {
        let mut ids: Vec<String> = g.node_map.keys().cloned().collect();
        ids.sort();
        ids
    }

    #[test]
    fn empty_graph_returns_empty() {
        let g = SocialGraph::new();
        let bc = subset_betweenness::<&str>(&g, &[], &[], &CentralityConfig::default())
            .expect("compute");
        assert!(bc.is_empty());
    }

    #[test]
    fn empty_sources_or_targets_all_zero() {
        let g = graph(&[], &[("A", "B"), ("B", "C")]);
        let cfg = CentralityConfig::default();

        let no_sources = subset_betweenness(&g, &[], &["A", "C"], &cfg).expect("compute");
        let no_targets = subset_betweenness(&g, &["A", "C"], &[], &cfg).expect("compute");

        for bc in [no_sources, no_targets] {
            assert_eq!(bc.len(), 3);
            assert!(bc.values().all(|&v| v.abs() < f64::EPSILON));
        }
    }

    #[test]
    fn worker_failure_discards_partial_scores() {
        let g = graph(&[], &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E")]);
        let mut targets = FixedBitSet::with_capacity(g.node_count());
        let mut sources = Vec::new();
        for id in ["A", "B", "C", "D", "E"] {
            let idx = g.node_index(id).expect("node present");
            targets.insert(idx.index());
            sources.push(idx);
        }
        let bad = g.node_index("D").expect("node present");
        let pool = WorkerPool::new(NonZeroUsize::new(3).expect("non-zero"));

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pool.run(&sources, g.node_count(), |chunk| {
                assert!(!chunk.contains(&bad), "worker failed");
                accumulate_sources(&g, chunk, &targets)
            })
        }));
        assert!(outcome.is_err());
    }

    #[test]
    fn unknown_source_is_an_error() {
        let g = graph(&[], &[("A", "B")]);
        let err = subset_betweenness(&g, &["A", "Q"], &["B"], &CentralityConfig::default())
            .expect_err("Q is not a node");
        assert_eq!(err, CentralityError::UnknownNode("Q".to_string()));
    }

    #[test]
    fn linear_chain_middle_node_raw() {
        // A — B — C with S = {A}, T = {C}: B is interior to the only path.
        let g = graph(&[], &[("A", "B"), ("B", "C")]);
        let bc = subset_betweenness(&g, &["A"], &["C"], &raw()).expect("compute");

        assert!((bc["A"] - 0.0).abs() < 1e-12);
        assert!((bc["B"] - 1.0).abs() < 1e-12, "got {}", bc["B"]);
        assert!((bc["C"] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn paths_to_non_targets_earn_nothing() {
        // A — B — C — D with S = {A}, T = {C}: only B is interior to A → C.
        let g = graph(&[], &[("A", "B"), ("B", "C"), ("C", "D")]);
        let bc = subset_betweenness(&g, &["A"], &["C"], &raw()).expect("compute");

        assert!((bc["B"] - 1.0).abs() < 1e-12);
        assert!((bc["C"] - 0.0).abs() < 1e-12, "C is only an endpoint");
        assert!((bc["D"] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn target_passes_through_to_farther_target() {
        // A — B — C with S = {A}, T = {B, C}: B ends A → B but is interior
        // to A → C, so it earns exactly 1.
        let g = graph(&[], &[("A", "B"), ("B", "C")]);
        let bc = subset_betweenness(&g, &["A"], &["B", "C"], &raw()).expect("compute");
        assert!((bc["B"] - 1.0).abs() < 1e-12, "got {}", bc["B"]);
    }

    #[test]
    fn diamond_splits_credit() {
        // A — B — D, A — C — D: two shortest A → D paths.
        let g = graph(&[], &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        let bc = subset_betweenness(&g, &["A"], &["D"], &raw()).expect("compute");

        assert!((bc["B"] - 0.5).abs() < 1e-12, "got {}", bc["B"]);
        assert!((bc["C"] - 0.5).abs() < 1e-12, "got {}", bc["C"]);
        assert!((bc["A"] - 0.0).abs() < 1e-12);
        assert!((bc["D"] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn source_in_targets_gets_no_self_credit() {
        // Single node in both sets: the zero-length path earns nothing.
        let g = graph(&["A"], &[]);
        let bc = subset_betweenness(&g, &["A"], &["A"], &raw()).expect("compute");
        assert_eq!(bc.get("A"), Some(&0.0));

        // Pair in both sets: no interior vertices at all.
        let g = graph(&[], &[("A", "B")]);
        let bc = subset_betweenness(&g, &["A", "B"], &["A", "B"], &raw()).expect("compute");
        assert!(bc.values().all(|&v| v.abs() < f64::EPSILON));
    }

    #[test]
    fn duplicate_ids_collapse() {
        let g = graph(&[], &[("A", "B"), ("B", "C")]);
        let once = subset_betweenness(&g, &["A", "C"], &["A", "C"], &CentralityConfig::default())
            .expect("compute");
        let twice = subset_betweenness(
            &g,
            &["A", "C", "A", "C"],
            &["C", "A", "C"],
            &CentralityConfig::default(),
        )
        .expect("compute");
        assert_eq!(once, twice);
    }

    #[test]
    fn full_subset_normalization_on_chain() {
        // A — B — C, S = T = all: raw(B) = 2 (A → C and C → A),
        // F = (3 - 1) * 3 = 6.
        let g = graph(&[], &[("A", "B"), ("B", "C")]);
        let ids = all_ids(&g);
        let bc = subset_betweenness(&g, &ids, &ids, &CentralityConfig::default()).expect("compute");
        assert!((bc["B"] - 2.0 / 6.0).abs() < 1e-12, "got {}", bc["B"]);
    }

    #[test]
    fn disjoint_subsets_use_full_product() {
        // A — B — C, S = {A}, T = {C}: F = 1 * 1.
        let g = graph(&[], &[("A", "B"), ("B", "C")]);
        let bc = subset_betweenness(&g, &["A"], &["C"], &CentralityConfig::default())
            .expect("compute");
        assert!((bc["B"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_overlapping_source_is_left_unscaled() {
        // S = {A}, T = {A, C}: divisor would be 0.
        let g = graph(&[], &[("A", "B"), ("B", "C")]);
        let bc = subset_betweenness(&g, &["A"], &["A", "C"], &CentralityConfig::default())
            .expect("compute");
        assert!((bc["B"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn worker_counts_agree_on_grid() {
        // 4 x 4 grid graph: many tied shortest paths.
        let mut edges = Vec::new();
        for r in 0..4 {
            for c in 0..4 {
                let id = format!("n{r}{c}");
                if c + 1 < 4 {
                    edges.push((id.clone(), format!("n{r}{}", c + 1)));
                }
                if r + 1 < 4 {
                    edges.push((id.clone(), format!("n{}{c}", r + 1)));
                }
            }
        }
        let (g, _) = SocialGraph::from_edges(Vec::<String>::new(), edges);
        let ids = all_ids(&g);

        let base = subset_betweenness(&g, &ids, &ids, &CentralityConfig::default())
            .expect("compute");
        for p in [2, 3, 5, 16] {
            let cfg = CentralityConfig::with_workers(NonZeroUsize::new(p).expect("non-zero"));
            let other = subset_betweenness(&g, &ids, &ids, &cfg).expect("compute");
            for id in &ids {
                let (a, b) = (base[id], other[id]);
                assert!(
                    (a - b).abs() <= 1e-9 * a.abs().max(1.0),
                    "{id}: P=1 {a} vs P={p} {b}"
                );
            }
        }
    }

    #[test]
    fn accumulate_sources_matches_per_source_sum() {
        let g = graph(&[], &[("A", "B"), ("B", "C"), ("C", "D"), ("B", "D")]);
        let mut targets = FixedBitSet::with_capacity(g.node_count());
        for idx in g.graph.node_indices() {
            targets.insert(idx.index());
        }
        let sources: Vec<NodeIndex> = g.graph.node_indices().collect();

        let together = accumulate_sources(&g, &sources, &targets);
        let mut separate = vec![0.0; g.node_count()];
        for s in &sources {
            for (acc, x) in separate
                .iter_mut()
                .zip(accumulate_sources(&g, std::slice::from_ref(s), &targets))
            {
                *acc += x;
            }
        }
        for (a, b) in together.iter().zip(&separate) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}

//! Undirected social graph construction.
//!
//! # Overview
//!
//! Nodes are user ids (strings). An edge `A — B` means A and B are friends;
//! the relation is symmetric so each pair is stored once regardless of which
//! side the input row listed as the parent.
//!
//! ## Input policy
//!
//! - Rows with equal endpoints are self-loops and are dropped.
//! - Repeated pairs (in either orientation) collapse into one edge.
//!
//! Neither case is an error. [`SocialGraph::from_edges`] reports how many
//! rows were dropped in a [`BuildReport`].
//!
//! ## Content hash
//!
//! The graph carries a BLAKE3 hash of its sorted node ids and sorted
//! canonical `(min, max)` edge pairs. Building from the same rows in any
//! order yields the same hash.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// EdgeInsert / BuildReport
// ---------------------------------------------------------------------------

/// Outcome of [`SocialGraph::add_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    /// A new undirected edge was stored.
    Added,
    /// Both endpoints were equal; nothing was stored.
    SelfLoop,
    /// The pair was already present; nothing was stored.
    Duplicate,
}

/// Row accounting for a bulk graph build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Edges actually stored.
    pub edges_added: usize,
    /// Rows dropped because both endpoints were the same node.
    pub self_loops_ignored: usize,
    /// Rows dropped because the pair was already present.
    pub duplicates_ignored: usize,
}

impl BuildReport {
    fn record(&mut self, outcome: EdgeInsert) {
        match outcome {
            EdgeInsert::Added => self.edges_added += 1,
            EdgeInsert::SelfLoop => self.self_loops_ignored += 1,
            EdgeInsert::Duplicate => self.duplicates_ignored += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// SocialGraph
// ---------------------------------------------------------------------------

/// An undirected friendship graph keyed by user id.
///
/// Built once (usually through [`SocialGraph::from_edges`]) and then shared
/// by reference. Every metric in this crate takes `&SocialGraph`.
#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    /// Undirected graph: nodes = user ids, edges = friendships.
    pub graph: UnGraph<String, ()>,
    /// Mapping from user id to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
}

impl SocialGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an explicit node list and an edge list.
    ///
    /// Every id in `nodes` becomes a node even if no edge touches it, and
    /// every edge endpoint becomes a node. The result does not depend on
    /// the order of either list, apart from internal node indices.
    #[must_use]
    #[instrument(skip(nodes, edges))]
    pub fn from_edges<N, E, S>(nodes: N, edges: E) -> (Self, BuildReport)
    where
        N: IntoIterator<Item = S>,
        E: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut graph = Self::new();
        let mut report = BuildReport::default();

        for id in nodes {
            graph.add_node(id.as_ref());
        }

        for (a, b) in edges {
            let outcome = graph.add_edge(a.as_ref(), b.as_ref());
            if outcome != EdgeInsert::Added {
                debug!(a = a.as_ref(), b = b.as_ref(), ?outcome, "edge row ignored");
            }
            report.record(outcome);
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            self_loops = report.self_loops_ignored,
            duplicates = report.duplicates_ignored,
            "social graph built"
        );

        (graph, report)
    }

    /// Register `id` as a node. Idempotent.
    pub fn add_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.node_map.insert(id.to_string(), idx);
        idx
    }

    /// Insert the undirected edge `a — b`, creating both endpoints.
    ///
    /// Self-loops are dropped before any node is created, so a row like
    /// `(x, x)` never introduces `x` on its own.
    pub fn add_edge(&mut self, a: &str, b: &str) -> EdgeInsert {
        if a == b {
            return EdgeInsert::SelfLoop;
        }

        let ia = self.add_node(a);
        let ib = self.add_node(b);

        // Undirected `find_edge` matches either orientation.
        if self.graph.find_edge(ia, ib).is_some() {
            return EdgeInsert::Duplicate;
        }

        self.graph.add_edge(ia, ib, ());
        EdgeInsert::Added
    }

    /// Return the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of undirected edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return `true` if `id` is a node of the graph.
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// Look up the `NodeIndex` for a user id.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Return the user id stored at a node.
    #[must_use]
    pub fn node_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Ids adjacent to `id`. Empty for isolated or unknown nodes.
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.node_index(id)
            .into_iter()
            .flat_map(move |idx| self.graph.neighbors(idx))
            .filter_map(move |n| self.node_id(n))
    }

    /// Number of neighbors of the node at `idx`.
    #[must_use]
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors(idx).count()
    }

    /// Sorted canonical edge list: each pair as `(min, max)`.
    #[must_use]
    pub fn canonical_edges(&self) -> Vec<(&str, &str)> {
        let mut edges: Vec<(&str, &str)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .filter_map(|(a, b)| Some((self.node_id(a)?, self.node_id(b)?)))
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// BLAKE3 hash of the node set and edge set, independent of row order.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut ids: Vec<&str> = self.node_map.keys().map(String::as_str).collect();
        ids.sort_unstable();

        let mut hasher = blake3::Hasher::new();
        for id in ids {
            hasher.update(id.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\x01");
        for (a, b) in self.canonical_edges() {
            hasher.update(a.as_bytes());
            hasher.update(b"\x00");
            hasher.update(b.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

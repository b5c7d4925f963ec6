//! Single-source shortest-path accumulation (the forward phase of Brandes).
//!
//! # Algorithm
//!
//! Breadth-first traversal from a source `s` over unweighted edges:
//!
//! 1. The first time `w` is reached from `v`, `dist[w] = dist[v] + 1`.
//! 2. Whenever `dist[w] == dist[v] + 1` (first visit or a tie), `v` is a
//!    predecessor of `w` and `sigma[w] += sigma[v]`.
//! 3. Edges with `dist[v] + 1 > dist[w]` are not on any shortest path and
//!    are skipped.
//!
//! `sigma[s] = 1`. Nodes are recorded in visiting order, which is
//! non-decreasing in distance; walking that record backwards yields the
//! farthest-first order used for dependency back-propagation.
//!
//! Unreachable nodes are left with `dist = None`, `sigma = 0` and no
//! predecessors. Disconnected graphs are expected.
//!
//! # Reuse
//!
//! Buffers are sized to the graph once. [`ShortestPaths::compute`] resets
//! only the entries touched by the previous source, so a worker can run many
//! sources without reallocating.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;

use crate::graph::build::SocialGraph;

/// Distances, path counts and predecessor lists from one source.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: Option<NodeIndex>,
    dist: Vec<Option<usize>>,
    sigma: Vec<f64>,
    predecessors: Vec<Vec<NodeIndex>>,
    order: Vec<NodeIndex>,
    queue: VecDeque<NodeIndex>,
}

impl ShortestPaths {
    /// Empty buffers for a graph with `node_count` nodes.
    #[must_use]
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            source: None,
            dist: vec![None; node_count],
            sigma: vec![0.0; node_count],
            predecessors: vec![Vec::new(); node_count],
            order: Vec::with_capacity(node_count),
            queue: VecDeque::new(),
        }
    }

    /// Run a single-source pass from `source` with fresh buffers.
    #[must_use]
    pub fn from_source(g: &SocialGraph, source: NodeIndex) -> Self {
        let mut sp = Self::with_capacity(g.node_count());
        sp.compute(g, source);
        sp
    }

    /// Recompute all bookkeeping for `source`, reusing the buffers.
    pub fn compute(&mut self, g: &SocialGraph, source: NodeIndex) {
        let n = g.node_count();
        if self.dist.len() == n {
            self.clear_touched();
        } else {
            *self = Self::with_capacity(n);
        }

        let si = source.index();
        if si >= n {
            return;
        }

        self.source = Some(source);
        self.dist[si] = Some(0);
        self.sigma[si] = 1.0;
        self.queue.push_back(source);

        while let Some(v) = self.queue.pop_front() {
            let vi = v.index();
            self.order.push(v);

            let Some(dv) = self.dist[vi] else { continue };
            let next = dv + 1;

            for w in g.graph.neighbors(v) {
                let wi = w.index();

                // First visit to w?
                if self.dist[wi].is_none() {
                    self.dist[wi] = Some(next);
                    self.queue.push_back(w);
                }

                // Shortest path to w via v?
                if self.dist[wi] == Some(next) {
                    self.sigma[wi] += self.sigma[vi];
                    self.predecessors[wi].push(v);
                }
            }
        }
    }

    fn clear_touched(&mut self) {
        for v in self.order.drain(..) {
            let vi = v.index();
            self.dist[vi] = None;
            self.sigma[vi] = 0.0;
            self.predecessors[vi].clear();
        }
        self.queue.clear();
        self.source = None;
    }

    /// Source of the last pass, if any.
    #[must_use]
    pub const fn source(&self) -> Option<NodeIndex> {
        self.source
    }

    /// Hop count from the source, `None` when unreachable.
    #[must_use]
    pub fn distance(&self, v: NodeIndex) -> Option<usize> {
        self.dist.get(v.index()).copied().flatten()
    }

    /// Number of distinct shortest paths from the source to `v`.
    #[must_use]
    pub fn sigma(&self, v: NodeIndex) -> f64 {
        self.sigma.get(v.index()).copied().unwrap_or(0.0)
    }

    /// Nodes immediately preceding `v` on shortest paths from the source.
    #[must_use]
    pub fn predecessors(&self, v: NodeIndex) -> &[NodeIndex] {
        self.predecessors
            .get(v.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Reachable nodes (source included) in non-decreasing distance order.
    #[must_use]
    pub fn reachable(&self) -> &[NodeIndex] {
        &self.order
    }

    /// Reachable nodes farthest first.
    pub fn reverse_order(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.order.iter().rev().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

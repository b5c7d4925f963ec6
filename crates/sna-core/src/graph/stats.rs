//! Basic statistics for the social graph.
//!
//! # Statistics Provided
//!
//! - **node_count**: Total number of users (nodes), isolated ones included.
//! - **edge_count**: Total number of distinct friendships.
//! - **density**: Ratio of actual edges to possible edges for an undirected
//!   graph: `density = 2 * edge_count / (node_count * (node_count - 1))`.
//!   Zero for graphs with fewer than two nodes.
//! - **component_count**: Number of connected components. Shortest paths
//!   never cross components, so a value greater than 1 bounds how much
//!   betweenness any single node can collect.
//! - **isolated_node_count**: Nodes with no friendships at all.
//! - **max_degree**: Largest neighbor count of any node.

use petgraph::algo::connected_components;

use crate::graph::build::SocialGraph;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a [`SocialGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStats {
    /// Number of users (nodes) in the graph.
    pub node_count: usize,
    /// Number of undirected friendship edges.
    pub edge_count: usize,
    /// Graph density in `[0, 1]`.
    pub density: f64,
    /// Number of connected components.
    pub component_count: usize,
    /// Number of nodes with degree 0.
    pub isolated_node_count: usize,
    /// Maximum degree over all nodes.
    pub max_degree: usize,
}

impl GraphStats {
    /// Compute statistics for `g`.
    #[must_use]
    pub fn from_graph(g: &SocialGraph) -> Self {
        let node_count = g.node_count();
        let edge_count = g.edge_count();

        let degrees: Vec<usize> = g.graph.node_indices().map(|idx| g.degree(idx)).collect();

        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, edge_count),
            component_count: connected_components(&g.graph),
            isolated_node_count: degrees.iter().filter(|&&d| d == 0).count(),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
        }
    }

    /// Return `true` if every node is in one component.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.component_count <= 1
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64 / 2.0;
    edge_count as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

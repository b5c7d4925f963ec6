//! Degree centrality.
//!
//! The fraction of all other users a user is directly friends with:
//! `degree(v) / (n - 1)`. Graphs with fewer than two nodes have no pairs to
//! normalize against and every score is 0.

use std::collections::HashMap;

use tracing::instrument;

use crate::graph::build::SocialGraph;

/// Compute normalized degree centrality for every node.
///
/// Values lie in `[0, 1]`; isolated nodes score 0.
#[must_use]
#[instrument(skip(g))]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(g: &SocialGraph) -> HashMap<String, f64> {
    let n = g.node_count();
    if n < 2 {
        return g.graph.node_weights().map(|id| (id.clone(), 0.0)).collect();
    }
    let denom = (n - 1) as f64;

    g.graph
        .node_indices()
        .filter_map(|idx| {
            let id = g.node_id(idx)?;
            Some((id.to_string(), g.degree(idx) as f64 / denom))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

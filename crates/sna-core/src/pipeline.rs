//! End-to-end user metrics: graph build, degree and user-to-user betweenness.
//!
//! Every user id and every friendship endpoint becomes a node. Betweenness
//! uses the user list as both source and target set, so friends who are not
//! users themselves can broker between users but never count as endpoints.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, instrument};

use crate::config::CentralityConfig;
use crate::error::CentralityError;
use crate::graph::{GraphStats, SocialGraph};
use crate::metrics::{betweenness::subset_betweenness, degree::degree_centrality};

/// Centrality scores for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserMetrics {
    pub user_id: String,
    pub degree_centrality: f64,
    pub betweenness_centrality: f64,
}

/// Compute degree and user-to-user betweenness for each user.
///
/// `friendships` are `(parent_user_id, friend_id)` rows. Self-loops and
/// repeated pairs are dropped. The result has one entry per distinct user
/// id, in first-seen order: a user id listed twice yields a single row, not
/// one row per listing.
///
/// # Errors
///
/// Propagates [`CentralityError`] from the betweenness run.
#[instrument(skip(users, friendships), fields(users = users.len(), friendships = friendships.len()))]
pub fn compute_user_metrics(
    users: &[String],
    friendships: &[(String, String)],
    config: &CentralityConfig,
) -> Result<Vec<UserMetrics>, CentralityError> {
    let (graph, report) = SocialGraph::from_edges(
        users.iter().map(String::as_str),
        friendships.iter().map(|(a, b)| (a.as_str(), b.as_str())),
    );

    let stats = GraphStats::from_graph(&graph);
    info!(
        nodes = stats.node_count,
        edges = stats.edge_count,
        components = stats.component_count,
        isolated = stats.isolated_node_count,
        density = stats.density,
        max_degree = stats.max_degree,
        connected = stats.is_connected(),
        self_loops_ignored = report.self_loops_ignored,
        duplicates_ignored = report.duplicates_ignored,
        "Graph built: {} nodes, {} edges",
        stats.node_count,
        stats.edge_count
    );

    let degree = degree_centrality(&graph);
    let betweenness = subset_betweenness(&graph, users, users, config)?;

    let mut seen = HashSet::with_capacity(users.len());
    let metrics = users
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .map(|id| UserMetrics {
            user_id: id.clone(),
            degree_centrality: degree.get(id).copied().unwrap_or(0.0),
            betweenness_centrality: betweenness.get(id).copied().unwrap_or(0.0),
        })
        .collect();

    Ok(metrics)
}

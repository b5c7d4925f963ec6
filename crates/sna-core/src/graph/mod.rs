//! Social graph module.
//!
//! # Overview
//!
//! This module builds the undirected friendship graph that feeds every
//! centrality metric. Nodes are user ids; edges are friendships.
//!
//! ## Pipeline
//!
//! ```text
//! user ids + (parent_user_id, id) rows
//!        ↓  build::SocialGraph::from_edges()
//! SocialGraph (petgraph UnGraph, no self-loops, no parallel edges)
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (density, components, isolated nodes, …)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use sna_core::graph::{SocialGraph, GraphStats};
//!
//! let (g, report) = SocialGraph::from_edges(["u1", "u2", "u3"], [("u1", "u2"), ("u2", "u2")]);
//! assert_eq!(report.self_loops_ignored, 1);
//!
//! let stats = GraphStats::from_graph(&g);
//! assert_eq!(stats.isolated_node_count, 1);
//! ```

pub mod build;
pub mod stats;

// Re-export primary types at module level for convenience.
pub use build::{BuildReport, EdgeInsert, SocialGraph};
pub use stats::GraphStats;

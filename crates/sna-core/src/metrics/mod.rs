//! Centrality metrics for the social graph.
//!
//! # Overview
//!
//! Each metric answers a different question about a user's position:
//!
//! - **Degree centrality** (`degree`): What fraction of everyone else is a
//!   direct friend?
//! - **Subset betweenness** (`betweenness`): How often does a user sit on
//!   the shortest friend-of-friend chains between other users?
//!
//! `shortest_paths` holds the single-source BFS pass that betweenness runs
//! once per source.
//!
//! # Usage
//!
//! All metrics take a [`SocialGraph`](crate::graph::SocialGraph) reference
//! and return scores keyed by user id.
//!
//! ```rust
//! use sna_core::{CentralityConfig, SocialGraph};
//! use sna_core::metrics::{betweenness::subset_betweenness, degree::degree_centrality};
//!
//! let (g, _) = SocialGraph::from_edges(["a", "b", "c"], [("a", "b"), ("b", "c")]);
//! let users = ["a", "b", "c"];
//!
//! let dc = degree_centrality(&g);
//! let bc = subset_betweenness(&g, &users, &users, &CentralityConfig::default())?;
//! assert!(bc["b"] > 0.0);
//! assert!((dc["b"] - 1.0).abs() < 1e-12);
//! # Ok::<(), sna_core::CentralityError>(())
//! ```

pub mod betweenness;
pub mod degree;
pub mod shortest_paths;

#![forbid(unsafe_code)]
//! sna-core library.
//!
//! Centrality metrics for friend-of-friend social graphs: degree centrality
//! and betweenness centrality restricted to designated source and target
//! node sets.
//!
//! # Conventions
//!
//! - **Errors**: Use [`error::CentralityError`] (`thiserror`) for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Layout
//!
//! ```text
//! users + friendships
//!        ↓  graph::build::SocialGraph::from_edges()
//! SocialGraph (immutable after construction)
//!   ├─ metrics::degree::degree_centrality()
//!   └─ metrics::betweenness::subset_betweenness()
//!          └─ pool::WorkerPool (one BFS + back-propagation per source)
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod pipeline;
pub mod pool;

pub use config::{CentralityConfig, Normalization};
pub use error::CentralityError;
pub use graph::{BuildReport, EdgeInsert, GraphStats, SocialGraph};
pub use pipeline::{UserMetrics, compute_user_metrics};

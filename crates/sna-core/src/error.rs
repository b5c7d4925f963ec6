//! Error type for the centrality engine.
//!
//! Self-loops, duplicate edges and empty source/target sets are handled by
//! policy and never surface here. What remains is fatal for the whole
//! computation: partial results are discarded, nothing is retried.

/// Errors raised while computing centrality metrics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CentralityError {
    /// A source or target id does not name a node of the graph.
    #[error("node '{0}' is not part of the graph")]
    UnknownNode(String),

    /// The worker pool could not be started.
    #[error("worker pool with {workers} threads failed to start: {reason}")]
    WorkerPool {
        /// Requested worker count.
        workers: usize,
        /// Underlying failure reported by the thread pool builder.
        reason: String,
    },
}

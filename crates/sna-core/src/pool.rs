//! Fixed-size worker pool for per-source centrality work.
//!
//! # Overview
//!
//! Sources are split into at most `P` contiguous, order-preserving chunks of
//! near-equal size ([`chunk_bounds`]). Each chunk runs on its own worker of a
//! `rayon` pool with exactly `P` threads and produces a dense partial vector
//! indexed by `NodeIndex::index()`. Workers share only `&` references; every
//! accumulator is owned by the worker that fills it.
//!
//! Partial vectors are summed pointwise in chunk order. The merged result
//! depends on the chunking only through floating-point summation order.
//!
//! With `P = 1` the chunk runs on the calling thread and no pool is built.

use std::num::NonZeroUsize;
use std::ops::Range;

use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::CentralityError;

/// Split `len` items into at most `parts` contiguous ranges.
///
/// The first `len % parts` ranges hold one extra item. No range is empty;
/// fewer than `parts` ranges are returned when `len < parts`.
#[must_use]
pub fn chunk_bounds(len: usize, parts: NonZeroUsize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }

    let parts = parts.get().min(len);
    let base = len / parts;
    let extra = len % parts;

    let mut bounds = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let size = base + usize::from(i < extra);
        bounds.push(start..start + size);
        start += size;
    }
    bounds
}

/// Pointwise sum of partial vectors, folded in the order given.
#[must_use]
pub fn merge_partials(len: usize, partials: impl IntoIterator<Item = Vec<f64>>) -> Vec<f64> {
    let mut total = vec![0.0; len];
    for partial in partials {
        debug_assert_eq!(partial.len(), len, "partial vector length mismatch");
        for (acc, x) in total.iter_mut().zip(partial) {
            *acc += x;
        }
    }
    total
}

/// A pool of `P` workers that each process one chunk of sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: NonZeroUsize,
}

impl WorkerPool {
    #[must_use]
    pub const fn new(workers: NonZeroUsize) -> Self {
        Self { workers }
    }

    /// Configured degree of parallelism.
    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers.get()
    }

    /// Run `work` over chunks of `sources` and merge the partial vectors.
    ///
    /// `work` receives one chunk and must return a vector of length `len`.
    /// An empty `sources` slice yields an all-zero vector.
    ///
    /// # Errors
    ///
    /// Returns [`CentralityError::WorkerPool`] if the thread pool cannot be
    /// built. A panicking worker propagates to the caller.
    #[instrument(skip(self, sources, work), fields(workers = self.workers.get(), sources = sources.len()))]
    pub fn run<F>(
        &self,
        sources: &[NodeIndex],
        len: usize,
        work: F,
    ) -> Result<Vec<f64>, CentralityError>
    where
        F: Fn(&[NodeIndex]) -> Vec<f64> + Sync,
    {
        let bounds = chunk_bounds(sources.len(), self.workers);

        match bounds.len() {
            0 => return Ok(vec![0.0; len]),
            1 => return Ok(merge_partials(len, [work(sources)])),
            _ => {}
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers.get())
            .thread_name(|i| format!("sna-worker-{i}"))
            .build()
            .map_err(|e| CentralityError::WorkerPool {
                workers: self.workers.get(),
                reason: e.to_string(),
            })?;

        let partials: Vec<Vec<f64>> = pool.install(|| {
            bounds
                .par_iter()
                .enumerate()
                .map(|(chunk, range)| {
                    let partial = work(&sources[range.clone()]);
                    debug!(chunk, sources = range.len(), "worker chunk finished");
                    partial
                })
                .collect()
        });

        Ok(merge_partials(len, partials))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

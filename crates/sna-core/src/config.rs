use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Scaling applied to merged subset betweenness sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// Divide by `(|S| - 1) * |T|` when sources and targets overlap,
    /// otherwise by `|S| * |T|`.
    #[default]
    SubsetPairs,
    /// Leave the accumulated pair-dependency sums unscaled.
    Raw,
}

impl Normalization {
    /// Scaling divisor for the given subset sizes, or `None` when the sums
    /// are returned as-is.
    ///
    /// A single source that is also a target yields a zero divisor; the
    /// sums are left unscaled in that case.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn divisor(self, sources: usize, targets: usize, overlap: bool) -> Option<f64> {
        match self {
            Self::Raw => None,
            Self::SubsetPairs => {
                let pairs = if overlap {
                    sources.saturating_sub(1) * targets
                } else {
                    sources * targets
                };
                if pairs == 0 { None } else { Some(pairs as f64) }
            }
        }
    }
}

/// Caller-supplied settings for a centrality run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralityConfig {
    /// Degree of parallelism for subset betweenness.
    #[serde(default = "default_workers")]
    pub workers: NonZeroUsize,
    #[serde(default)]
    pub normalization: Normalization,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            normalization: Normalization::default(),
        }
    }
}

impl CentralityConfig {
    /// Config with `workers` threads and the default normalization.
    #[must_use]
    pub fn with_workers(workers: NonZeroUsize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }
}

const fn default_workers() -> NonZeroUsize {
    NonZeroUsize::MIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_single_worker_subset_pairs() {
        let cfg = CentralityConfig::default();
        assert_eq!(cfg.workers.get(), 1);
        assert_eq!(cfg.normalization, Normalization::SubsetPairs);
    }

    #[test]
    fn divisor_overlapping_subsets() {
        // S = T = 4 nodes: (4 - 1) * 4 ordered pairs.
        assert_eq!(Normalization::SubsetPairs.divisor(4, 4, true), Some(12.0));
    }

    #[test]
    fn divisor_disjoint_subsets() {
        assert_eq!(Normalization::SubsetPairs.divisor(3, 5, false), Some(15.0));
    }

    #[test]
    fn divisor_degenerate_single_overlapping_source() {
        assert_eq!(Normalization::SubsetPairs.divisor(1, 3, true), None);
        assert_eq!(Normalization::SubsetPairs.divisor(0, 3, false), None);
    }

    #[test]
    fn raw_never_scales() {
        assert_eq!(Normalization::Raw.divisor(10, 10, true), None);
    }

    #[test]
    fn deserializes_kebab_case_and_defaults() {
        let cfg: CentralityConfig =
            serde_json::from_str(r#"{"workers": 4, "normalization": "raw"}"#).expect("parse");
        assert_eq!(cfg.workers.get(), 4);
        assert_eq!(cfg.normalization, Normalization::Raw);

        let cfg: CentralityConfig = serde_json::from_str("{}").expect("parse empty");
        assert_eq!(cfg, CentralityConfig::default());
    }

    #[test]
    fn zero_workers_rejected() {
        let parsed: Result<CentralityConfig, _> = serde_json::from_str(r#"{"workers": 0}"#);
        assert!(parsed.is_err());
    }
}

//! Run configuration: optional TOML file, overridden by command-line flags.
//!
//! ```toml
//! users = "data/users.csv"
//! friendships = "data/friendships.csv"
//! output = "metrics.csv"
//! workers = 4
//! workers_env = "SLURM_CPUS_PER_TASK"
//! normalization = "subset-pairs"
//! ```

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use sna_core::Normalization;

use crate::workers::DEFAULT_WORKERS_ENV;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "user_metrics_user_to_user_betweenness.csv";

/// Every field optional; the same shape carries file values and flag values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub users: Option<PathBuf>,
    #[serde(default)]
    pub friendships: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub workers: Option<NonZeroUsize>,
    #[serde(default)]
    pub workers_env: Option<String>,
    #[serde(default)]
    pub normalization: Option<Normalization>,
}

impl RunConfig {
    /// Fill every unset field of `self` from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            users: self.users.or(fallback.users),
            friendships: self.friendships.or(fallback.friendships),
            output: self.output.or(fallback.output),
            workers: self.workers.or(fallback.workers),
            workers_env: self.workers_env.or(fallback.workers_env),
            normalization: self.normalization.or(fallback.normalization),
        }
    }

    /// Apply defaults and require the input paths.
    ///
    /// # Errors
    ///
    /// Fails if `users` or `friendships` is still unset.
    pub fn finish(self) -> Result<Settings> {
        let Some(users) = self.users else {
            bail!("no users file given (use --users or set `users` in the config file)");
        };
        let Some(friendships) = self.friendships else {
            bail!("no friendships file given (use --friendships or set `friendships` in the config file)");
        };

        Ok(Settings {
            users,
            friendships,
            output: self.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            workers: self.workers,
            workers_env: self
                .workers_env
                .unwrap_or_else(|| DEFAULT_WORKERS_ENV.to_string()),
            normalization: self.normalization.unwrap_or_default(),
        })
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub users: PathBuf,
    pub friendships: PathBuf,
    pub output: PathBuf,
    /// Explicit worker count; `None` defers to the environment.
    pub workers: Option<NonZeroUsize>,
    pub workers_env: String,
    pub normalization: Normalization,
}

/// Read a run configuration file.
///
/// # Errors
///
/// Fails if the file cannot be read or is not valid TOML for [`RunConfig`].
pub fn load_run_config(path: &Path) -> Result<RunConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<RunConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).expect("non-zero")
    }

    #[test]
    fn parse_full_file() {
        let cfg: RunConfig = toml::from_str(
            r#"
            users = "u.csv"
            friendships = "f.csv"
            output = "out.csv"
            workers = 4
            workers_env = "NSLOTS"
            normalization = "raw"
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.users, Some(PathBuf::from("u.csv")));
        assert_eq!(cfg.workers, Some(nz(4)));
        assert_eq!(cfg.workers_env.as_deref(), Some("NSLOTS"));
        assert_eq!(cfg.normalization, Some(Normalization::Raw));
    }

    #[test]
    fn empty_file_is_all_unset() {
        let cfg: RunConfig = toml::from_str("").expect("parse");
        assert_eq!(cfg, RunConfig::default());
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(toml::from_str::<RunConfig>("workers = 0").is_err());
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(toml::from_str::<RunConfig>("threads = 2").is_err());
    }

    #[test]
    fn flags_override_file() {
        let flags = RunConfig {
            users: Some(PathBuf::from("flag-users.csv")),
            workers: Some(nz(2)),
            ..RunConfig::default()
        };
        let file = RunConfig {
            users: Some(PathBuf::from("file-users.csv")),
            friendships: Some(PathBuf::from("file-friends.csv")),
            workers: Some(nz(8)),
            normalization: Some(Normalization::Raw),
            ..RunConfig::default()
        };

        let settings = flags.or(file).finish().expect("complete");
        assert_eq!(settings.users, PathBuf::from("flag-users.csv"));
        assert_eq!(settings.friendships, PathBuf::from("file-friends.csv"));
        assert_eq!(settings.workers, Some(nz(2)));
        assert_eq!(settings.normalization, Normalization::Raw);
    }

    #[test]
    fn defaults_applied() {
        let settings = RunConfig {
            users: Some(PathBuf::from("u.csv")),
            friendships: Some(PathBuf::from("f.csv")),
            ..RunConfig::default()
        }
        .finish()
        .expect("complete");
        assert_eq!(settings.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(settings.workers, None);
        assert_eq!(settings.workers_env, DEFAULT_WORKERS_ENV);
        assert_eq!(settings.normalization, Normalization::SubsetPairs);
    }

    #[test]
    fn missing_inputs_rejected() {
        let err = RunConfig::default().finish().expect_err("no users");
        assert!(err.to_string().contains("users"));

        let err = RunConfig {
            users: Some(PathBuf::from("u.csv")),
            ..RunConfig::default()
        }
        .finish()
        .expect_err("no friendships");
        assert!(err.to_string().contains("friendships"));
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "workers = \"many\"").expect("write");
        let err = load_run_config(&path).expect_err("bad workers");
        assert!(err.to_string().contains("run.toml"));
    }
}

//! Worker-count discovery.
//!
//! # Resolution
//!
//! Precedence (highest wins):
//! 1. `--workers` flag (or `workers` in the config file)
//! 2. The environment variable named by `--workers-env`, by default the
//!    SLURM allocation `SLURM_CPUS_PER_TASK`
//! 3. Default: 1
//!
//! Values that are empty, non-numeric or zero fall through to the default.

use std::num::NonZeroUsize;

use tracing::warn;

/// Environment variable consulted when no explicit count is given.
pub const DEFAULT_WORKERS_ENV: &str = "SLURM_CPUS_PER_TASK";

/// Core resolution logic, separated from I/O for testability.
///
/// `flag` is the explicit count, if any. `env_name` names the variable
/// consulted and `env_value` is its value when set.
#[must_use]
pub fn resolve_workers_inner(
    flag: Option<NonZeroUsize>,
    env_name: &str,
    env_value: Option<&str>,
) -> NonZeroUsize {
    if let Some(n) = flag {
        return n;
    }

    let Some(raw) = env_value.map(str::trim).filter(|v| !v.is_empty()) else {
        return NonZeroUsize::MIN;
    };

    match raw.parse::<NonZeroUsize>() {
        Ok(n) => n,
        Err(_) => {
            warn!(var = env_name, value = raw, "invalid worker count; using 1");
            NonZeroUsize::MIN
        }
    }
}

/// Resolve the worker count from the flag and the process environment.
#[must_use]
pub fn resolve_workers(flag: Option<NonZeroUsize>, env_name: &str) -> NonZeroUsize {
    let env_value = std::env::var(env_name).ok();
    resolve_workers_inner(flag, env_name, env_value.as_deref())
}

#![forbid(unsafe_code)]

mod config;
mod input;
mod output;
mod workers;

use std::env;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sna_core::{CentralityConfig, Normalization, compute_user_metrics};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use config::{RunConfig, load_run_config};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sna: friend-of-friend degree and betweenness centrality",
    long_about = None,
    after_help = "EXAMPLES:\n    # Score users, writing the default CSV\n    sna --users users.csv --friendships friendships.csv\n\n    # Four workers, rows also printed as JSON\n    sna --users users.csv --friendships friendships.csv --workers 4 --json"
)]
struct Cli {
    /// Users table (CSV with `id` and optional `name` columns).
    #[arg(long, value_name = "PATH")]
    users: Option<PathBuf>,

    /// Friendships table (CSV with `id` and `parent_user_id` columns).
    #[arg(long, value_name = "PATH")]
    friendships: Option<PathBuf>,

    /// Output CSV path.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Number of betweenness workers.
    #[arg(short = 'j', long)]
    workers: Option<NonZeroUsize>,

    /// Environment variable holding the worker count when --workers is absent.
    #[arg(long, value_name = "VAR")]
    workers_env: Option<String>,

    /// Betweenness scaling.
    #[arg(long, value_enum)]
    normalization: Option<NormalizationArg>,

    /// TOML file with defaults for any of the options above.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also print the result rows as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Print the top N rows as a table on stdout.
    #[arg(long, value_name = "N", conflicts_with = "json")]
    top: Option<usize>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NormalizationArg {
    /// Divide by the number of ordered user pairs.
    SubsetPairs,
    /// Unscaled pair-dependency sums.
    Raw,
}

impl From<NormalizationArg> for Normalization {
    fn from(arg: NormalizationArg) -> Self {
        match arg {
            NormalizationArg::SubsetPairs => Self::SubsetPairs,
            NormalizationArg::Raw => Self::Raw,
        }
    }
}

impl Cli {
    /// Flag values in config-file shape, for layering over the file.
    fn overrides(&self) -> RunConfig {
        RunConfig {
            users: self.users.clone(),
            friendships: self.friendships.clone(),
            output: self.output.clone(),
            workers: self.workers,
            workers_env: self.workers_env.clone(),
            normalization: self.normalization.map(Into::into),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SNA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "sna=debug,sna_core=debug,info"
        } else {
            "sna=info,sna_core=info,warn"
        })
    });

    let format = env::var("SNA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout is reserved for --json / --top.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file = match &cli.config {
        Some(path) => load_run_config(path)?,
        None => RunConfig::default(),
    };
    let settings = cli.overrides().or(file).finish()?;
    debug!(?settings, "resolved settings");

    info!("Loading data");
    let users = input::load_users(&settings.users)?;
    let friendships = input::load_friendships(&settings.friendships)?;
    info!(
        users = users.len(),
        friendships = friendships.len(),
        "Loaded {} users and {} friendships",
        users.len(),
        friendships.len()
    );

    let workers = workers::resolve_workers(settings.workers, &settings.workers_env);
    info!("Using {workers} worker(s)");

    let config = CentralityConfig {
        workers,
        normalization: settings.normalization,
    };
    let user_ids: Vec<String> = users.iter().map(|u| u.id.clone()).collect();
    let metrics =
        compute_user_metrics(&user_ids, &friendships, &config).context("compute centrality")?;

    let rows = output::build_rows(metrics, &users);
    output::save_csv(&settings.output, &rows)?;
    info!("Metrics saved to {}", settings.output.display());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        output::render_json(&mut out, &rows)?;
    } else if let Some(top) = cli.top {
        output::render_text(&mut out, &rows, top)?;
    }
    out.flush()?;

    Ok(())
}

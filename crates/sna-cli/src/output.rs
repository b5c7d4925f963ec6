//! Result table: name join, ordering, and CSV/JSON/text rendering.
//!
//! Rows are sorted by degree centrality, highest first. The sort is stable,
//! so users with equal degree keep their input order.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sna_core::UserMetrics;

use crate::input::UserRecord;

/// Display name used when a user has no name on record.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Shared width for the text table separator.
pub const RULE_WIDTH: usize = 72;

/// One line of the output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub user_id: String,
    pub degree_centrality: f64,
    pub betweenness_centrality: f64,
    pub name: String,
}

/// Attach display names and sort by degree centrality, descending.
#[must_use]
pub fn build_rows(metrics: Vec<UserMetrics>, users: &[UserRecord]) -> Vec<MetricRow> {
    // First name on record wins for repeated ids.
    let mut names: HashMap<&str, &str> = HashMap::with_capacity(users.len());
    for u in users {
        if let Some(name) = u.name.as_deref() {
            names.entry(u.id.as_str()).or_insert(name);
        }
    }

    let mut rows: Vec<MetricRow> = metrics
        .into_iter()
        .map(|m| {
            let name = names
                .get(m.user_id.as_str())
                .map_or(UNKNOWN_NAME, |n| n)
                .to_string();
            MetricRow {
                user_id: m.user_id,
                degree_centrality: m.degree_centrality,
                betweenness_centrality: m.betweenness_centrality,
                name,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.degree_centrality.total_cmp(&a.degree_centrality));
    rows
}

/// Write rows as CSV with a header line.
///
/// # Errors
///
/// Fails if serialization or the underlying writer fails.
pub fn write_csv<W: Write>(w: W, rows: &[MetricRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    for row in rows {
        wtr.serialize(row).context("serialize metric row")?;
    }
    wtr.flush().context("flush csv writer")?;
    Ok(())
}

/// Write rows as CSV to `path`, replacing any existing file.
///
/// # Errors
///
/// Fails if the file cannot be created or written.
pub fn save_csv(path: &Path, rows: &[MetricRow]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv(file, rows).with_context(|| format!("write {}", path.display()))
}

/// Write rows as a pretty JSON array followed by a newline.
///
/// # Errors
///
/// Fails if serialization or the writer fails.
pub fn render_json(w: &mut dyn Write, rows: &[MetricRow]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, rows)?;
    writeln!(w)?;
    Ok(())
}

/// Write the first `top` rows as an aligned text table.
///
/// # Errors
///
/// Fails if the writer fails.
pub fn render_text(w: &mut dyn Write, rows: &[MetricRow], top: usize) -> io::Result<()> {
    writeln!(
        w,
        "{:<16} {:>10} {:>12}  {}",
        "user_id", "degree", "betweenness", "name"
    )?;
    writeln!(w, "{:-<width$}", "", width = RULE_WIDTH)?;
    for row in rows.iter().take(top) {
        writeln!(
            w,
            "{:<16} {:>10.4} {:>12.6}  {}",
            row.user_id, row.degree_centrality, row.betweenness_centrality, row.name
        )?;
    }
    if rows.len() > top {
        writeln!(w, "… {} more", rows.len() - top)?;
    }
    Ok(())
}

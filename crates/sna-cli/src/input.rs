//! Tabular input: users and friendships CSV files.
//!
//! # Columns
//!
//! Header names are normalized before lookup (trimmed, lowercased, spaces
//! replaced by `_`), so `Parent User ID` and `parent_user_id` are the same
//! column. Unknown columns are ignored.
//!
//! - users: `id` (required), `name` (optional)
//! - friendships: `id` (the friend, required), `parent_user_id` (the user,
//!   required)
//!
//! Every cell is trimmed. A friendship row with a blank endpoint is a fatal
//! structural error; nothing is computed from a partially readable table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

/// Structural problems in the input tables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{table}: required column '{column}' not found (have: {available})")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
        available: String,
    },

    /// `row` is 1-based and counts data rows only.
    #[error("{table}: row {row} has an empty '{column}'")]
    MissingEndpoint {
        table: &'static str,
        row: usize,
        column: &'static str,
    },
}

/// One row of the users table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: Option<String>,
}

/// Lowercase, trim and replace spaces with underscores.
#[must_use]
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

fn column_index(
    headers: &StringRecord,
    table: &'static str,
    column: &'static str,
) -> Result<usize, InputError> {
    headers
        .iter()
        .position(|h| normalize_column(h) == column)
        .ok_or_else(|| InputError::MissingColumn {
            table,
            column,
            available: headers
                .iter()
                .map(normalize_column)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn optional_column(headers: &StringRecord, column: &str) -> Option<usize> {
    headers.iter().position(|h| normalize_column(h) == column)
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map_or("", str::trim)
}

fn reader<R: Read>(rdr: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(rdr)
}

/// Parse the users table.
///
/// Rows with a blank `id` are skipped with a warning.
///
/// # Errors
///
/// Fails on CSV syntax errors or a missing `id` column.
pub fn read_users<R: Read>(rdr: R) -> Result<Vec<UserRecord>> {
    let mut rdr = reader(rdr);
    let headers = rdr.headers().context("read users header")?.clone();

    let id_col = column_index(&headers, "users", "id")?;
    let name_col = optional_column(&headers, "name");

    let mut users = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("users: parse row {}", i + 1))?;
        let id = cell(&record, id_col);
        if id.is_empty() {
            warn!(row = i + 1, "users: skipping row with empty id");
            continue;
        }
        let name = name_col
            .map(|c| cell(&record, c))
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        users.push(UserRecord {
            id: id.to_string(),
            name,
        });
    }

    debug!(count = users.len(), "users loaded");
    Ok(users)
}

/// Parse the friendships table into `(parent_user_id, id)` pairs.
///
/// # Errors
///
/// Fails on CSV syntax errors, missing columns, or any row with a blank
/// endpoint ([`InputError::MissingEndpoint`]).
pub fn read_friendships<R: Read>(rdr: R) -> Result<Vec<(String, String)>> {
    let mut rdr = reader(rdr);
    let headers = rdr.headers().context("read friendships header")?.clone();

    let friend_col = column_index(&headers, "friendships", "id")?;
    let parent_col = column_index(&headers, "friendships", "parent_user_id")?;

    let mut edges = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let row = i + 1;
        let record = record.with_context(|| format!("friendships: parse row {row}"))?;

        let parent = cell(&record, parent_col);
        let friend = cell(&record, friend_col);
        for (value, column) in [(parent, "parent_user_id"), (friend, "id")] {
            if value.is_empty() {
                return Err(InputError::MissingEndpoint {
                    table: "friendships",
                    row,
                    column,
                }
                .into());
            }
        }

        edges.push((parent.to_string(), friend.to_string()));
    }

    debug!(count = edges.len(), "friendships loaded");
    Ok(edges)
}

/// Open and parse the users CSV at `path`.
///
/// # Errors
///
/// Fails if the file cannot be opened or parsed.
pub fn load_users(path: &Path) -> Result<Vec<UserRecord>> {
    let file = File::open(path).with_context(|| format!("open users file {}", path.display()))?;
    read_users(file).with_context(|| format!("load users from {}", path.display()))
}

/// Open and parse the friendships CSV at `path`.
///
/// # Errors
///
/// Fails if the file cannot be opened or parsed.
pub fn load_friendships(path: &Path) -> Result<Vec<(String, String)>> {
    let file = File::open(path)
        .with_context(|| format!("open friendships file {}", path.display()))?;
    read_friendships(file).with_context(|| format!("load friendships from {}", path.display()))
}

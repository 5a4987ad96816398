//! Row and column choices for a single query.
//!
//! A `Selection` is built from user tokens, handed to one query, and cleared
//! before the next menu iteration. Nothing here is shared between queries.

use tracing::debug;

use crate::error::{CatalogueError, Result};
use crate::table::{Table, TableOperation};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub rows: Vec<usize>,
    pub columns: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_rows(rows: Vec<usize>) -> Self {
        Self {
            rows,
            columns: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.columns.clear();
    }
}

/// Parses one index token. Only plain ASCII digits below `limit` pass.
pub fn parse_index(token: &str, limit: usize) -> Result<usize> {
    let trimmed = token.trim();
    let invalid = || CatalogueError::InvalidSelection {
        token: token.to_string(),
        limit,
    };
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match trimmed.parse::<usize>() {
        Ok(idx) if idx < limit => Ok(idx),
        _ => Err(invalid()),
    }
}

/// Parses a comma-separated index list, all or nothing.
pub fn parse_indices(input: &str, limit: usize) -> Result<Vec<usize>> {
    input
        .split(',')
        .map(|token| parse_index(token, limit))
        .collect()
}

/// Validates `input` against the table's rows. Entry order and duplicates
/// are kept.
pub fn select_rows(table: &Table, input: &str) -> Result<Vec<usize>> {
    let rows = parse_indices(input, table.row_count())?;
    debug!(?rows, "rows selected");
    Ok(rows)
}

/// Like [`select_rows`], resolved to column names.
pub fn select_columns(table: &Table, input: &str) -> Result<Vec<String>> {
    let names = table.column_names();
    let columns: Vec<String> = parse_indices(input, names.len())?
        .into_iter()
        .map(|idx| names[idx].clone())
        .collect();
    debug!(?columns, "columns selected");
    Ok(columns)
}

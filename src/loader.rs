use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::error::{CatalogueError, Result};
use crate::table::{Table, TableOperation, Value};

/// Reads the catalogue CSV at `path`. The header row names the columns.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let file = File::open(path).map_err(|e| CatalogueError::load(&label, e))?;
    let table = load_from_reader(file, &label)?;
    info!(
        path = %label,
        rows = table.row_count(),
        columns = table.column_count(),
        "catalogue loaded"
    );
    Ok(table)
}

pub fn load_from_reader<R: Read>(reader: R, label: &str) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CatalogueError::load(label, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CatalogueError::load(label, "missing header row"));
    }

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        // csv rejects records whose field count differs from the header
        let record = record.map_err(|e| CatalogueError::load(label, e))?;
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push(Value::parse(field));
        }
    }
    debug!(label, headers = ?headers, "parsed catalogue records");

    let mut table = Table::new();
    for (name, data) in headers.iter().zip(columns) {
        table
            .add_column(name, data)
            .map_err(|e| CatalogueError::load(label, e))?;
    }
    Ok(table)
}

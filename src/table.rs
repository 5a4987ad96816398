use std::collections::HashMap;
use std::fmt;

use crate::config::{
    CO2_EMISSIONS, MODEL_NAME, MPG_COMBINED, QUARTER_MILE_SPEED, QUARTER_MILE_TIME, TANK_CAPACITY,
};
use crate::error::{CatalogueError, Result};

/// A single cell. Absent data is `Missing`, never a NaN.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Classifies a raw CSV field.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw == "NA" || raw == "N/A" {
            return Value::Missing;
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Missing => f.write_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub(crate) columns: Vec<String>,
    pub(crate) data: HashMap<String, Vec<Value>>,
    pub(crate) rows: usize,
}

pub trait TableOperation {
    fn new() -> Self;
    fn add_column(&mut self, name: &str, data: Vec<Value>) -> Result<()>;
    fn get(&self, col: &str) -> Option<&Vec<Value>>;
    fn column_names(&self) -> &[String];
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize {
        self.column_names().len()
    }

    /// Cell lookup. An unknown column is an error; an out-of-range row reads
    /// as `Missing`.
    fn value(&self, row: usize, col: &str) -> Result<&Value> {
        let column = self
            .get(col)
            .ok_or_else(|| CatalogueError::MissingColumn(col.to_string()))?;
        Ok(column.get(row).unwrap_or(&Value::Missing))
    }

    fn number(&self, row: usize, col: &str) -> Result<f64> {
        self.value(row, col)?
            .as_f64()
            .ok_or_else(|| CatalogueError::MissingValue {
                column: col.to_string(),
                row,
            })
    }
}

impl TableOperation for Table {
    fn new() -> Self {
        Self::default()
    }

    fn add_column(&mut self, name: &str, data: Vec<Value>) -> Result<()> {
        if self.data.contains_key(name) {
            return Err(CatalogueError::InvalidColumn {
                column: name.to_string(),
                reason: "duplicate column".to_string(),
            });
        }
        if !self.columns.is_empty() && data.len() != self.rows {
            return Err(CatalogueError::InvalidColumn {
                column: name.to_string(),
                reason: format!("column has {} rows, table has {}", data.len(), self.rows),
            });
        }
        self.rows = data.len();
        self.columns.push(name.to_string());
        self.data.insert(name.to_string(), data);
        Ok(())
    }

    fn get(&self, col: &str) -> Option<&Vec<Value>> {
        self.data.get(col)
    }

    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> usize {
        self.rows
    }
}

impl Table {
    pub fn record(&self, row: usize) -> CarRecord<'_> {
        CarRecord { table: self, row }
    }

    /// Fails if any of `names` is not a column.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|n| self.get(n).is_none()) {
            Some(missing) => Err(CatalogueError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }
}

/// Named-field view over one row of the catalogue.
#[derive(Debug, Clone, Copy)]
pub struct CarRecord<'a> {
    table: &'a Table,
    row: usize,
}

impl<'a> CarRecord<'a> {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn field(&self, name: &str) -> Result<&'a Value> {
        self.table.value(self.row, name)
    }

    pub fn model_name(&self) -> String {
        match self.field(MODEL_NAME) {
            Ok(v) if !v.is_missing() => v.to_string(),
            _ => format!("Vehicle #{}", self.row),
        }
    }

    fn optional(&self, name: &str) -> Option<f64> {
        self.table.number(self.row, name).ok()
    }

    pub fn mpg_combined(&self) -> Option<f64> {
        self.optional(MPG_COMBINED)
    }

    pub fn tank_capacity(&self) -> Option<f64> {
        self.optional(TANK_CAPACITY)
    }

    pub fn quarter_mile_time(&self) -> Option<f64> {
        self.optional(QUARTER_MILE_TIME)
    }

    pub fn quarter_mile_speed(&self) -> Option<f64> {
        self.optional(QUARTER_MILE_SPEED)
    }

    pub fn co2_emissions(&self) -> Option<f64> {
        self.optional(CO2_EMISSIONS)
    }
}

#[cfg(test)]
pub(crate) fn sample_table() -> Table {
    let mut t = Table::new();
    let text = |v: &[&str]| -> Vec<Value> {
        v.iter().map(|s| Value::Text(s.to_string())).collect()
    };
    let nums = |v: &[f64]| -> Vec<Value> { v.iter().map(|n| Value::Number(*n)).collect() };
    t.add_column(MODEL_NAME, text(&["Civic", "Mustang", "Leaf"]))
        .unwrap();
    t.add_column(MPG_COMBINED, nums(&[30.0, 21.0, 112.0])).unwrap();
    t.add_column(TANK_CAPACITY, nums(&[12.0, 16.0, 10.0])).unwrap();
    t.add_column(QUARTER_MILE_TIME, nums(&[14.2, 12.8, 13.5]))
        .unwrap();
    t.add_column(QUARTER_MILE_SPEED, nums(&[98.0, 114.0, 101.0]))
        .unwrap();
    t.add_column(
        CO2_EMISSIONS,
        vec![Value::Number(150.0), Value::Number(280.0), Value::Missing],
    )
    .unwrap();
    t
}

//! Trait tables keyed by species identifiers.
//!
//! A [Dataset] is an ordered set of named columns, one of which is the
//! *key column* holding the identifiers that should match leaf labels.
//! Each [Row] stores one optional [CellValue] per column, where `None` is a
//! missing measurement. Missing values are normal data, not errors.

use crate::error::{ReconcileError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

// =#========================================================================#=
// DATASET
// =#========================================================================#=
/// A table of observations with a designated key column.
///
/// # Example
/// ```
/// use tipmatch::model::{CellValue, Dataset};
///
/// let mut data = Dataset::new(vec!["species".into(), "svl".into()], "species").unwrap();
/// data.push_row(vec![Some("Anolis_carolinensis".into()), Some(CellValue::Float(4.1))]).unwrap();
/// data.push_row(vec![Some("Anolis_sagrei".into()), None]).unwrap();
///
/// assert_eq!(data.num_rows(), 2);
/// assert_eq!(data.keys().unwrap(), vec!["Anolis_carolinensis", "Anolis_sagrei"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    /// Column names, in order
    columns: Vec<String>,
    /// Position of the key column in `columns`
    key_column: usize,
    /// Observations, each as wide as `columns`
    rows: Vec<Row>,
}

/// One observation: a nullable cell per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    cells: Vec<Option<CellValue>>,
}

impl Dataset {
    /// Creates an empty dataset.
    ///
    /// # Arguments
    /// * `columns` - Column names, in order
    /// * `key_column` - Name of the column holding species identifiers
    ///
    /// # Errors
    /// [ReconcileError::UnknownColumn] if `key_column` is not among `columns`.
    pub fn new(columns: Vec<String>, key_column: &str) -> Result<Self> {
        let key_index = columns
            .iter()
            .position(|c| c == key_column)
            .ok_or_else(|| ReconcileError::UnknownColumn {
                column: key_column.to_string(),
                available: columns.clone(),
            })?;
        Ok(Dataset {
            columns,
            key_column: key_index,
            rows: Vec::new(),
        })
    }

    /// Appends a row.
    ///
    /// # Errors
    /// [ReconcileError::RowWidth] if the row does not have one cell per column.
    pub fn push_row(&mut self, cells: Vec<Option<CellValue>>) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(ReconcileError::RowWidth {
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        self.rows.push(Row { cells });
        Ok(())
    }

    /// Returns the column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the name of the key column.
    pub fn key_column(&self) -> &str {
        &self.columns[self.key_column]
    }

    /// Returns a dataset with the same content but another key column.
    pub fn with_key_column(mut self, key_column: &str) -> Result<Self> {
        self.key_column = self.column_index(key_column)?;
        Ok(self)
    }

    /// Returns the position of the named column.
    ///
    /// # Errors
    /// [ReconcileError::UnknownColumn] if there is no such column.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| ReconcileError::UnknownColumn {
                column: column.to_string(),
                available: self.columns.clone(),
            })
    }

    /// Returns the rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns all keys in row order.
    ///
    /// # Errors
    /// [ReconcileError::MissingKey] for the first row without a textual key.
    pub fn keys(&self) -> Result<Vec<&str>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(row, r)| r.key(self.key_column).ok_or(ReconcileError::MissingKey { row }))
            .collect()
    }

    /// Returns the keys occurring in more than one row, sorted.
    pub fn duplicate_keys(&self) -> Result<Vec<String>> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for key in self.keys()? {
            *counts.entry(key).or_default() += 1;
        }
        let mut duplicates: Vec<String> = counts
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .map(|(key, _)| key.to_string())
            .collect();
        duplicates.sort();
        Ok(duplicates)
    }

    /// Returns the cell at the given row position and column name,
    /// `Ok(None)` if the value is missing.
    pub fn get(&self, position: usize, column: &str) -> Result<Option<&CellValue>> {
        let column = self.column_index(column)?;
        Ok(self.rows.get(position).and_then(|r| r.cells[column].as_ref()))
    }

    /// Returns a new dataset with the rows for the given keys, in the
    /// order of `keys`. Keys without a row are skipped.
    ///
    /// Expects unique keys, see [Dataset::duplicate_keys].
    pub fn select_rows<S: AsRef<str>>(&self, keys: &[S]) -> Result<Dataset> {
        let by_key: HashMap<&str, &Row> = self
            .keys()?
            .into_iter()
            .zip(self.rows.iter())
            .collect();
        let rows = keys
            .iter()
            .filter_map(|k| by_key.get(k.as_ref()).map(|&r| r.clone()))
            .collect();
        Ok(Dataset {
            columns: self.columns.clone(),
            key_column: self.key_column,
            rows,
        })
    }

    /// Returns a new dataset keeping the rows for which `keep` holds,
    /// in original order.
    pub fn filter_rows<F: FnMut(&Row) -> bool>(&self, mut keep: F) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            key_column: self.key_column,
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

impl Row {
    /// Returns the cells of this row.
    pub fn cells(&self) -> &[Option<CellValue>] {
        &self.cells
    }

    /// Returns the cell at the given column position.
    pub fn cell(&self, column: usize) -> Option<&CellValue> {
        self.cells.get(column).and_then(|c| c.as_ref())
    }

    /// Returns whether the cell at the given column position is missing.
    pub fn is_missing(&self, column: usize) -> bool {
        self.cell(column).is_none()
    }

    fn key(&self, key_column: usize) -> Option<&str> {
        self.cell(key_column)?.as_str()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Dataset ({} rows, key column '{}'):",
            self.rows.len(),
            self.key_column()
        )?;
        writeln!(f, "  {}", self.columns.join("\t"))?;
        for row in &self.rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .map(|c| c.as_ref().map_or_else(|| "NA".to_string(), |v| v.to_string()))
                .collect();
            writeln!(f, "  {}", cells.join("\t"))?;
        }
        Ok(())
    }
}

// =#========================================================================#=
// CELL VALUE
// =#========================================================================€=
/// Enum to encapsulate a present cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// For floating point values
    Float(f64),
    /// For integer values
    Int(i64),
    /// For strings, including keys and categorical traits like regimes
    Text(String),
}

impl CellValue {
    /// Types a raw field: integer if it parses as one, else float, else text.
    pub fn infer(raw: &str) -> Self {
        if let Ok(v) = raw.parse::<i64>() {
            CellValue::Int(v)
        } else if let Ok(v) = raw.parse::<f64>() {
            CellValue::Float(v)
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    /// Returns the value as text if textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Debug keeps the decimal point, so 2.0 does not read back as an integer
            CellValue::Float(v) => write!(f, "{:?}", v),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

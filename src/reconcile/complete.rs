//! Restricting a dataset to complete cases.

use crate::error::Result;
use crate::model::Dataset;
use serde::Serialize;
use tracing::{debug, warn};

/// Output of [subset_complete]: the complete rows and the keys of the
/// rows that were dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteCases {
    /// Rows with a value in every required column, in original order
    pub dataset: Dataset,
    /// Keys of the dropped rows, in original order
    pub dropped_keys: Vec<String>,
}

impl CompleteCases {
    /// Returns how many rows were dropped.
    pub fn rows_dropped(&self) -> usize {
        self.dropped_keys.len()
    }
}

/// Keeps only rows without missing values in `required_columns`.
///
/// Model fits commonly need complete cases; dropping rows here rather
/// than inside a fitting routine keeps the number of taxa actually used
/// visible. The tree is not touched: to match a tree to the smaller
/// dataset, reconcile again.
///
/// # Errors
/// * [ReconcileError::UnknownColumn](crate::error::ReconcileError::UnknownColumn)
///   for a required column not in the dataset
/// * [ReconcileError::MissingKey](crate::error::ReconcileError::MissingKey)
///   if a row has no key to report
pub fn subset_complete<S: AsRef<str>>(
    dataset: &Dataset,
    required_columns: &[S],
) -> Result<CompleteCases> {
    let required = required_columns
        .iter()
        .map(|c| dataset.column_index(c.as_ref()))
        .collect::<Result<Vec<usize>>>()?;
    let keys = dataset.keys()?;

    let mut dropped_keys = Vec::new();
    for (row, key) in dataset.rows().iter().zip(&keys) {
        if required.iter().any(|&column| row.is_missing(column)) {
            dropped_keys.push(key.to_string());
        }
    }

    let complete = dataset.filter_rows(|row| required.iter().all(|&column| !row.is_missing(column)));

    if dropped_keys.is_empty() {
        debug!(rows = complete.num_rows(), "all rows complete");
    } else {
        warn!(
            kept = complete.num_rows(),
            dropped = dropped_keys.len(),
            "dropped rows with missing values in required columns"
        );
    }

    Ok(CompleteCases {
        dataset: complete,
        dropped_keys,
    })
}

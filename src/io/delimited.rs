//! Reading and writing [Dataset]s as comma-separated text.
//!
//! Field splitting and quoting are handled by the `csv` crate; this module
//! only decides which fields are missing and how present fields are typed.
//!
//! # Format
//! * First record is the header with column names
//! * Every record has one field per column
//! * Fields equal to a missing-value sentinel (default: empty or `NA`,
//!   see [ReconcileConfig]) become missing cells
//! * Key column fields are always text; other fields become integers,
//!   floats or text, whichever parses first
//! * Missing cells are written as the first sentinel, floats always with a
//!   decimal point, so written files read back to the same dataset

use crate::config::ReconcileConfig;
use crate::error::{ReconcileError, Result};
use crate::model::{CellValue, Dataset};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Reads a dataset from comma-separated text.
///
/// # Arguments
/// * `reader` - Source of the text, header row first
/// * `key_column` - Name of the column holding species identifiers
/// * `config` - Provides the missing-value sentinels
///
/// # Errors
/// * [ReconcileError::Csv](crate::error::ReconcileError::Csv) for malformed
///   text, including records of the wrong length
/// * [ReconcileError::UnknownColumn](crate::error::ReconcileError::UnknownColumn)
///   if the header lacks `key_column`
///
/// # Example
/// ```
/// use tipmatch::config::ReconcileConfig;
/// use tipmatch::io::read_dataset;
///
/// let text = "species,svl,ecomorph\nA_carolinensis,4.1,TG\nA_sagrei,NA,TG\n";
/// let data = read_dataset(text.as_bytes(), "species", &ReconcileConfig::default()).unwrap();
///
/// assert_eq!(data.num_rows(), 2);
/// assert!(data.get(1, "svl").unwrap().is_none());
/// ```
pub fn read_dataset<R: Read>(reader: R, key_column: &str, config: &ReconcileConfig) -> Result<Dataset> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader.headers()?.iter().map(String::from).collect();
    let mut dataset = Dataset::new(columns, key_column)?;
    let key_index = dataset.column_index(key_column)?;

    for record in csv_reader.records() {
        let record = record?;
        let cells = record
            .iter()
            .enumerate()
            .map(|(column, raw)| {
                if config.is_missing(raw) {
                    None
                } else if column == key_index {
                    Some(CellValue::Text(raw.to_string()))
                } else {
                    Some(CellValue::infer(raw))
                }
            })
            .collect();
        dataset.push_row(cells)?;
    }

    debug!(
        rows = dataset.num_rows(),
        columns = dataset.columns().len(),
        "read dataset"
    );
    Ok(dataset)
}

/// Reads a dataset from a comma-separated file; see [read_dataset].
pub fn read_dataset_file<P: AsRef<Path>>(
    path: P,
    key_column: &str,
    config: &ReconcileConfig,
) -> Result<Dataset> {
    let file = File::open(path)?;
    read_dataset(file, key_column, config)
}

/// Writes a dataset as comma-separated text with header row.
/// Missing cells are written as the first missing-value sentinel of `config`.
///
/// # Errors
/// * [ReconcileError::NoMissingSentinel] if the dataset has missing cells
///   but `config` has no sentinel to write them as
/// * [ReconcileError::Csv] or [ReconcileError::Io] if writing fails
pub fn write_dataset<W: Write>(writer: W, dataset: &Dataset, config: &ReconcileConfig) -> Result<()> {
    let has_missing = dataset.rows().iter().any(|r| r.cells().iter().any(Option::is_none));
    let missing = match config.missing_values.first() {
        Some(sentinel) => sentinel.as_str(),
        None if has_missing => return Err(ReconcileError::NoMissingSentinel),
        None => "",
    };

    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        let fields = row
            .cells()
            .iter()
            .map(|cell| cell.as_ref().map_or_else(|| missing.to_string(), |v| v.to_string()));
        csv_writer.write_record(fields)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes a dataset to a comma-separated file; see [write_dataset].
pub fn write_dataset_file<P: AsRef<Path>>(
    path: P,
    dataset: &Dataset,
    config: &ReconcileConfig,
) -> Result<()> {
    let file = File::create(path)?;
    write_dataset(file, dataset, config)
}

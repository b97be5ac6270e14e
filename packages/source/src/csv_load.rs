//! CSV export loader.
//!
//! Parses a comma-separated export into a [`RawTable`], keyed by the
//! column headers in the first row. Headers and cells are kept verbatim,
//! surrounding whitespace included; short rows are padded with empty
//! cells.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crash_stats_source_models::{RawRecord, RawTable};

use crate::SourceError;

/// Reads a CSV export from any reader.
///
/// # Errors
///
/// Returns [`SourceError::EmptyTable`] if there is no header row, or
/// [`SourceError::Csv`] if the input is not valid CSV.
pub fn read_table<R: Read>(reader: R) -> Result<RawTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(ToOwned::to_owned)
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(SourceError::EmptyTable);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record: RawRecord = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.as_str(), row.get(i).unwrap_or("")))
            .collect();
        records.push(record);
    }

    Ok(RawTable { headers, records })
}

/// Loads a CSV export from disk.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be opened, or any error
/// from [`read_table`].
pub fn load_table(path: &Path) -> Result<RawTable, SourceError> {
    log::info!("Loading data from {}", path.display());
    let table = read_table(File::open(path)?)?;
    log::info!("Loaded {} accident records", table.len());
    Ok(table)
}

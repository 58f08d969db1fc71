//! Input table loading
//!
//! Reads the record set from a CSV file. Every original column is kept so
//! the output can be written back with the same layout.

use crate::results::Record;
use crate::{Result, SweepError};
use std::io::Read;
use std::path::Path;

/// The loaded input: header row plus one record per data row
#[derive(Debug, Clone, Default)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl InputTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Loads records from a CSV file
///
/// Records are indexed by data-row position starting at 0. An empty website
/// cell becomes `None`.
pub fn load_records(path: &Path, website_column: &str) -> Result<InputTable> {
    let file = std::fs::File::open(path)?;
    read_records(file, website_column)
}

/// Loads records from any CSV reader
pub fn read_records<R: Read>(reader: R, website_column: &str) -> Result<InputTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let website_position = headers
        .iter()
        .position(|h| h == website_column)
        .ok_or_else(|| SweepError::MissingColumn(website_column.to_string()))?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let website = row
            .get(website_position)
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(|w| w.to_string());

        records.push(Record {
            index,
            website,
            values: row.iter().map(|v| v.to_string()).collect(),
        });
    }

    tracing::info!("Loaded {} records ({} columns)", records.len(), headers.len());

    Ok(InputTable { headers, records })
}

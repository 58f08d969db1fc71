//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! report they all consume.

use crate::input::InputTable;
use crate::results::RecordResult;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything known about a finished sweep
#[derive(Debug, Clone, Copy)]
pub struct SweepReport<'a> {
    /// The input table, in original order
    pub input: &'a InputTable,

    /// One result per input record, in the same order
    pub results: &'a [RecordResult],

    /// Category names, in column order
    pub categories: &'a [String],

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// SHA-256 of the configuration file
    pub config_hash: &'a str,
}

impl SweepReport<'_> {
    /// Run duration in whole seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Trait for output handlers
///
/// Each handler writes the finished sweep to one destination.
pub trait OutputHandler {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Writes the report
    fn write_report(&self, report: &SweepReport<'_>) -> OutputResult<()>;
}

//! Output module for writing sweep results and reports
//!
//! This module handles:
//! - Writing the augmented record table as CSV
//! - Storing runs and results in an optional SQLite database
//! - Generating a markdown summary of the run
//! - Computing and printing run statistics

mod csv_output;
mod markdown;
mod sqlite_output;
pub mod stats;
mod traits;

pub use csv_output::CsvOutput;
pub use markdown::{format_markdown_summary, MarkdownSummary};
pub use sqlite_output::{initialize_schema, insert_report, SqliteOutput};
pub use stats::{print_statistics, RunStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult, SweepReport};

use crate::config::OutputConfig;
use std::path::Path;

/// Builds the output handlers for a run
///
/// The CSV writer is always present; the SQLite sink and markdown summary
/// only when their paths are configured.
pub fn build_handlers(csv_path: &Path, config: &OutputConfig) -> Vec<Box<dyn OutputHandler>> {
    let mut handlers: Vec<Box<dyn OutputHandler>> = vec![Box::new(CsvOutput::new(csv_path, config))];

    if let Some(path) = &config.database_path {
        handlers.push(Box::new(SqliteOutput::new(path)));
    }
    if let Some(path) = &config.summary_path {
        handlers.push(Box::new(MarkdownSummary::new(path)));
    }

    handlers
}

/// Runs every handler over the report, stopping at the first failure
pub fn write_all(handlers: &[Box<dyn OutputHandler>], report: &SweepReport<'_>) -> OutputResult<()> {
    for handler in handlers {
        tracing::debug!("Writing {} output", handler.name());
        handler.write_report(report)?;
    }
    Ok(())
}

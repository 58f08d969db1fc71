//! CSV results writer
//!
//! Writes the input table back out with every original column preserved and
//! one column per category, the email column and the error column filled
//! from the sweep results. A column that already exists in the input is
//! overwritten in place; otherwise it is appended.

use crate::config::OutputConfig;
use crate::output::traits::{OutputError, OutputHandler, OutputResult, SweepReport};
use std::path::PathBuf;

/// Writes the augmented record table as CSV
pub struct CsvOutput {
    path: PathBuf,
    email_column: String,
    error_column: String,
    none_found: String,
}

impl CsvOutput {
    pub fn new(path: impl Into<PathBuf>, config: &OutputConfig) -> Self {
        Self {
            path: path.into(),
            email_column: config.email_column.clone(),
            error_column: config.error_column.clone(),
            none_found: config.none_found.clone(),
        }
    }
}

/// Where each result column lands in the output row
struct Layout {
    headers: Vec<String>,
    categories: Vec<usize>,
    email: usize,
    error: usize,
}

impl Layout {
    fn new(input_headers: &[String], categories: &[String], email: &str, error: &str) -> Self {
        let mut headers = input_headers.to_vec();
        let mut position = |name: &str| match headers.iter().position(|h| h == name) {
            Some(existing) => existing,
            None => {
                headers.push(name.to_string());
                headers.len() - 1
            }
        };

        let categories = categories.iter().map(|c| position(c)).collect();
        let email = position(email);
        let error = position(error);

        Self {
            headers,
            categories,
            email,
            error,
        }
    }
}

impl OutputHandler for CsvOutput {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write_report(&self, report: &SweepReport<'_>) -> OutputResult<()> {
        if report.input.records.len() != report.results.len() {
            return Err(OutputError::Write(format!(
                "{} input records but {} results",
                report.input.records.len(),
                report.results.len()
            )));
        }

        let layout = Layout::new(
            &report.input.headers,
            report.categories,
            &self.email_column,
            &self.error_column,
        );

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(&layout.headers)?;

        for (record, result) in report.input.records.iter().zip(report.results) {
            let mut row = record.values.clone();
            row.resize(layout.headers.len(), String::new());

            for (flag, &column) in result.flags.iter().zip(&layout.categories) {
                row[column] = flag.to_string();
            }
            row[layout.email] = result.email_cell(&self.none_found);
            row[layout.error] = result.error_cell();

            writer.write_record(&row)?;
        }

        writer.flush()?;
        tracing::info!(
            "Wrote {} records to {}",
            report.results.len(),
            self.path.display()
        );
        Ok(())
    }
}

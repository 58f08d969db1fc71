//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a sweep,
//! including run metadata, statistics and error counts.

use crate::output::stats::RunStatistics;
use crate::output::traits::{OutputHandler, OutputResult, SweepReport};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Writes the run summary as a Markdown file
pub struct MarkdownSummary {
    path: PathBuf,
}

impl MarkdownSummary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for MarkdownSummary {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn write_report(&self, report: &SweepReport<'_>) -> OutputResult<()> {
        let stats = RunStatistics::from_results(report.results, report.categories);
        let markdown = format_markdown_summary(report, &stats);

        let mut file = File::create(&self.path)?;
        file.write_all(markdown.as_bytes())?;

        Ok(())
    }
}

/// Formats a sweep report as markdown
pub fn format_markdown_summary(report: &SweepReport<'_>, stats: &RunStatistics) -> String {
    let mut md = String::new();

    md.push_str("# Hire-Sweep Run Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    let duration = report.duration_seconds();
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        duration,
        duration as f64 / 60.0
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", report.config_hash));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total Records**: {}\n", stats.total_records));
    md.push_str(&format!("- **Distinct Emails**: {}\n", stats.total_emails));
    md.push_str(&format!("- **Detailed Tier Used**: {}\n", stats.detailed_used));
    md.push_str(&format!("- **Total Errors**: {}\n", stats.total_errors()));
    md.push_str(&format!("- **Hit Rate**: {:.2}%\n\n", stats.hit_rate()));

    // Email status breakdown
    md.push_str("## Email Status Breakdown\n\n");
    md.push_str("| Status | Records |\n");
    md.push_str("|--------|---------|\n");
    md.push_str(&format!("| Found | {} |\n", stats.emails_found));
    md.push_str(&format!("| None Found | {} |\n", stats.emails_none_found));
    md.push_str(&format!("| Not Attempted | {} |\n\n", stats.emails_not_attempted));

    // Categories
    if !stats.category_yes.is_empty() {
        md.push_str("## Categories\n\n");
        md.push_str("| Category | Records Flagged YES |\n");
        md.push_str("|----------|---------------------|\n");
        for (category, count) in &stats.category_yes {
            md.push_str(&format!("| {} | {} |\n", category, count));
        }
        md.push('\n');
    }

    // Error summary
    if !stats.errors_by_kind.is_empty() {
        md.push_str("## Error Summary\n\n");
        md.push_str("| Error Type | Count |\n");
        md.push_str("|------------|-------|\n");

        for (kind, count) in &stats.errors_by_kind {
            md.push_str(&format!("| {} | {} |\n", kind, count));
        }
        md.push('\n');
    }

    md
}

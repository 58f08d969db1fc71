//! Run statistics
//!
//! Counts derived from the final result table, printed at the end of a run
//! and written into the Markdown summary.

use crate::results::{EmailStatus, Flag, RecordResult};
use std::collections::BTreeMap;

/// Sweep statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    /// Number of records in the run
    pub total_records: u64,

    /// Records that found at least one email
    pub emails_found: u64,

    /// Records fetched without finding an email
    pub emails_none_found: u64,

    /// Records never fetched
    pub emails_not_attempted: u64,

    /// Distinct emails across all records
    pub total_emails: u64,

    /// Records that went on to the detailed tier
    pub detailed_used: u64,

    /// Terminal error kind -> count
    pub errors_by_kind: BTreeMap<&'static str, u64>,

    /// (category, records flagged YES), in category order
    pub category_yes: Vec<(String, u64)>,
}

impl RunStatistics {
    /// Computes statistics from final results
    pub fn from_results(results: &[RecordResult], categories: &[String]) -> Self {
        let mut stats = Self {
            total_records: results.len() as u64,
            category_yes: categories.iter().map(|c| (c.clone(), 0)).collect(),
            ..Self::default()
        };

        for result in results {
            match result.email_status {
                EmailStatus::Found => stats.emails_found += 1,
                EmailStatus::NoneFound => stats.emails_none_found += 1,
                EmailStatus::NotAttempted => stats.emails_not_attempted += 1,
            }
            stats.total_emails += result.emails.len() as u64;

            if result.used_detailed {
                stats.detailed_used += 1;
            }

            if let Some(error) = &result.error {
                *stats.errors_by_kind.entry(error.kind()).or_insert(0) += 1;
            }

            for (position, flag) in result.flags.iter().enumerate() {
                if flag == Flag::Yes {
                    if let Some((_, count)) = stats.category_yes.get_mut(position) {
                        *count += 1;
                    }
                }
            }
        }

        stats
    }

    /// Number of records that ended with an error
    pub fn total_errors(&self) -> u64 {
        self.errors_by_kind.values().sum()
    }

    /// Percentage of records that found at least one email
    pub fn hit_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        (self.emails_found as f64 / self.total_records as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Sweep Statistics ===\n");

    println!("Overview:");
    println!("  Total records: {}", stats.total_records);
    println!("  Records with emails: {}", stats.emails_found);
    println!("  Records without emails: {}", stats.emails_none_found);
    println!("  Records not attempted: {}", stats.emails_not_attempted);
    println!("  Distinct emails: {}", stats.total_emails);
    println!("  Detailed tier used: {}", stats.detailed_used);
    println!();

    println!("Categories (records flagged YES):");
    for (category, count) in &stats.category_yes {
        println!("  {}: {}", category, count);
    }
    println!();

    if !stats.errors_by_kind.is_empty() {
        println!("Error Summary:");
        let mut error_counts: Vec<_> = stats.errors_by_kind.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (kind, count) in error_counts {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    println!(
        "Hit Rate: {:.1}% ({} / {} records with at least one email)",
        stats.hit_rate(),
        stats.emails_found,
        stats.total_records
    );
}

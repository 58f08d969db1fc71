//! Keyword classifier
//!
//! A category is flagged YES when any of its keywords occurs, case-insensitively,
//! anywhere in the page text. Every category always receives a flag.

use crate::config::CategoryTable;
use crate::results::{CategoryFlags, Flag};

/// Classifies page text against the category table
///
/// # Example
///
/// ```
/// use hire_sweep::config::CategoryTable;
/// use hire_sweep::extract::classify;
/// use hire_sweep::Flag;
///
/// let table = CategoryTable::default();
/// let flags = classify("Explore CAREERS with us", &table);
/// assert_eq!(flags.get(5), Some(Flag::Yes)); // CareerOrCareers
/// ```
pub fn classify(text: &str, table: &CategoryTable) -> CategoryFlags {
    let haystack = text.to_lowercase();

    table
        .iter()
        .map(|category| {
            if category
                .keywords
                .iter()
                .any(|keyword| haystack.contains(keyword.as_str()))
            {
                Flag::Yes
            } else {
                Flag::No
            }
        })
        .collect()
}

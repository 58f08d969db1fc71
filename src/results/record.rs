//! Record and result data model

use crate::results::error::TerminalError;
use std::collections::BTreeSet;
use std::fmt;
use url::Url;

/// One input business entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Position in the input sequence; the join key between input and output
    pub index: usize,

    /// Original website field, None when the column is absent or empty
    pub website: Option<String>,

    /// All original column values, in input column order
    pub values: Vec<String>,
}

impl Record {
    pub fn new(index: usize, website: Option<String>) -> Self {
        Self {
            index,
            website,
            values: Vec::new(),
        }
    }
}

/// Tri-state category flag
///
/// `Unset` only exists while a record is in flight; terminal records carry
/// `Yes` or `No` for every category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Yes,
    No,
    Unset,
}

impl Flag {
    /// Logical OR favouring `Yes`
    pub fn or(self, other: Flag) -> Flag {
        match (self, other) {
            (Flag::Yes, _) | (_, Flag::Yes) => Flag::Yes,
            (Flag::No, _) | (_, Flag::No) => Flag::No,
            _ => Flag::Unset,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Yes => "YES",
            Flag::No => "NO",
            Flag::Unset => "",
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flag per category, aligned with the category table order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryFlags {
    flags: Vec<Flag>,
}

impl CategoryFlags {
    /// All categories unset
    pub fn unset(len: usize) -> Self {
        Self {
            flags: vec![Flag::Unset; len],
        }
    }

    /// All categories resolved to `No`
    pub fn all_no(len: usize) -> Self {
        Self {
            flags: vec![Flag::No; len],
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Flag> {
        self.flags.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.flags.iter().copied()
    }

    /// OR-merges another set of flags into this one; a `Yes` is never lost
    pub fn merge(&mut self, other: &CategoryFlags) {
        if self.flags.len() < other.flags.len() {
            self.flags.resize(other.flags.len(), Flag::Unset);
        }
        for (mine, theirs) in self.flags.iter_mut().zip(other.flags.iter()) {
            *mine = mine.or(*theirs);
        }
    }

    /// Turns every remaining `Unset` into `No`
    pub fn resolve(&mut self) {
        for flag in self.flags.iter_mut() {
            if *flag == Flag::Unset {
                *flag = Flag::No;
            }
        }
    }

    /// True when no category is `Unset`
    pub fn is_resolved(&self) -> bool {
        self.flags.iter().all(|f| *f != Flag::Unset)
    }

    /// Number of categories flagged `Yes`
    pub fn yes_count(&self) -> usize {
        self.flags.iter().filter(|f| **f == Flag::Yes).count()
    }
}

impl FromIterator<Flag> for CategoryFlags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

/// Outcome of the email search for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailStatus {
    /// At least one email was found
    Found,
    /// A fetch was made but produced no email
    NoneFound,
    /// No fetch was made (invalid or missing website)
    NotAttempted,
}

impl EmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NoneFound => "none_found",
            Self::NotAttempted => "not_attempted",
        }
    }
}

impl fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The crawl result for one record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordResult {
    pub index: usize,

    /// Website field as given in the input
    pub website_raw: Option<String>,

    /// Normalized absolute URL, None when the input was invalid
    pub website_resolved: Option<Url>,

    pub flags: CategoryFlags,

    /// Distinct lower-cased emails; only ever grows
    pub emails: BTreeSet<String>,

    pub email_status: EmailStatus,

    /// Terminal failure reason, None on success
    pub error: Option<TerminalError>,

    /// Whether the detailed tier was issued for this record
    pub used_detailed: bool,
}

impl RecordResult {
    /// A fresh result for a record that has not been processed yet
    pub fn pending(record: &Record, categories: usize) -> Self {
        Self {
            index: record.index,
            website_raw: record.website.clone(),
            website_resolved: None,
            flags: CategoryFlags::unset(categories),
            emails: BTreeSet::new(),
            email_status: EmailStatus::NotAttempted,
            error: None,
            used_detailed: false,
        }
    }

    /// Emails joined for the output column
    ///
    /// Returns `none_found` when a fetch succeeded without finding any email,
    /// and an empty string when the record ended in an error.
    pub fn email_cell(&self, none_found: &str) -> String {
        if !self.emails.is_empty() {
            return self.emails.iter().cloned().collect::<Vec<_>>().join(", ");
        }
        if self.error.is_none() && self.email_status == EmailStatus::NoneFound {
            return none_found.to_string();
        }
        String::new()
    }

    /// Error reason for the output column; empty on success
    pub fn error_cell(&self) -> String {
        self.error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_default()
    }
}

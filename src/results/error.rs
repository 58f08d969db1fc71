//! Error tracker
//!
//! Holds the single terminal failure reason of each record. Reasons are
//! mutually exclusive: the first one recorded for a record wins.

use crate::UrlError;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Terminal failure reason of a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminalError {
    #[error("missing website")]
    MissingWebsite,

    #[error("invalid website")]
    InvalidWebsite,

    #[error("fast tier fetch failed: {0}")]
    FastFetch(String),

    #[error("detailed tier fetch failed: {0}")]
    DetailedFetch(String),

    #[error("run timeout exceeded")]
    RunTimeout,
}

impl TerminalError {
    /// Short stable identifier used in statistics and the database sink
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingWebsite => "missing_website",
            Self::InvalidWebsite => "invalid_website",
            Self::FastFetch(_) => "fast_fetch_failed",
            Self::DetailedFetch(_) => "detailed_fetch_failed",
            Self::RunTimeout => "run_timeout",
        }
    }
}

impl From<&UrlError> for TerminalError {
    fn from(error: &UrlError) -> Self {
        match error {
            UrlError::Missing => Self::MissingWebsite,
            UrlError::Invalid(_) => Self::InvalidWebsite,
        }
    }
}

/// Records one terminal error per record
#[derive(Debug, Default)]
pub struct ErrorTracker {
    reasons: BTreeMap<usize, TerminalError>,
}

impl ErrorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the terminal reason for a record
    ///
    /// Returns false, leaving the existing reason in place, if the record
    /// already has one.
    pub fn record(&mut self, index: usize, reason: TerminalError) -> bool {
        if let Some(existing) = self.reasons.get(&index) {
            tracing::debug!(
                "Record {} already failed with '{}', ignoring '{}'",
                index,
                existing,
                reason
            );
            return false;
        }

        tracing::error!("Record {} failed: {}", index, reason);
        self.reasons.insert(index, reason);
        true
    }

    pub fn get(&self, index: usize) -> Option<&TerminalError> {
        self.reasons.get(&index)
    }

    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Number of records per error kind
    pub fn counts_by_kind(&self) -> HashMap<&'static str, u64> {
        let mut counts = HashMap::new();
        for reason in self.reasons.values() {
            *counts.entry(reason.kind()).or_insert(0) += 1;
        }
        counts
    }
}

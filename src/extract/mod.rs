//! Content extraction for fetched pages
//!
//! This module contains the pure, synchronous half of the pipeline:
//! - Reading visible text, `mailto:` targets and links out of HTML
//! - Email extraction
//! - Keyword classification against the category table
//!
//! Workers call [`analyze_page`] immediately after a fetch completes.

mod email;
mod keywords;
mod page;

pub use email::{extract_emails, find_emails};
pub use keywords::classify;
pub use page::{parse_html, PageLink, ParsedPage};

use crate::config::CategoryTable;
use crate::results::CategoryFlags;
use std::collections::BTreeSet;
use url::Url;

/// Everything the pipeline learns from one fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct PageAnalysis {
    /// Distinct lower-cased emails
    pub emails: BTreeSet<String>,

    /// One resolved flag per category
    pub flags: CategoryFlags,

    /// Outgoing links, used by the detailed tier's hop
    pub links: Vec<PageLink>,
}

impl PageAnalysis {
    /// Folds another page of the same record into this analysis
    ///
    /// Emails are unioned and flags are OR-merged; links are kept from the
    /// first page only.
    pub fn absorb(&mut self, other: PageAnalysis) {
        self.emails.extend(other.emails);
        self.flags.merge(&other.flags);
    }
}

/// Runs the email extractor and keyword classifier over a page body
pub fn analyze_page(body: &str, base_url: &Url, table: &CategoryTable) -> PageAnalysis {
    let parsed = parse_html(body, base_url);

    PageAnalysis {
        emails: extract_emails(body, &parsed),
        flags: classify(&parsed.visible_text, table),
        links: parsed.links,
    }
}

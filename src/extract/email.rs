//! Email extractor
//!
//! Finds `local-part@domain` tokens in fetched content. Tokens are lower-cased
//! and collected into a set, so the same address found in the page text and
//! in a `mailto:` link counts once.

use crate::extract::page::ParsedPage;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email pattern")
});

/// File extensions that end image and asset names such as `logo@2x.png`
const ASSET_SUFFIXES: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".bmp", ".ico", ".tif", ".tiff", ".css",
    ".js",
];

/// Returns the distinct, lower-cased email tokens found in `text`
pub fn find_emails(text: &str) -> BTreeSet<String> {
    EMAIL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|email| !is_asset_name(email))
        .collect()
}

/// Extracts every email from a fetched page
///
/// Scans the raw body, the decoded visible text and the `mailto:` targets.
/// An empty set is a valid result.
pub fn extract_emails(raw_body: &str, page: &ParsedPage) -> BTreeSet<String> {
    let mut emails = find_emails(raw_body);
    emails.extend(find_emails(&page.visible_text));
    for target in &page.mailto_targets {
        emails.extend(find_emails(target));
    }
    emails
}

fn is_asset_name(email: &str) -> bool {
    ASSET_SUFFIXES.iter().any(|suffix| email.ends_with(suffix))
}

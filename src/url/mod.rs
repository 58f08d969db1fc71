//! URL handling module for Hire-Sweep
//!
//! This module turns a record's raw website field into a fetchable absolute
//! URL, and provides the host helpers the detailed tier uses to stay on the
//! record's own site.

mod domain;
mod normalize;

pub use domain::{extract_domain, same_site};
pub use normalize::resolve_website;

//! Result table
//!
//! # Components
//!
//! - `Record` / `RecordResult`: input entity and its crawl result
//! - `ErrorTracker`: one terminal reason per record
//! - `Aggregator`: the single writer that merges tier outcomes

mod aggregator;
mod error;
mod record;

pub use aggregator::Aggregator;
pub use error::{ErrorTracker, TerminalError};
pub use record::{CategoryFlags, EmailStatus, Flag, Record, RecordResult};

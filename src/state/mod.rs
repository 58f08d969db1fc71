//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RecordState`: where a record is in the fast/detailed tier state machine
//! - `Pacer`: per-worker request spacing

mod pacer;
mod record_state;

// Re-export main types
pub use pacer::Pacer;
pub use record_state::RecordState;

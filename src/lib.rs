//! Hire-Sweep: a polite contact and careers crawler
//!
//! This crate takes an ordered set of business records, crawls each record's
//! website, extracts contact email addresses and flags the presence of
//! career/HR keyword categories. Results are merged back into the record set
//! in the original order.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod input;
pub mod output;
pub mod results;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Hire-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Renderer error: {0}")]
    Render(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Input is missing the '{0}' column")]
    MissingColumn(String),

    #[error("Unknown record index: {0}")]
    UnknownRecord(usize),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RecordState,
        to: state::RecordState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Website field errors raised by the normalizer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("missing website")]
    Missing,

    #[error("invalid website: {0}")]
    Invalid(String),
}

/// Result type alias for Hire-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_sweep, Coordinator};
pub use results::{EmailStatus, Flag, Record, RecordResult, TerminalError};
pub use state::RecordState;
pub use url::resolve_website;

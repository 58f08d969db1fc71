//! Configuration module for Hire-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use hire_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Workers: {}", config.crawler.concurrency);
//! ```

mod categories;
mod parser;
mod types;
mod validation;

// Re-export types
pub use categories::{default_categories, CategoryTable};
pub use types::{
    CategoryEntry, Config, CrawlerConfig, DetailedConfig, InputConfig, OutputConfig,
    RendererKind, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

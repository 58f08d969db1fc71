//! Integration tests for Hire-Sweep
//!
//! These tests use wiremock to create mock HTTP servers and run the real
//! HTTP tiers end-to-end.

mod output_tests;
mod sweep_tests;

use hire_sweep::config::{parse_config, Config};

/// Builds a test configuration with fast settings and the HTTP renderer
pub fn create_test_config(crawler_overrides: &str) -> Config {
    let content = format!(
        r#"
[crawler]
concurrency = 4
request-delay = 0
retry-count = 1
retry-delay = 0
request-timeout = 2000
{}

[user-agent]
crawler-name = "TestSweep"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[detailed]
renderer = "http"
"#,
        crawler_overrides
    );
    parse_config(&content).expect("test config should parse")
}

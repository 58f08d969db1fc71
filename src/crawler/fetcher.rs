//! Fetch tiers
//!
//! This module handles every request the crawler makes, including:
//! - The `FetchTier` contract shared by the fast and detailed tiers
//! - Building the HTTP client with the configured user agent
//! - The static HTTP tier
//! - Bounded, fixed-delay retry of transient failures
//! - Error classification

use crate::config::{Config, CrawlerConfig};
use crate::state::Pacer;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// HTTP status codes worth retrying
const RETRYABLE_STATUS_CODES: [u16; 8] = [408, 429, 500, 502, 503, 504, 522, 524];

/// Maximum redirect hops followed by the HTTP client
const MAX_REDIRECTS: usize = 10;

/// Which strategy produced a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// One static HTTP GET, no script execution
    Fast,
    /// Render-capable fetch, used only as fallback
    Detailed,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Fast => "fast",
            Tier::Detailed => "detailed",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page returned by a fetch tier, whatever its status
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    pub status_code: u16,

    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// True when the body has any non-whitespace content
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

/// Returns true for status codes that are retried
pub fn is_retryable_status(status_code: u16) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status_code)
}

/// Tier-scoped fetch failure
///
/// The `Display` output is the `<cause>` part of a record's terminal error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Request(String),

    #[error("render failed: {0}")]
    Render(String),
}

impl FetchError {
    /// Returns true if another attempt may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::Connect(_) => true,
            FetchError::Status(code) => is_retryable_status(*code),
            FetchError::Request(_) | FetchError::Render(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_connect() {
            FetchError::Connect(root_cause(&error))
        } else if let Some(status) = error.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Request(root_cause(&error))
        }
    }
}

/// Innermost error message, which is the informative one for reqwest errors
fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/// A strategy for retrieving a URL's content
///
/// Both tiers expose the same contract so the scheduler can drive them
/// interchangeably, and tests can substitute scripted implementations.
#[async_trait]
pub trait FetchTier: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Performs a single fetch attempt
    ///
    /// Non-2xx responses are returned as pages; only transport-level
    /// failures are errors.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// The user agent is `CrawlerName/Version (+ContactURL; ContactEmail)` unless
/// an override is configured. No cookie store is attached.
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = config.crawler.request_timeout();

    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Static HTTP fetch
///
/// Serves as the fast tier, and as the detailed tier when no renderer is
/// available.
#[derive(Debug, Clone)]
pub struct HttpTier {
    client: Client,
}

impl HttpTier {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchTier for HttpTier {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status_code = response.status().as_u16();
        let final_url = response.url().clone();
        let body = response.text().await?;

        Ok(FetchedPage {
            final_url,
            status_code,
            body,
        })
    }
}

/// Retry settings applied to every fetch attempt, in both tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retry_count: u32,

    /// Fixed delay between attempts
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            retry_count: config.retry_count,
            retry_delay: config.retry_delay(),
        }
    }
}

/// Fetches a URL through a tier, retrying transient failures
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | Timeout | Retry |
/// | Connection failure | Retry |
/// | HTTP 408/429/5xx gateway codes | Retry; the last page is returned once retries run out |
/// | Any other status | Returned immediately |
/// | Other request or render errors | Returned immediately |
///
/// The delay between attempts is fixed and never grows. Every attempt waits
/// for the worker's pacer first.
pub async fn fetch_with_retry(
    tier: &dyn FetchTier,
    url: &Url,
    policy: RetryPolicy,
    pacer: &mut Pacer,
) -> Result<FetchedPage, FetchError> {
    let mut attempt: u32 = 0;

    loop {
        pacer.wait_turn().await;
        tracing::debug!("{} GET {} (attempt {})", tier.name(), url, attempt + 1);

        let outcome = tier.fetch(url).await;
        let retry = match &outcome {
            Ok(page) => is_retryable_status(page.status_code),
            Err(error) => error.is_transient(),
        };

        if !retry || attempt >= policy.retry_count {
            return outcome;
        }

        attempt += 1;
        match &outcome {
            Ok(page) => tracing::warn!(
                "{} returned HTTP {}, retrying ({}/{})",
                url,
                page.status_code,
                attempt,
                policy.retry_count
            ),
            Err(error) => tracing::warn!(
                "{} failed: {}, retrying ({}/{})",
                url,
                error,
                attempt,
                policy.retry_count
            ),
        }
        tokio::time::sleep(policy.retry_delay).await;
    }
}

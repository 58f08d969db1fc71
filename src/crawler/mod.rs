//! Crawler module for fetching and processing record websites
//!
//! This module contains the core crawling logic, including:
//! - The fast and detailed fetch tiers with bounded retry
//! - An optional headless Chromium renderer
//! - The bounded worker pool
//! - The coordinator that drives each record's tier state machine

#[cfg(feature = "chromium")]
mod chromium;
mod coordinator;
mod fetcher;
mod scheduler;

#[cfg(feature = "chromium")]
pub use chromium::{find_chromium, ChromiumTier};
pub use coordinator::{run_sweep, Coordinator};
pub use fetcher::{
    build_http_client, fetch_with_retry, is_retryable_status, FetchError, FetchTier, FetchedPage,
    HttpTier, RetryPolicy, Tier,
};
pub use scheduler::{select_linked_pages, CrawlJob, JobOutcome, JobResult, Scheduler, WorkerContext};

//! Crawler coordinator - main sweep orchestration logic
//!
//! The coordinator owns the [`Aggregator`] and is the only task that
//! changes record state. It:
//! - Normalizes every record's website and rejects invalid ones
//! - Issues fast-tier jobs to the worker pool
//! - Merges each outcome and decides whether the detailed tier runs
//! - Enforces the optional run deadline
//! - Returns results in input order

use crate::config::{CategoryTable, Config, RendererKind};
use crate::crawler::fetcher::{FetchTier, HttpTier, Tier};
use crate::crawler::scheduler::{CrawlJob, JobOutcome, JobResult, Scheduler, WorkerContext};
use crate::results::{Aggregator, Record, RecordResult, TerminalError};
use crate::url::resolve_website;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// How often, in finalized records, progress is logged
const PROGRESS_INTERVAL: usize = 10;

/// Main sweep coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    categories: Arc<CategoryTable>,
    fast: Arc<dyn FetchTier>,
    detailed: Option<Arc<dyn FetchTier>>,
}

impl Coordinator {
    /// Creates a coordinator with the tiers selected by the configuration
    ///
    /// The fast tier is always the static HTTP fetcher. The detailed tier is
    /// headless Chromium when configured and available, the HTTP fetcher
    /// otherwise, and absent when disabled.
    pub async fn new(config: Config) -> Result<Self> {
        let fast: Arc<dyn FetchTier> = Arc::new(HttpTier::new(&config)?);
        let detailed = build_detailed_tier(&config).await?;
        Ok(Self::with_tiers(config, fast, detailed))
    }

    /// Creates a coordinator with explicit tiers
    pub fn with_tiers(
        config: Config,
        fast: Arc<dyn FetchTier>,
        detailed: Option<Arc<dyn FetchTier>>,
    ) -> Self {
        let categories = Arc::new(CategoryTable::from_config(&config));
        Self {
            config: Arc::new(config),
            categories,
            fast,
            detailed,
        }
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Runs the sweep over `records`
    ///
    /// Records are tracked by their position in `records`, so their own
    /// `index` values may be arbitrary. Every record comes back exactly once,
    /// in the same order, with every category resolved.
    pub async fn run(&self, records: &[Record]) -> Result<Vec<RecordResult>> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting sweep of {} records against {} categories",
            records.len(),
            self.categories.len()
        );

        let mut aggregator = Aggregator::new(records, self.categories.len());
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::spawn(
            WorkerContext::new(
                &self.config,
                Arc::clone(&self.categories),
                Arc::clone(&self.fast),
                self.detailed.clone(),
            ),
            self.config.crawler.concurrency as usize,
            outcome_tx,
        );

        let mut progress = Progress::new(records.len());
        let mut in_flight = 0usize;

        for (position, record) in records.iter().enumerate() {
            match resolve_website(record.website.as_deref()) {
                Ok(url) => {
                    aggregator.begin_fast(position, url.clone())?;
                    if scheduler.submit(CrawlJob {
                        index: position,
                        url,
                        tier: Tier::Fast,
                    }) {
                        in_flight += 1;
                    }
                }
                Err(e) => {
                    tracing::debug!("Record {} rejected: {}", record.index, e);
                    aggregator.reject_input(position, &e)?;
                }
            }
        }
        progress.report(&aggregator);

        let deadline = self
            .config
            .crawler
            .run_timeout()
            .map(|timeout| tokio::time::Instant::now() + timeout);

        while in_flight > 0 {
            let next = match deadline {
                Some(deadline) if !scheduler.is_cancelled() => {
                    tokio::select! {
                        outcome = outcome_rx.recv() => outcome,
                        _ = tokio::time::sleep_until(deadline) => {
                            tracing::warn!(
                                "Run timeout reached with {} records open; no new fetches will start",
                                aggregator.open_count()
                            );
                            scheduler.cancel();
                            continue;
                        }
                    }
                }
                _ => outcome_rx.recv().await,
            };

            let Some(outcome) = next else {
                tracing::error!("Worker pool stopped with {} jobs outstanding", in_flight);
                break;
            };
            in_flight -= 1;

            if self.apply_outcome(&mut aggregator, &scheduler, outcome)? {
                in_flight += 1;
            }
            progress.report(&aggregator);
        }

        scheduler.shutdown().await;

        let expired = aggregator.expire_open();
        if !expired.is_empty() {
            tracing::warn!("{} records finalized by the run timeout", expired.len());
        }

        tracing::info!(
            "Sweep complete: {} records in {:.2}s, {} with errors",
            aggregator.len(),
            start_time.elapsed().as_secs_f64(),
            aggregator.errors().len()
        );

        Ok(aggregator.into_results())
    }

    /// Merges one job outcome and advances the record's state
    ///
    /// Returns true if a follow-up job was issued.
    fn apply_outcome(
        &self,
        aggregator: &mut Aggregator,
        scheduler: &Scheduler,
        outcome: JobOutcome,
    ) -> Result<bool> {
        let index = outcome.index;

        match (outcome.tier, outcome.result) {
            (tier, JobResult::Cancelled) => {
                tracing::debug!("Record {}: {} job cancelled", index, tier);
            }
            (Tier::Fast, JobResult::Fetched { analysis, status_code }) => {
                let emails = aggregator.merge_analysis(index, &analysis)?;
                tracing::debug!(
                    "Record {}: fast tier HTTP {}, {} emails",
                    index,
                    status_code,
                    emails
                );

                if emails > 0 || self.detailed.is_none() {
                    aggregator.finalize(index)?;
                } else if scheduler.is_cancelled() {
                    tracing::debug!("Record {}: detailed tier skipped after run timeout", index);
                } else {
                    aggregator.begin_detailed(index)?;
                    return Ok(scheduler.submit(CrawlJob {
                        index,
                        url: outcome.url,
                        tier: Tier::Detailed,
                    }));
                }
            }
            (Tier::Fast, JobResult::Failed(error)) => {
                aggregator.fail(index, TerminalError::FastFetch(error.to_string()))?;
            }
            (Tier::Detailed, JobResult::Fetched { analysis, status_code }) => {
                let emails = aggregator.merge_analysis(index, &analysis)?;
                tracing::debug!(
                    "Record {}: detailed tier HTTP {}, {} emails",
                    index,
                    status_code,
                    emails
                );
                aggregator.finalize(index)?;
            }
            (Tier::Detailed, JobResult::Failed(error)) => {
                aggregator.fail(index, TerminalError::DetailedFetch(error.to_string()))?;
            }
        }

        Ok(false)
    }
}

/// Logs progress every `PROGRESS_INTERVAL` finalized records
struct Progress {
    total: usize,
    last_reported: usize,
    start_time: Instant,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            total,
            last_reported: 0,
            start_time: Instant::now(),
        }
    }

    fn report(&mut self, aggregator: &Aggregator) {
        let done = aggregator.done_count();
        if done / PROGRESS_INTERVAL > self.last_reported / PROGRESS_INTERVAL {
            let elapsed = self.start_time.elapsed().as_secs_f64();
            tracing::info!(
                "Progress: {}/{} records finalized, {:.2} records/sec",
                done,
                self.total,
                done as f64 / elapsed.max(f64::EPSILON)
            );
            self.last_reported = done;
        }
    }
}

/// Selects the detailed tier for a configuration
async fn build_detailed_tier(config: &Config) -> Result<Option<Arc<dyn FetchTier>>> {
    if !config.detailed.enabled {
        tracing::info!("Detailed tier disabled");
        return Ok(None);
    }

    if config.detailed.renderer == RendererKind::Chromium {
        #[cfg(feature = "chromium")]
        {
            match crate::crawler::chromium::ChromiumTier::launch(config).await {
                Ok(tier) => return Ok(Some(Arc::new(tier))),
                Err(e) => tracing::warn!("{}; detailed tier falls back to HTTP", e),
            }
        }

        #[cfg(not(feature = "chromium"))]
        {
            tracing::warn!("Built without the chromium feature; detailed tier falls back to HTTP");
        }
    }

    Ok(Some(Arc::new(HttpTier::new(config)?)))
}

/// Runs a complete sweep with tiers selected from the configuration
///
/// This is the main entry point for the library.
pub async fn run_sweep(config: Config, records: &[Record]) -> Result<Vec<RecordResult>> {
    Coordinator::new(config).await?.run(records).await
}

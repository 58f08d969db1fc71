//! Scheduler: the bounded worker pool
//!
//! This module handles:
//! - Spawning one worker per concurrency slot
//! - Handing crawl jobs to whichever worker is free
//! - Per-worker request pacing and bounded retry
//! - Running extraction and classification right after each fetch
//! - The detailed tier's single hop to linked pages
//! - Cancellation once the run deadline passes
//!
//! Workers never touch the result table; each job produces one
//! [`JobOutcome`] that is sent back to the coordinator.

use crate::config::{CategoryTable, Config};
use crate::crawler::fetcher::{fetch_with_retry, FetchError, FetchTier, RetryPolicy, Tier};
use crate::extract::{analyze_page, PageAnalysis, PageLink};
use crate::state::Pacer;
use crate::url::same_site;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use url::Url;

/// Substrings that make a linked page worth visiting on the detailed hop
const LINK_HINTS: [&str; 8] = [
    "contact", "about", "career", "job", "team", "people", "employ", "work",
];

/// One scheduled fetch for a record and tier
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlJob {
    /// Position of the record in the run
    pub index: usize,
    pub url: Url,
    pub tier: Tier,
}

/// What a worker learned from a job
#[derive(Debug, Clone, PartialEq)]
pub enum JobResult {
    /// The page was fetched and analyzed
    Fetched {
        analysis: PageAnalysis,
        status_code: u16,
    },

    /// The tier failed after exhausting its retries
    Failed(FetchError),

    /// The job was dequeued after the run was cancelled and never started
    Cancelled,
}

/// Message from a worker back to the coordinator
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub index: usize,
    pub url: Url,
    pub tier: Tier,
    pub result: JobResult,
}

/// Shared, read-only state every worker needs
pub struct WorkerContext {
    pub fast: Arc<dyn FetchTier>,
    pub detailed: Option<Arc<dyn FetchTier>>,
    pub categories: Arc<CategoryTable>,
    pub retry: RetryPolicy,
    pub request_delay: Duration,
    pub depth_limit: u32,
    pub max_linked_pages: usize,
}

impl WorkerContext {
    pub fn new(
        config: &Config,
        categories: Arc<CategoryTable>,
        fast: Arc<dyn FetchTier>,
        detailed: Option<Arc<dyn FetchTier>>,
    ) -> Self {
        Self {
            fast,
            detailed,
            categories,
            retry: RetryPolicy::from_config(&config.crawler),
            request_delay: config.crawler.request_delay(),
            depth_limit: config.crawler.depth_limit,
            max_linked_pages: config.crawler.max_linked_pages as usize,
        }
    }

    async fn run_job(&self, job: &CrawlJob, pacer: &mut Pacer, cancelled: &AtomicBool) -> JobResult {
        match job.tier {
            Tier::Fast => self.fast_job(&job.url, pacer).await,
            Tier::Detailed => self.detailed_job(&job.url, pacer, cancelled).await,
        }
    }

    /// Fast tier: a non-2xx page still counts when it carries a body
    async fn fast_job(&self, url: &Url, pacer: &mut Pacer) -> JobResult {
        match fetch_with_retry(self.fast.as_ref(), url, self.retry, pacer).await {
            Ok(page) if page.is_success() || page.has_body() => {
                if !page.is_success() {
                    tracing::debug!(
                        "{} returned HTTP {}, classifying the body anyway",
                        url,
                        page.status_code
                    );
                }
                JobResult::Fetched {
                    analysis: analyze_page(&page.body, &page.final_url, &self.categories),
                    status_code: page.status_code,
                }
            }
            Ok(page) => JobResult::Failed(FetchError::Status(page.status_code)),
            Err(error) => JobResult::Failed(error),
        }
    }

    /// Detailed tier: any non-2xx is a failure and extraction is skipped
    async fn detailed_job(&self, url: &Url, pacer: &mut Pacer, cancelled: &AtomicBool) -> JobResult {
        let Some(tier) = self.detailed.as_ref() else {
            return JobResult::Failed(FetchError::Request("detailed tier disabled".to_string()));
        };

        let page = match fetch_with_retry(tier.as_ref(), url, self.retry, pacer).await {
            Ok(page) if page.is_success() => page,
            Ok(page) => return JobResult::Failed(FetchError::Status(page.status_code)),
            Err(error) => return JobResult::Failed(error),
        };

        let mut analysis = analyze_page(&page.body, &page.final_url, &self.categories);

        if self.depth_limit >= 2 && analysis.emails.is_empty() {
            let linked = select_linked_pages(&analysis.links, &page.final_url, self.max_linked_pages);
            for link in linked {
                if cancelled.load(Ordering::SeqCst) || !analysis.emails.is_empty() {
                    break;
                }

                match fetch_with_retry(tier.as_ref(), &link, self.retry, pacer).await {
                    Ok(linked_page) if linked_page.is_success() => {
                        tracing::debug!("Followed {} from {}", link, url);
                        analysis.absorb(analyze_page(
                            &linked_page.body,
                            &linked_page.final_url,
                            &self.categories,
                        ));
                    }
                    Ok(linked_page) => {
                        tracing::debug!("Linked page {} returned HTTP {}", link, linked_page.status_code)
                    }
                    Err(error) => tracing::debug!("Linked page {} failed: {}", link, error),
                }
            }
        }

        JobResult::Fetched {
            analysis,
            status_code: page.status_code,
        }
    }
}

/// Picks the same-site links worth one extra hop
///
/// Only links whose URL or anchor text contains a contact/careers hint are
/// kept, without duplicates and never the seed page itself.
pub fn select_linked_pages(links: &[PageLink], seed: &Url, limit: usize) -> Vec<Url> {
    let mut seen = HashSet::new();
    seen.insert(seed.as_str().to_string());

    links
        .iter()
        .filter(|link| same_site(&link.url, seed))
        .filter(|link| {
            let path = link.url.path().to_lowercase();
            let text = link.text.to_lowercase();
            LINK_HINTS
                .iter()
                .any(|hint| path.contains(hint) || text.contains(hint))
        })
        .filter(|link| seen.insert(link.url.as_str().to_string()))
        .take(limit)
        .map(|link| link.url.clone())
        .collect()
}

/// Bounded pool of crawl workers
pub struct Scheduler {
    jobs: Option<mpsc::UnboundedSender<CrawlJob>>,
    cancelled: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawns `concurrency` workers that report to `outcomes`
    pub fn spawn(
        context: WorkerContext,
        concurrency: usize,
        outcomes: mpsc::UnboundedSender<JobOutcome>,
    ) -> Self {
        let (jobs, queue) = mpsc::unbounded_channel();
        let queue = Arc::new(Mutex::new(queue));
        let context = Arc::new(context);
        let cancelled = Arc::new(AtomicBool::new(false));

        let workers = (0..concurrency.max(1))
            .map(|id| {
                tokio::spawn(worker_loop(
                    id,
                    Arc::clone(&context),
                    Arc::clone(&queue),
                    outcomes.clone(),
                    Arc::clone(&cancelled),
                ))
            })
            .collect();

        Self {
            jobs: Some(jobs),
            cancelled,
            workers,
        }
    }

    /// Queues a job; returns false if the pool has shut down
    pub fn submit(&self, job: CrawlJob) -> bool {
        match &self.jobs {
            Some(jobs) => jobs.send(job).is_ok(),
            None => false,
        }
    }

    /// Stops new jobs from starting; jobs already running finish normally
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Closes the queue and waits for every worker to exit
    pub async fn shutdown(mut self) {
        self.jobs.take();
        for worker in self.workers.drain(..) {
            if let Err(e) = worker.await {
                tracing::error!("Worker task failed: {}", e);
            }
        }
    }
}

async fn worker_loop(
    id: usize,
    context: Arc<WorkerContext>,
    queue: Arc<Mutex<mpsc::UnboundedReceiver<CrawlJob>>>,
    outcomes: mpsc::UnboundedSender<JobOutcome>,
    cancelled: Arc<AtomicBool>,
) {
    let mut pacer = Pacer::new(context.request_delay);

    loop {
        let job = {
            let mut queue = queue.lock().await;
            queue.recv().await
        };
        let Some(job) = job else {
            break;
        };

        let result = if cancelled.load(Ordering::SeqCst) {
            JobResult::Cancelled
        } else {
            context.run_job(&job, &mut pacer, &cancelled).await
        };

        let outcome = JobOutcome {
            index: job.index,
            url: job.url,
            tier: job.tier,
            result,
        };
        if outcomes.send(outcome).is_err() {
            break;
        }
    }

    tracing::trace!("Worker {} exiting after {} requests", id, pacer.request_count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::crawler::fetcher::FetchedPage;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;

    const CONFIG: &str = r#"
[crawler]
request-delay = 0
retry-count = 0
retry-delay = 0

[user-agent]
crawler-name = "TestSweep"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#;

    /// Serves fixed bodies per URL, 404 for anything else
    struct Site {
        pages: HashMap<String, String>,
        requests: StdMutex<Vec<String>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        latency: Duration,
        status: u16,
    }

    impl Site {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, b)| (u.to_string(), b.to_string()))
                    .collect(),
                requests: StdMutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                latency: Duration::ZERO,
                status: 200,
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FetchTier for Site {
        fn name(&self) -> &'static str {
            "site"
        }

        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.pages.get(url.as_str()) {
                Some(body) => Ok(FetchedPage {
                    final_url: url.clone(),
                    status_code: self.status,
                    body: body.clone(),
                }),
                None => Ok(FetchedPage {
                    final_url: url.clone(),
                    status_code: 404,
                    body: String::new(),
                }),
            }
        }
    }

    fn context(fast: Arc<Site>, detailed: Option<Arc<Site>>) -> WorkerContext {
        let config = parse_config(CONFIG).unwrap();
        WorkerContext::new(
            &config,
            Arc::new(CategoryTable::from_config(&config)),
            fast,
            detailed.map(|d| d as Arc<dyn FetchTier>),
        )
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn link(s: &str, text: &str) -> PageLink {
        PageLink {
            url: url(s),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_select_linked_pages() {
        let seed = url("http://example.org/");
        let links = vec![
            link("http://example.org/contact", "Contact"),
            link("http://example.org/contact", "Contact us"),
            link("http://example.org/pricing", "Pricing"),
            link("http://example.org/p/7", "Meet the team"),
            link("http://other.org/careers", "Careers"),
            link("http://example.org/", "About"),
        ];

        let picked = select_linked_pages(&links, &seed, 5);
        assert_eq!(
            picked,
            vec![url("http://example.org/contact"), url("http://example.org/p/7")]
        );
    }

    #[test]
    fn test_select_linked_pages_respects_limit() {
        let seed = url("http://example.org/");
        let links = vec![
            link("http://example.org/contact", ""),
            link("http://example.org/about", ""),
            link("http://example.org/careers", ""),
        ];
        assert_eq!(select_linked_pages(&links, &seed, 2).len(), 2);
    }

    #[tokio::test]
    async fn test_fast_job_fails_on_empty_non_2xx() {
        let site = Arc::new(Site::new(&[]));
        let ctx = context(site, None);
        let mut pacer = Pacer::new(Duration::ZERO);

        let result = ctx.fast_job(&url("http://example.org/gone"), &mut pacer).await;
        assert_eq!(result, JobResult::Failed(FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_fast_job_classifies_non_2xx_body() {
        let mut site = Site::new(&[(
            "http://example.org/",
            "<p>Internship openings: hello@example.org</p>",
        )]);
        site.status = 500;
        let ctx = context(Arc::new(site), None);
        let mut pacer = Pacer::new(Duration::ZERO);

        match ctx.fast_job(&url("http://example.org/"), &mut pacer).await {
            JobResult::Fetched {
                analysis,
                status_code,
            } => {
                assert_eq!(status_code, 500);
                assert!(analysis.emails.contains("hello@example.org"));
                assert_eq!(analysis.flags.yes_count(), 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_detailed_job_follows_contact_link() {
        let detailed = Arc::new(Site::new(&[
            (
                "http://example.org/",
                r#"<a href="/contact">Contact</a><a href="/pricing">Pricing</a>"#,
            ),
            ("http://example.org/contact", "<p>Write to hello@example.org</p>"),
        ]));
        let ctx = context(Arc::new(Site::new(&[])), Some(Arc::clone(&detailed)));
        let mut pacer = Pacer::new(Duration::ZERO);
        let cancelled = AtomicBool::new(false);

        let result = ctx
            .detailed_job(&url("http://example.org/"), &mut pacer, &cancelled)
            .await;

        match result {
            JobResult::Fetched { analysis, .. } => {
                assert!(analysis.emails.contains("hello@example.org"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(
            detailed.requested(),
            vec!["http://example.org/", "http://example.org/contact"]
        );
    }

    #[tokio::test]
    async fn test_detailed_job_rejects_non_2xx() {
        let ctx = context(Arc::new(Site::new(&[])), Some(Arc::new(Site::new(&[]))));
        let mut pacer = Pacer::new(Duration::ZERO);
        let cancelled = AtomicBool::new(false);

        let result = ctx
            .detailed_job(&url("http://example.org/"), &mut pacer, &cancelled)
            .await;
        assert_eq!(result, JobResult::Failed(FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_pool_bounds_concurrency() {
        let mut site = Site::new(&[]);
        site.latency = Duration::from_millis(20);
        let site = Arc::new(site);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::spawn(context(Arc::clone(&site), None), 3, tx);
        for index in 0..12 {
            assert!(scheduler.submit(CrawlJob {
                index,
                url: url(&format!("http://site{}.example.org/", index)),
                tier: Tier::Fast,
            }));
        }

        let mut seen = Vec::new();
        for _ in 0..12 {
            seen.push(rx.recv().await.unwrap().index);
        }
        scheduler.shutdown().await;

        seen.sort_unstable();
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        assert!(site.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_cancelled_jobs_are_not_fetched() {
        let site = Arc::new(Site::new(&[]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::spawn(context(Arc::clone(&site), None), 2, tx);

        scheduler.cancel();
        scheduler.submit(CrawlJob {
            index: 0,
            url: url("http://example.org/"),
            tier: Tier::Fast,
        });

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.result, JobResult::Cancelled);
        assert!(site.requested().is_empty());
        scheduler.shutdown().await;
    }
}

use std::time::Duration;
use tokio::time::Instant;

/// Tracks the request timing of a single worker
///
/// Each worker owns one pacer and consults it before every request,
/// retries and linked-page fetches included, so consecutive requests of a
/// worker are at least `delay` apart.
#[derive(Debug, Clone)]
pub struct Pacer {
    /// Minimum spacing between two requests
    delay: Duration,

    /// Number of requests made by this worker
    pub request_count: u32,

    /// Timestamp of the last request
    pub last_request_time: Option<Instant>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            request_count: 0,
            last_request_time: None,
        }
    }

    /// Checks if a request can be made now
    pub fn can_request(&self, now: Instant) -> bool {
        self.time_until_next_request(now).is_none()
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        if let Some(last) = self.last_request_time {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.delay {
                return Some(self.delay - elapsed);
            }
        }
        None
    }

    /// Records that a request was made
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Sleeps until the next request is allowed, then records it
    pub async fn wait_turn(&mut self) {
        if let Some(wait) = self.time_until_next_request(Instant::now()) {
            tokio::time::sleep(wait).await;
        }
        self.record_request(Instant::now());
    }
}

use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Hire-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub detailed: DetailedConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Category table; the built-in career table is used when empty
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

/// Politeness policy for the worker pool
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Maximum number of simultaneous in-flight fetches (worker pool size)
    pub concurrency: u32,

    /// Minimum time between two requests of the same worker (milliseconds)
    pub request_delay: u64,

    /// Maximum retries per fetch attempt
    pub retry_count: u32,

    /// Fixed delay between retries (milliseconds)
    pub retry_delay: u64,

    /// Maximum link-following hops per record
    pub depth_limit: u32,

    /// Maximum number of linked pages the detailed tier visits at the second hop
    pub max_linked_pages: u32,

    /// Per-request timeout (milliseconds)
    pub request_timeout: u64,

    /// Run-wide deadline (seconds)
    pub run_timeout: Option<u64>,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            request_delay: 250,
            retry_count: 3,
            retry_delay: 1000,
            depth_limit: 2,
            max_linked_pages: 3,
            request_timeout: 30_000,
            run_timeout: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,

    /// Literal user agent string sent instead of the composed one
    #[serde(default, rename = "override")]
    pub override_value: Option<String>,
}

impl UserAgentConfig {
    /// Returns the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        if let Some(value) = &self.override_value {
            return value.clone();
        }
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Which backend renders pages for the detailed tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Headless Chromium with script execution
    Chromium,
    /// Plain HTTP fetch (no script execution)
    Http,
}

/// Detailed (render-capable) tier configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DetailedConfig {
    /// Whether records with no emails fall back to the detailed tier
    pub enabled: bool,

    pub renderer: RendererKind,

    /// Explicit Chromium binary; searched on PATH when absent
    pub chromium_path: Option<String>,

    /// Time given to client-side scripts after navigation (milliseconds)
    pub settle_time: u64,

    /// Maximum simultaneously open browser pages
    pub max_open_pages: u32,
}

impl Default for DetailedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            renderer: RendererKind::Chromium,
            chromium_path: None,
            settle_time: 1500,
            max_open_pages: 4,
        }
    }
}

/// Input table configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct InputConfig {
    /// Path to the input CSV file
    pub csv_path: Option<String>,

    /// Column holding the website URL
    pub website_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            website_column: "Website".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Path to the results CSV file
    pub csv_path: Option<String>,

    /// Column receiving the joined email list
    pub email_column: String,

    /// Column receiving the terminal error reason
    pub error_column: String,

    /// Email column value when a fetch succeeded but found nothing
    pub none_found: String,

    /// Optional SQLite database receiving the result table
    pub database_path: Option<String>,

    /// Optional markdown run summary
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            email_column: "EmailCrawler".to_string(),
            error_column: "CrawlError".to_string(),
            none_found: "NA".to_string(),
            database_path: None,
            summary_path: None,
        }
    }
}

/// One category of the category table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryEntry {
    /// Column name of the category (e.g. "CareerOrCareers")
    pub name: String,

    /// Case-insensitive substrings indicating presence
    pub keywords: Vec<String>,
}

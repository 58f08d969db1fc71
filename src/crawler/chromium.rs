//! Headless Chromium renderer for the detailed tier

use crate::config::Config;
use crate::crawler::fetcher::{FetchError, FetchTier, FetchedPage};
use crate::SweepError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::handler::http::HttpRequest;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use url::Url;

/// Binary names searched on PATH when no explicit path is configured
const CHROMIUM_BINARIES: [&str; 4] = [
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
];

/// Finds the Chromium binary: the configured path if it exists, else PATH
pub fn find_chromium(configured: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = configured {
        let path = PathBuf::from(path);
        return path.exists().then_some(path);
    }

    CHROMIUM_BINARIES
        .iter()
        .find_map(|name| which::which(name).ok())
}

/// Detailed tier backed by a shared headless browser
///
/// Every fetch opens its own page; a semaphore bounds how many pages are
/// open at once.
pub struct ChromiumTier {
    browser: Browser,
    handler: JoinHandle<()>,
    open_pages: Arc<Semaphore>,
    settle_time: Duration,
    timeout: Duration,
}

impl ChromiumTier {
    /// Launches a headless Chromium instance
    pub async fn launch(config: &Config) -> Result<Self, SweepError> {
        let executable = find_chromium(config.detailed.chromium_path.as_deref())
            .ok_or_else(|| SweepError::Render("Chromium executable not found".to_string()))?;

        let browser_config = BrowserConfig::builder()
            .chrome_executable(executable)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg(format!("--user-agent={}", config.user_agent.header_value()))
            .build()
            .map_err(SweepError::Render)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| SweepError::Render(format!("failed to launch Chromium: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Chromium handler event error: {}", e);
                }
            }
        });

        tracing::info!("Launched headless Chromium for the detailed tier");

        Ok(Self {
            browser,
            handler,
            open_pages: Arc::new(Semaphore::new(config.detailed.max_open_pages as usize)),
            settle_time: Duration::from_millis(config.detailed.settle_time),
            timeout: config.crawler.request_timeout(),
        })
    }

    async fn render(&self, page: &Page, url: &Url) -> Result<FetchedPage, FetchError> {
        page.goto(url.as_str()).await.map_err(render_error)?;
        let navigation = page
            .wait_for_navigation_response()
            .await
            .map_err(render_error)?;
        let status_code = navigation_status(navigation.as_deref());
        tokio::time::sleep(self.settle_time).await;

        let body: String = page
            .evaluate("document.documentElement.outerHTML")
            .await
            .map_err(render_error)?
            .into_value()
            .map_err(|e| FetchError::Render(format!("{:?}", e)))?;

        let final_url = page
            .url()
            .await
            .ok()
            .flatten()
            .and_then(|u| Url::parse(&u).ok())
            .unwrap_or_else(|| url.clone());

        Ok(FetchedPage {
            final_url,
            status_code,
            body,
        })
    }
}

/// HTTP status of the main document
///
/// Documents that never hit the network (`data:`, `about:`) carry no
/// response and count as 200.
fn navigation_status(request: Option<&HttpRequest>) -> u16 {
    request
        .and_then(|request| request.response.as_ref())
        .map(|response| u16::try_from(response.status).unwrap_or(0))
        .unwrap_or(200)
}

fn render_error(error: chromiumoxide::error::CdpError) -> FetchError {
    FetchError::Render(error.to_string())
}

#[async_trait]
impl FetchTier for ChromiumTier {
    fn name(&self) -> &'static str {
        "chromium"
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let _permit = self
            .open_pages
            .acquire()
            .await
            .map_err(|e| FetchError::Render(e.to_string()))?;

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(render_error)?;

        let outcome = tokio::time::timeout(self.timeout, self.render(&page, url)).await;
        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close page for {}: {}", url, e);
        }

        match outcome {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        }
    }
}

impl Drop for ChromiumTier {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> Config {
        crate::config::parse_config(
            r#"
[user-agent]
crawler-name = "TestSweep"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[detailed]
settle-time = 0
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_missing_configured_path() {
        assert!(find_chromium(Some("/nonexistent/chromium-binary")).is_none());
    }

    #[test]
    fn test_navigation_without_response_counts_as_ok() {
        assert_eq!(navigation_status(None), 200);
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_render_data_url() {
        let tier = ChromiumTier::launch(&config()).await.unwrap();
        let url = Url::parse("data:text/html,<p>jobs@example.org</p>").unwrap();

        let page = tier.fetch(&url).await.unwrap();
        assert!(page.body.contains("jobs@example.org"));
        assert!(page.is_success());
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_render_reports_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string("<p>Not found: webmaster@example.org</p>")
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;

        let tier = ChromiumTier::launch(&config()).await.unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();

        let page = tier.fetch(&url).await.unwrap();
        assert_eq!(page.status_code, 404);
        assert!(!page.is_success());
    }
}

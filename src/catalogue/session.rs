//! Browser sessions that load catalogue pages.
//!
//! A session is opened once per run, reused for every page, and closed
//! exactly once when the run ends.

use crate::config::Config;
use crate::error::ScrapeError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;
use wreq_util::Emulation;

/// A controllable browser - enables mocking for tests.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates to `url` and returns the rendered HTML.
    async fn navigate(&mut self, url: &str) -> Result<String>;

    /// Releases the session. Further navigation fails.
    async fn close(&mut self) -> Result<()>;
}

#[async_trait]
impl<S: BrowserSession + ?Sized> BrowserSession for Box<S> {
    async fn navigate(&mut self, url: &str) -> Result<String> {
        (**self).navigate(url).await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }
}

fn navigation_error(url: &str, reason: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Navigation { url: url.to_string(), reason: reason.to_string() }
}

/// Fails unless the main document came back with a 2xx status.
///
/// `None` means the session saw no response for the document at all.
pub(crate) fn check_status(url: &str, status: Option<u16>) -> Result<(), ScrapeError> {
    match status {
        Some(code) if (200..300).contains(&code) => Ok(()),
        Some(code) => Err(navigation_error(url, format!("status {}", code))),
        None => Err(navigation_error(url, "no response received")),
    }
}

/// Session backed by an HTTP client that emulates Chrome's TLS and headers.
///
/// The catalogue is server-rendered, so the response body is the rendered page.
pub struct HttpSession {
    client: Client,
    closed: bool,
}

impl HttpSession {
    /// Creates a new session with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;
        info!("Opened HTTP browser session");

        Ok(Self { client, closed: false })
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn navigate(&mut self, url: &str) -> Result<String> {
        if self.closed {
            anyhow::bail!("Browser session is closed");
        }

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-GB,en;q=0.9")
            .send()
            .await
            .map_err(|e| navigation_error(url, e))?;

        let status = response.status();
        debug!("Response status: {}", status);
        check_status(url, Some(status.as_u16()))?;

        response.text().await.context("Failed to read response body")
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            info!("Closed HTTP browser session");
        }
        Ok(())
    }
}

#[cfg(feature = "headless")]
pub use headless::HeadlessSession;

#[cfg(feature = "headless")]
mod headless {
    use super::{check_status, navigation_error, BrowserSession};
    use anyhow::{Context, Result};
    use async_trait::async_trait;
    use chromiumoxide::{Browser, BrowserConfig, Page};
    use futures::StreamExt;
    use std::time::Duration;
    use tokio::task::JoinHandle;
    use tracing::{debug, info, warn};

    /// Session backed by a headless Chromium instance with a single reused tab.
    pub struct HeadlessSession {
        browser: Browser,
        page: Option<Page>,
        handler: JoinHandle<()>,
        timeout: Duration,
        closed: bool,
    }

    impl HeadlessSession {
        /// Launches headless Chromium. Honours `CHROME_BIN` for the executable.
        pub async fn launch(timeout: Duration) -> Result<Self> {
            let mut builder = BrowserConfig::builder().no_sandbox();

            if let Ok(bin) = std::env::var("CHROME_BIN") {
                info!("Using Chrome binary: {}", bin);
                builder = builder.chrome_executable(bin);
            }

            let config = builder
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .arg("--disable-extensions")
                .arg("--no-first-run")
                .build()
                .map_err(|e| anyhow::anyhow!("Browser config error: {e}"))?;

            let (browser, mut handler) =
                Browser::launch(config).await.context("Failed to launch browser")?;

            // The CDP handler must be polled for the connection to make progress.
            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        warn!("Browser CDP handler error: {event:?}");
                        break;
                    }
                }
            });

            info!("Launched headless Chromium session");
            Ok(Self { browser, page: None, handler, timeout, closed: false })
        }

        async fn load(&mut self, url: &str) -> Result<String> {
            let page = match &self.page {
                Some(page) => {
                    page.goto(url).await.map_err(|e| navigation_error(url, e))?;
                    page.clone()
                }
                None => {
                    let page =
                        self.browser.new_page(url).await.map_err(|e| navigation_error(url, e))?;
                    self.page = Some(page.clone());
                    page
                }
            };

            // Chromium renders error pages too, so the document status decides success.
            let request =
                page.wait_for_navigation_response().await.map_err(|e| navigation_error(url, e))?;
            let status = request
                .as_ref()
                .and_then(|r| r.response.as_ref())
                .and_then(|r| u16::try_from(r.status).ok());
            debug!("Response status: {:?}", status);
            check_status(url, status)?;

            page.content().await.context("Failed to read page content")
        }
    }

    #[async_trait]
    impl BrowserSession for HeadlessSession {
        async fn navigate(&mut self, url: &str) -> Result<String> {
            if self.closed {
                anyhow::bail!("Browser session is closed");
            }

            debug!("Navigating to {}", url);
            let timeout = self.timeout;
            match tokio::time::timeout(timeout, self.load(url)).await {
                Ok(result) => result,
                Err(_) => Err(navigation_error(
                    url,
                    format!("timed out after {} seconds", timeout.as_secs()),
                )
                .into()),
            }
        }

        async fn close(&mut self) -> Result<()> {
            if self.closed {
                return Ok(());
            }
            self.closed = true;

            if let Some(page) = self.page.take() {
                let _ = page.close().await;
            }

            let result = self.browser.close().await.context("Failed to close browser");
            let _ = self.browser.wait().await;
            self.handler.abort();

            info!("Closed headless Chromium session");
            result.map(|_| ())
        }
    }
}

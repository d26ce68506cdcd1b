//! Page fetching over an injected browser session.

use crate::catalogue::session::BrowserSession;
use anyhow::Result;
use tracing::debug;

/// Loads numbered catalogue pages through a [`BrowserSession`] it owns.
pub struct PageFetcher<S> {
    session: S,
    url_template: String,
}

impl<S: BrowserSession> PageFetcher<S> {
    /// `url_template` must contain a `{}` placeholder for the page number.
    pub fn new(session: S, url_template: impl Into<String>) -> Self {
        Self { session, url_template: url_template.into() }
    }

    /// URL of catalogue page `page`.
    pub fn page_url(&self, page: u32) -> String {
        self.url_template.replace("{}", &page.to_string())
    }

    /// Navigates to page `page` and returns its HTML. Navigation errors propagate.
    pub async fn fetch(&mut self, page: u32) -> Result<String> {
        let url = self.page_url(page);
        debug!("Fetching page {}: {}", page, url);
        self.session.navigate(&url).await
    }

    /// Closes the underlying session, consuming the fetcher.
    pub async fn release(mut self) -> Result<()> {
        self.session.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Default)]
    struct RecordingSession {
        visited: Vec<String>,
        closed: bool,
    }

    #[async_trait]
    impl BrowserSession for RecordingSession {
        async fn navigate(&mut self, url: &str) -> Result<String> {
            self.visited.push(url.to_string());
            Ok(format!("<html>{}</html>", url))
        }

        async fn close(&mut self) -> Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    #[test]
    fn test_page_url() {
        let fetcher = PageFetcher::new(
            RecordingSession::default(),
            "https://books.toscrape.com/catalogue/page-{}.html",
        );
        assert_eq!(fetcher.page_url(1), "https://books.toscrape.com/catalogue/page-1.html");
        assert_eq!(fetcher.page_url(50), "https://books.toscrape.com/catalogue/page-50.html");
    }

    #[tokio::test]
    async fn test_fetch_reuses_session() {
        let mut fetcher = PageFetcher::new(RecordingSession::default(), "http://test/page-{}.html");

        let html = fetcher.fetch(1).await.unwrap();
        assert!(html.contains("page-1.html"));
        fetcher.fetch(2).await.unwrap();

        assert_eq!(fetcher.session.visited, vec!["http://test/page-1.html", "http://test/page-2.html"]);
        assert!(!fetcher.session.closed);
    }
}

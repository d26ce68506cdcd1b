//! Drives fetch and extract across the catalogue's page range.

use crate::catalogue::{BookRecord, BrowserSession, Extractor, PageFetcher};
use crate::config::Config;
use crate::rates::ConversionRate;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Scrapes pages `1..=page_count` in order.
///
/// The page count is not discovered from the site: later pages are never
/// requested, and a page that does not exist fails with the session's
/// navigation error.
pub struct Pipeline {
    url_template: String,
    page_count: u32,
    extractor: Extractor,
}

impl Pipeline {
    pub fn new(url_template: impl Into<String>, page_count: u32) -> Self {
        Self { url_template: url_template.into(), page_count, extractor: Extractor::new() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.catalogue_url.clone(), config.page_count)
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Runs the scrape over `session`, which is closed exactly once whether
    /// or not a page fails.
    ///
    /// Records come back in page order, then document order. The first
    /// fetch or extract error aborts the run and discards everything
    /// collected so far.
    pub async fn run<S: BrowserSession>(&self, session: S, rate: ConversionRate) -> Result<Vec<BookRecord>> {
        let mut fetcher = PageFetcher::new(session, self.url_template.clone());

        let outcome = self.scrape_pages(&mut fetcher, rate).await;

        if let Err(e) = fetcher.release().await {
            warn!("Failed to close browser session: {:#}", e);
        }

        outcome
    }

    async fn scrape_pages<S: BrowserSession>(
        &self,
        fetcher: &mut PageFetcher<S>,
        rate: ConversionRate,
    ) -> Result<Vec<BookRecord>> {
        let mut records = Vec::new();

        for page in 1..=self.page_count {
            let html = fetcher.fetch(page).await?;
            let books = self
                .extractor
                .extract(&html, rate)
                .with_context(|| format!("Failed to extract page {}", page))?;

            info!("Scraped page {} with {} books", page, books.len());
            records.extend(books);
        }

        Ok(records)
    }
}

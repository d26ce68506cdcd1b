//! Scrape command implementation.

use crate::catalogue::{BrowserSession, HttpSession};
use crate::config::Config;
use crate::export::Exporter;
use crate::pipeline::Pipeline;
use crate::rates::{ConversionRate, ExchangeRateClient, FixedRate, RateProvider};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct ScrapeSummary {
    /// Rows written, excluding the header
    pub records: usize,
    /// Rate applied to every record
    pub rate: ConversionRate,
    /// Spreadsheet location
    pub output: PathBuf,
    /// Wall-clock duration of the whole run
    pub elapsed: Duration,
}

/// Resolves the rate, scrapes every page, and exports the spreadsheet.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the scrape with the configured rate provider and session.
    ///
    /// The rate is resolved before the session is opened.
    pub async fn execute(&self) -> Result<ScrapeSummary> {
        self.config.validate()?;
        let start = Instant::now();

        let rates: Box<dyn RateProvider> = match self.config.fixed_rate {
            Some(value) => Box::new(
                FixedRate::new(value).with_context(|| format!("Invalid fixed rate: {}", value))?,
            ),
            None => Box::new(
                ExchangeRateClient::new(&self.config).context("Failed to create rate client")?,
            ),
        };
        let rate = rates.resolve().await;

        let session = self.open_session().await?;
        self.run(start, rate, session).await
    }

    /// Executes the scrape with a provided rate provider and session (for testing).
    ///
    /// Nothing is written unless every page succeeds.
    pub async fn execute_with<R, S>(&self, rates: &R, session: S) -> Result<ScrapeSummary>
    where
        R: RateProvider + ?Sized,
        S: BrowserSession,
    {
        let start = Instant::now();
        let rate = rates.resolve().await;
        self.run(start, rate, session).await
    }

    async fn run<S: BrowserSession>(
        &self,
        start: Instant,
        rate: ConversionRate,
        session: S,
    ) -> Result<ScrapeSummary> {
        let pipeline = Pipeline::from_config(&self.config);
        let records = pipeline.run(session, rate).await?;

        let written = Exporter::export(&records, &self.config.output).with_context(|| {
            format!("Failed to export to {}", self.config.output.display())
        })?;

        let elapsed = start.elapsed();
        info!("Completed in {:.2} seconds", elapsed.as_secs_f64());

        Ok(ScrapeSummary { records: written, rate, output: self.config.output.clone(), elapsed })
    }

    async fn open_session(&self) -> Result<Box<dyn BrowserSession>> {
        if self.config.headless {
            return self.open_headless_session().await;
        }

        Ok(Box::new(HttpSession::new(&self.config).context("Failed to create HTTP session")?))
    }

    #[cfg(feature = "headless")]
    async fn open_headless_session(&self) -> Result<Box<dyn BrowserSession>> {
        let timeout = Duration::from_secs(self.config.request_timeout_secs);
        Ok(Box::new(crate::catalogue::HeadlessSession::launch(timeout).await?))
    }

    #[cfg(not(feature = "headless"))]
    async fn open_headless_session(&self) -> Result<Box<dyn BrowserSession>> {
        anyhow::bail!("Headless mode requires building with the `headless` feature")
    }
}

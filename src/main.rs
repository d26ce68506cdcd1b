//! bookscan - Scrape the books.toscrape.com catalogue into an Excel workbook.

use anyhow::Result;
use bookscan::commands::ScrapeCommand;
use bookscan::config::Config;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bookscan",
    version,
    about = "Scrape books.toscrape.com, convert prices to USD, export to Excel",
    long_about = "Walks the books.toscrape.com catalogue page by page, converts each GBP price \
                  to USD with one exchange rate per run, and writes the books to an .xlsx file."
)]
struct Cli {
    /// Spreadsheet destination
    #[arg(short, long, env = "BOOKSCAN_OUTPUT")]
    output: Option<PathBuf>,

    /// Number of catalogue pages to scrape, starting at page 1
    #[arg(short, long, env = "BOOKSCAN_PAGES")]
    pages: Option<u32>,

    /// Rate used when no live rate is available
    #[arg(long, env = "BOOKSCAN_FALLBACK_RATE")]
    fallback_rate: Option<f64>,

    /// Use this GBP to USD rate and skip the lookup
    #[arg(long)]
    fixed_rate: Option<f64>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, env = "BOOKSCAN_PROXY")]
    proxy: Option<String>,

    /// Render pages in headless Chromium (requires the `headless` feature)
    #[arg(long)]
    headless: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env never overrides variables already set
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()))
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(pages) = cli.pages {
        config.page_count = pages;
    }
    if let Some(rate) = cli.fallback_rate {
        config.fallback_rate = rate;
    }
    if cli.fixed_rate.is_some() {
        config.fixed_rate = cli.fixed_rate;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if cli.headless {
        config.headless = true;
    }

    let summary = ScrapeCommand::new(config).execute().await?;
    println!(
        "Saved {} books to {} (1 GBP = {} USD, {} rate) in {:.2}s",
        summary.records,
        summary.output.display(),
        summary.rate.value(),
        summary.rate.source(),
        summary.elapsed.as_secs_f64()
    );

    Ok(())
}

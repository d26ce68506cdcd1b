//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::rates::models::FALLBACK_RATE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default catalogue page template; `{}` is replaced with the page number.
pub const CATALOGUE_URL: &str = "https://books.toscrape.com/catalogue/page-{}.html";

/// Number of catalogue pages on books.toscrape.com.
pub const PAGE_COUNT: u32 = 50;

/// Run configuration with layered loading.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// API key for exchangerate-api.com; without it the fallback rate is used
    #[serde(default)]
    pub exchange_rate_api_key: Option<String>,

    /// Base URL of the exchange-rate service
    #[serde(default = "default_rate_base_url")]
    pub rate_base_url: String,

    /// GBP to USD rate used when the live lookup is unavailable
    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: f64,

    /// Use this rate and skip the lookup entirely
    #[serde(default)]
    pub fixed_rate: Option<f64>,

    /// Timeout for the rate lookup in seconds
    #[serde(default = "default_rate_timeout_secs")]
    pub rate_timeout_secs: u64,

    /// Catalogue page URL template with a `{}` placeholder
    #[serde(default = "default_catalogue_url")]
    pub catalogue_url: String,

    /// Pages 1..=page_count are scraped; later pages are never requested
    #[serde(default = "default_page_count")]
    pub page_count: u32,

    /// Spreadsheet destination
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Per-page navigation timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Render pages in headless Chromium instead of the HTTP session
    #[serde(default)]
    pub headless: bool,
}

fn default_rate_base_url() -> String {
    "https://v6.exchangerate-api.com/v6".to_string()
}

fn default_fallback_rate() -> f64 {
    FALLBACK_RATE
}

fn default_rate_timeout_secs() -> u64 {
    10
}

fn default_catalogue_url() -> String {
    CATALOGUE_URL.to_string()
}

fn default_page_count() -> u32 {
    PAGE_COUNT
}

fn default_output() -> PathBuf {
    PathBuf::from("book_data.xlsx")
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exchange_rate_api_key: None,
            rate_base_url: default_rate_base_url(),
            fallback_rate: default_fallback_rate(),
            fixed_rate: None,
            rate_timeout_secs: default_rate_timeout_secs(),
            catalogue_url: default_catalogue_url(),
            page_count: default_page_count(),
            output: default_output(),
            request_timeout_secs: default_request_timeout_secs(),
            proxy: None,
            headless: false,
        }
    }
}

// Keeps the API key out of debug logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("exchange_rate_api_key", &self.exchange_rate_api_key.as_ref().map(|_| "<redacted>"))
            .field("rate_base_url", &self.rate_base_url)
            .field("fallback_rate", &self.fallback_rate)
            .field("fixed_rate", &self.fixed_rate)
            .field("rate_timeout_secs", &self.rate_timeout_secs)
            .field("catalogue_url", &self.catalogue_url)
            .field("page_count", &self.page_count)
            .field("output", &self.output)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("proxy", &self.proxy)
            .field("headless", &self.headless)
            .finish()
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("bookscan.toml");
        if local_config.exists() {
            debug!("Found bookscan.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("bookscan").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var("EXCHANGE_RATE_API_KEY") {
            if !key.trim().is_empty() {
                self.exchange_rate_api_key = Some(key);
            }
        }

        if let Ok(pages) = std::env::var("BOOKSCAN_PAGES") {
            if let Ok(p) = pages.parse() {
                self.page_count = p;
            }
        }

        if let Ok(output) = std::env::var("BOOKSCAN_OUTPUT") {
            self.output = PathBuf::from(output);
        }

        if let Ok(rate) = std::env::var("BOOKSCAN_FALLBACK_RATE") {
            if let Ok(r) = rate.parse() {
                self.fallback_rate = r;
            }
        }

        if let Ok(proxy) = std::env::var("BOOKSCAN_PROXY") {
            self.proxy = Some(proxy);
        }

        self
    }

    /// Rejects settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.page_count == 0 {
            anyhow::bail!("page_count must be at least 1");
        }

        if !(self.fallback_rate.is_finite() && self.fallback_rate > 0.0) {
            anyhow::bail!("fallback_rate must be a positive number, got {}", self.fallback_rate);
        }

        if let Some(rate) = self.fixed_rate {
            if !(rate.is_finite() && rate > 0.0) {
                anyhow::bail!("fixed_rate must be a positive number, got {}", rate);
            }
        }

        if !self.catalogue_url.contains("{}") {
            anyhow::bail!("catalogue_url must contain a {{}} page placeholder: {}", self.catalogue_url);
        }

        Ok(())
    }
}

//! Exchange-rate lookup with fallback to a constant rate.

use crate::config::Config;
use crate::rates::models::{ConversionRate, LatestRates, RateSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

/// Trait for resolving the conversion rate - enables mocking for tests.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Resolves the GBP to USD rate. Never fails; falls back to a constant instead.
    async fn resolve(&self) -> ConversionRate;
}

/// Client for the exchangerate-api.com `latest` endpoint.
pub struct ExchangeRateClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    fallback: ConversionRate,
}

impl ExchangeRateClient {
    /// Creates a client from the run configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(
            config.exchange_rate_api_key.clone(),
            config.rate_base_url.clone(),
            config.fallback_rate,
            Duration::from_secs(config.rate_timeout_secs),
        )
    }

    /// Creates a client with a custom base URL and timeout (for testing).
    ///
    /// Fails if `fallback` is zero, negative, or not finite.
    pub fn with_base_url(
        api_key: Option<String>,
        base_url: String,
        fallback: f64,
        timeout: Duration,
    ) -> Result<Self> {
        let fallback = ConversionRate::new(fallback, RateSource::Fallback)
            .with_context(|| format!("Invalid fallback rate: {}", fallback))?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Failed to build exchange-rate client")?;

        Ok(Self { client, api_key, base_url: base_url.trim_end_matches('/').to_string(), fallback })
    }

    /// Fetches the live USD rate. Errors are absorbed by [`RateProvider::resolve`].
    async fn fetch_live(&self, api_key: &str) -> Result<ConversionRate> {
        let url = format!("{}/{}/latest/GBP", self.base_url, api_key);
        debug!("GET {}/<api key>/latest/GBP", self.base_url);

        let response = self.client.get(&url).send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Exchange-rate service returned status: {}", status);
        }

        let body = response.text().await.context("Failed to read response body")?;
        let latest: LatestRates =
            serde_json::from_str(&body).context("Malformed exchange-rate response")?;

        let usd = latest.usd().context("Response has no conversion_rates.USD field")?;
        ConversionRate::new(usd, RateSource::Live)
            .with_context(|| format!("Response has a non-positive USD rate: {}", usd))
    }
}

#[async_trait]
impl RateProvider for ExchangeRateClient {
    async fn resolve(&self) -> ConversionRate {
        let Some(api_key) = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) else {
            warn!("No API key found, using fallback rate of {}", self.fallback.value());
            return self.fallback;
        };

        match self.fetch_live(api_key).await {
            Ok(rate) => {
                info!("Live exchange rate loaded: 1 GBP = {} USD", rate.value());
                rate
            }
            Err(e) => {
                warn!(
                    "Failed to fetch exchange rate, using fallback rate {}. Reason: {:#}",
                    self.fallback.value(),
                    e
                );
                self.fallback
            }
        }
    }
}

/// A rate supplied up front, bypassing the lookup.
pub struct FixedRate(pub ConversionRate);

impl FixedRate {
    /// Returns `None` for zero, negative, or non-finite values.
    pub fn new(value: f64) -> Option<Self> {
        ConversionRate::new(value, RateSource::Fixed).map(Self)
    }
}

#[async_trait]
impl RateProvider for FixedRate {
    async fn resolve(&self) -> ConversionRate {
        info!("Using fixed exchange rate: 1 GBP = {} USD", self.0.value());
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::models::FALLBACK_RATE;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(api_key: Option<&str>, base_url: String) -> ExchangeRateClient {
        ExchangeRateClient::with_base_url(
            api_key.map(String::from),
            base_url,
            FALLBACK_RATE,
            Duration::from_millis(500),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_live_rate() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test-key/latest/GBP"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"result":"success","base_code":"GBP","conversion_rates":{"GBP":1,"USD":1.2712}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = make_client(Some("test-key"), mock_server.uri());
        let rate = client.resolve().await;

        assert_eq!(rate.value(), 1.2712);
        assert_eq!(rate.source(), RateSource::Live);
    }

    #[tokio::test]
    async fn test_missing_api_key_uses_fallback() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        for key in [None, Some(""), Some("   ")] {
            let client = make_client(key, mock_server.uri());
            let rate = client.resolve().await;
            assert!(rate.is_fallback());
            assert_eq!(rate.value(), FALLBACK_RATE);
        }
    }

    #[tokio::test]
    async fn test_http_error_uses_fallback() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bad-key/latest/GBP"))
            .respond_with(ResponseTemplate::new(403).set_body_string(r#"{"result":"error"}"#))
            .mount(&mock_server)
            .await;

        let client = make_client(Some("bad-key"), mock_server.uri());
        let rate = client.resolve().await;

        assert!(rate.is_fallback());
        assert_eq!(rate.value(), FALLBACK_RATE);
    }

    #[tokio::test]
    async fn test_connection_error_uses_fallback() {
        // Nothing listens on port 9 of the loopback interface
        let client = make_client(Some("key"), "http://127.0.0.1:9".to_string());
        let rate = client.resolve().await;

        assert!(rate.is_fallback());
    }

    #[tokio::test]
    async fn test_timeout_uses_fallback() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"conversion_rates":{"USD":1.27}}"#)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let client = make_client(Some("key"), mock_server.uri());
        let rate = client.resolve().await;

        assert!(rate.is_fallback());
        assert_eq!(rate.value(), FALLBACK_RATE);
    }

    #[tokio::test]
    async fn test_missing_usd_field_uses_fallback() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"conversion_rates":{"EUR":1.17}}"#),
            )
            .mount(&mock_server)
            .await;

        let client = make_client(Some("key"), mock_server.uri());
        assert!(client.resolve().await.is_fallback());
    }

    #[tokio::test]
    async fn test_malformed_body_uses_fallback() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&mock_server)
            .await;

        let client = make_client(Some("key"), mock_server.uri());
        assert!(client.resolve().await.is_fallback());
    }

    #[tokio::test]
    async fn test_non_positive_rate_uses_fallback() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"conversion_rates":{"USD":0}}"#),
            )
            .mount(&mock_server)
            .await;

        let client = make_client(Some("key"), mock_server.uri());
        assert!(client.resolve().await.is_fallback());
    }

    #[tokio::test]
    async fn test_custom_fallback_value() {
        let client = ExchangeRateClient::with_base_url(
            None,
            "http://localhost".to_string(),
            1.42,
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(client.resolve().await.value(), 1.42);
    }

    #[test]
    fn test_invalid_fallback_rejected() {
        for fallback in [0.0, -1.3, f64::NAN, f64::INFINITY] {
            let result = ExchangeRateClient::with_base_url(
                None,
                "http://localhost".to_string(),
                fallback,
                Duration::from_secs(1),
            );
            let err = result.err().unwrap_or_else(|| panic!("accepted fallback {}", fallback));
            assert!(err.to_string().contains("Invalid fallback rate"));
        }
    }

    #[test]
    fn test_new_rejects_invalid_config_fallback() {
        let config = Config { fallback_rate: 0.0, ..Config::default() };
        assert!(ExchangeRateClient::new(&config).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = make_client(None, "http://localhost/v6/".to_string());
        assert_eq!(client.base_url, "http://localhost/v6");
    }

    #[tokio::test]
    async fn test_fixed_rate() {
        let provider = FixedRate::new(1.25).unwrap();
        let rate = provider.resolve().await;
        assert_eq!(rate.value(), 1.25);
        assert_eq!(rate.source(), RateSource::Fixed);

        assert!(FixedRate::new(0.0).is_none());
    }
}

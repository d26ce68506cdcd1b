//! Conversion rate and exchange-rate API response models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Rate used when no live rate can be obtained.
pub const FALLBACK_RATE: f64 = 1.30;

/// Rounds an amount to two decimal places, halves away from zero.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Where a conversion rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// Fetched from the exchange-rate service.
    Live,
    /// The configured fallback constant.
    Fallback,
    /// Supplied explicitly by the caller.
    Fixed,
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSource::Live => write!(f, "live"),
            RateSource::Fallback => write!(f, "fallback"),
            RateSource::Fixed => write!(f, "fixed"),
        }
    }
}

/// A positive GBP to USD multiplier, resolved once per run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionRate {
    value: f64,
    source: RateSource,
}

impl ConversionRate {
    /// Creates a rate, rejecting zero, negative, and non-finite values.
    pub fn new(value: f64, source: RateSource) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self { value, source })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn source(&self) -> RateSource {
        self.source
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RateSource::Fallback
    }

    /// Converts a GBP amount to USD, rounded to cents.
    pub fn convert(&self, gbp: f64) -> f64 {
        round_cents(gbp * self.value)
    }
}

/// Body of `GET /{key}/latest/GBP`.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestRates {
    pub conversion_rates: HashMap<String, f64>,
}

impl LatestRates {
    pub fn usd(&self) -> Option<f64> {
        self.conversion_rates.get("USD").copied()
    }
}

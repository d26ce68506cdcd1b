//! GBP to USD conversion rate lookup.

pub mod client;
pub mod models;

pub use client::{ExchangeRateClient, FixedRate, RateProvider};
pub use models::{round_cents, ConversionRate, RateSource};

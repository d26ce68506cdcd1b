//! bookscan - Scrape the books.toscrape.com catalogue into an Excel workbook.
//!
//! Resolves a GBP to USD rate once, walks the catalogue pages in order,
//! extracts one record per listed book, and writes them all to `.xlsx`.

pub mod catalogue;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod rates;

#[cfg(test)]
pub(crate) mod testutil;

pub use catalogue::{BookRecord, Rating};
pub use config::Config;
pub use error::ScrapeError;
pub use rates::ConversionRate;

//! Error types for conditions that abort a scrape run.

use thiserror::Error;

/// Fail-fast errors raised while fetching, extracting, or exporting.
///
/// The rate lookup never produces one of these; it degrades to the
/// fallback rate instead.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Price text was not a non-negative number once the currency glyph was removed.
    #[error("Invalid price text: {0:?}")]
    InvalidPrice(String),

    /// Rating class did not reduce to exactly one known rating word.
    #[error("Invalid rating class: {0:?}")]
    InvalidRating(String),

    /// A required element or attribute was missing from an item container.
    #[error("Missing {0} in product container")]
    MissingField(&'static str),

    /// The browser session failed to load a page.
    #[error("Failed to navigate to {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// Writing the spreadsheet failed.
    #[error("Failed to write spreadsheet: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

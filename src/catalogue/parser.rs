//! HTML extraction of book records from catalogue pages.

use crate::catalogue::models::{BookRecord, Rating};
use crate::catalogue::selectors::{self, CURRENCY_GLYPH, RATING_SENTINEL, TITLE_ATTR};
use crate::error::ScrapeError;
use crate::rates::ConversionRate;
use scraper::{ElementRef, Html};
use tracing::{debug, trace};

/// Turns a rendered catalogue page into [`BookRecord`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts every listed book in document order.
    ///
    /// A page without item containers yields an empty list. Any malformed
    /// item fails the whole page.
    pub fn extract(&self, html: &str, rate: ConversionRate) -> Result<Vec<BookRecord>, ScrapeError> {
        let document = Html::parse_document(html);

        let records = document
            .select(&selectors::PRODUCT)
            .map(|element| self.extract_item(element, rate))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Extracted {} books from page", records.len());
        Ok(records)
    }

    fn extract_item(&self, element: ElementRef, rate: ConversionRate) -> Result<BookRecord, ScrapeError> {
        let title = element
            .select(&selectors::TITLE_LINK)
            .next()
            .and_then(|e| e.value().attr(TITLE_ATTR))
            .ok_or(ScrapeError::MissingField("title"))?;

        let price_text = element
            .select(&selectors::PRICE)
            .next()
            .map(|e| e.text().collect::<String>())
            .ok_or(ScrapeError::MissingField("price"))?;
        let price_gbp = parse_price(&price_text)?;

        let availability = element
            .select(&selectors::AVAILABILITY)
            .next()
            .map(|e| normalize_whitespace(&e.text().collect::<String>()))
            .ok_or(ScrapeError::MissingField("availability"))?;

        let rating_class = element
            .select(&selectors::RATING)
            .next()
            .and_then(|e| e.value().attr("class"))
            .ok_or(ScrapeError::MissingField("rating"))?;
        let rating = parse_rating(rating_class)?;

        trace!("Parsed book: {} - £{:.2}", title, price_gbp);
        Ok(BookRecord::new(title, price_gbp, availability, rating, rate))
    }
}

/// Parses price text like `£51.77`.
///
/// Also accepts `Â£`, which is what the glyph becomes when the page's UTF-8
/// is decoded as Latin-1.
pub fn parse_price(text: &str) -> Result<f64, ScrapeError> {
    let trimmed = text.trim();
    let amount = trimmed.trim_start_matches('Â').trim_start_matches(CURRENCY_GLYPH).trim();

    match amount.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ScrapeError::InvalidPrice(trimmed.to_string())),
    }
}

/// Reads the rating word out of a class attribute like `star-rating Three`.
///
/// Every `star-rating` token is dropped; exactly one token must remain and
/// it must be a known rating word. Token order does not matter.
pub fn parse_rating(class: &str) -> Result<Rating, ScrapeError> {
    let mut tokens = class.split_whitespace().filter(|t| *t != RATING_SENTINEL);

    match (tokens.next(), tokens.next()) {
        (Some(word), None) => word.parse().map_err(|_| ScrapeError::InvalidRating(class.to_string())),
        _ => Err(ScrapeError::InvalidRating(class.to_string())),
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

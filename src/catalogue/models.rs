//! Data models for scraped books.

use crate::rates::ConversionRate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// One exported row: a book as listed on a catalogue page.
///
/// Records are immutable. The USD price is computed once from the GBP price
/// and the run's conversion rate when the record is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecord {
    id: Uuid,
    title: String,
    price_gbp: f64,
    price_usd: f64,
    availability: String,
    rating: Rating,
}

impl BookRecord {
    /// Builds a record with a fresh random id.
    pub fn new(
        title: impl Into<String>,
        price_gbp: f64,
        availability: impl Into<String>,
        rating: Rating,
        rate: ConversionRate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            price_gbp,
            price_usd: rate.convert(price_gbp),
            availability: availability.into(),
            rating,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price_gbp(&self) -> f64 {
        self.price_gbp
    }

    pub fn price_usd(&self) -> f64 {
        self.price_usd
    }

    pub fn availability(&self) -> &str {
        &self.availability
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }
}

/// Star rating, encoded on the site as a word in the `star-rating` class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Rating {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl Rating {
    /// Number of stars (1-5).
    pub fn stars(&self) -> u8 {
        match self {
            Rating::One => 1,
            Rating::Two => 2,
            Rating::Three => 3,
            Rating::Four => 4,
            Rating::Five => 5,
        }
    }

    /// The word used in the page markup and in the spreadsheet.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::One => "One",
            Rating::Two => "Two",
            Rating::Three => "Three",
            Rating::Four => "Four",
            Rating::Five => "Five",
        }
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "One" => Ok(Rating::One),
            "Two" => Ok(Rating::Two),
            "Three" => Ok(Rating::Three),
            "Four" => Ok(Rating::Four),
            "Five" => Ok(Rating::Five),
            _ => Err(format!("Unknown rating: {}. Use: One, Two, Three, Four, Five", s)),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

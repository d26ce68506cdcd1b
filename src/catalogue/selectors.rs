//! CSS selectors for books.toscrape.com catalogue pages.
//!
//! Update this file when the catalogue markup changes, and add a matching
//! fixture under `tests/fixtures`.

use scraper::Selector;
use std::sync::LazyLock;

/// Item container, one per listed book.
pub static PRODUCT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.product_pod").unwrap());

/// Heading link carrying the full title in its `title` attribute.
pub static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3 a").unwrap());

/// Attribute on [`TITLE_LINK`] holding the untruncated title.
pub const TITLE_ATTR: &str = "title";

/// Price text, e.g. `£51.77`.
pub static PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".price_color").unwrap());

/// Stock status text.
pub static AVAILABILITY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".availability").unwrap());

/// Rating element; its class reads `star-rating <Word>`.
pub static RATING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p.star-rating").unwrap());

/// Class token marking the rating element, stripped before reading the rating word.
pub const RATING_SENTINEL: &str = "star-rating";

/// Currency glyph prefixed to prices.
pub const CURRENCY_GLYPH: char = '£';

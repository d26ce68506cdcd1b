//! books.toscrape.com catalogue: sessions, page fetching, parsing, and models.

pub mod fetcher;
pub mod models;
pub mod parser;
pub mod selectors;
pub mod session;

pub use fetcher::PageFetcher;
pub use models::{BookRecord, Rating};
pub use parser::Extractor;
pub use session::{BrowserSession, HttpSession};

#[cfg(feature = "headless")]
pub use session::HeadlessSession;

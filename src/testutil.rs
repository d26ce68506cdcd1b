//! Test utilities: a scripted browser session and catalogue markup builders.

use crate::catalogue::BrowserSession;
use crate::error::ScrapeError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Renders one `article.product_pod` the way the catalogue does.
pub fn catalogue_item(title: &str, price_gbp: f64, rating: &str) -> String {
    format!(
        r#"<li class="col-xs-6 col-sm-4 col-md-3 col-lg-3">
            <article class="product_pod">
                <div class="image_container"><a href="book/index.html"><img src="cover.jpg" alt="{title}" class="thumbnail"></a></div>
                <p class="star-rating {rating}"><i class="icon-star"></i><i class="icon-star"></i></p>
                <h3><a href="book/index.html" title="{title}">{title}</a></h3>
                <div class="product_price">
                    <p class="price_color">£{price_gbp:.2}</p>
                    <p class="instock availability">
                        <i class="icon-ok"></i>
                        In stock
                    </p>
                </div>
            </article>
        </li>"#
    )
}

/// Renders a catalogue page listing `(title, price_gbp, rating)` items.
pub fn catalogue_page(items: &[(&str, f64, &str)]) -> String {
    let body: String = items
        .iter()
        .map(|(title, price, rating)| catalogue_item(title, *price, rating))
        .collect();
    format!(
        r#"<!DOCTYPE html><html><body><section><ol class="row">{}</ol></section></body></html>"#,
        body
    )
}

/// Session that serves scripted pages in call order.
///
/// Calls past the end of `pages` get an empty catalogue page. If `fail_on`
/// is set, that call (1-based) fails with a navigation error.
#[derive(Clone, Default)]
pub struct StubSession {
    pages: Vec<String>,
    fail_on: Option<u32>,
    calls: Arc<AtomicU32>,
    closes: Arc<AtomicU32>,
    visited: Arc<Mutex<Vec<String>>>,
}

impl StubSession {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages, ..Self::default() }
    }

    pub fn failing_on(mut self, call: u32) -> Self {
        self.fail_on = Some(call);
        self
    }

    pub fn close_count(&self) -> u32 {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserSession for StubSession {
    async fn navigate(&mut self, url: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.visited.lock().unwrap().push(url.to_string());

        if self.fail_on == Some(call) {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                reason: "connection reset".to_string(),
            }
            .into());
        }

        Ok(self
            .pages
            .get((call - 1) as usize)
            .cloned()
            .unwrap_or_else(|| catalogue_page(&[])))
    }

    async fn close(&mut self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

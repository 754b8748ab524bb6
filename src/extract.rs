//! Static extraction over already-delivered markup.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::adapter::{AdapterConfig, SelectorSet};
use crate::product::{Product, RawListing};
use crate::{Result, ScrapeError};

/// Selectors of an adapter, compiled once per extraction.
struct CompiledSelectors {
    container: Selector,
    name: Selector,
    price: Selector,
    rating: Option<Selector>,
    reviews: Option<Selector>,
    image: Selector,
    image_attr: &'static str,
}

fn compile(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| {
        debug!("Selector '{}' rejected: {:?}", css, e);
        ScrapeError::Selector(css.to_string())
    })
}

impl CompiledSelectors {
    fn new(set: &SelectorSet) -> Result<Self> {
        Ok(Self {
            container: compile(set.container)?,
            name: compile(set.name)?,
            price: compile(set.price)?,
            rating: set.rating.map(compile).transpose()?,
            reviews: set.reviews.map(compile).transpose()?,
            image: compile(set.image)?,
            image_attr: set.image_attr,
        })
    }

    fn capture(&self, card: ElementRef<'_>) -> RawListing {
        RawListing {
            name: first_text(card, &self.name),
            price: first_text(card, &self.price),
            rating: self.rating.as_ref().and_then(|sel| first_text(card, sel)),
            reviews: self.reviews.as_ref().and_then(|sel| first_text(card, sel)),
            image: card
                .select(&self.image)
                .next()
                .and_then(|el| el.value().attr(self.image_attr))
                .map(str::to_string),
        }
    }
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Extracts valid products from raw markup using `adapter`'s ruleset.
///
/// An empty result is not an error; it tells the coordinator to escalate.
/// Only an uncompilable selector fails the whole call.
pub fn extract_static(html: &str, adapter: &AdapterConfig) -> Result<Vec<Product>> {
    let selectors = CompiledSelectors::new(&adapter.selectors)?;
    let document = Html::parse_document(html);

    let raw = document
        .select(&selectors.container)
        .map(|card| Ok(selectors.capture(card)));

    Ok(keep_valid(raw, adapter))
}

/// Normalizes captured listings and applies the validity filter.
///
/// A listing whose capture failed is dropped on its own;
/// the rest of the batch continues.
pub(crate) fn keep_valid<I>(listings: I, adapter: &AdapterConfig) -> Vec<Product>
where
    I: IntoIterator<Item = Result<RawListing>>,
{
    let mut products = Vec::new();
    let mut seen = 0usize;

    for (index, listing) in listings.into_iter().enumerate() {
        seen += 1;
        let product = listing.map(|raw| raw.normalize(adapter.reviews_format));
        match product {
            Ok(product) if product.is_valid() => products.push(product),
            Ok(_) => {}
            Err(e) => warn!("{}: dropping listing #{}: {}", adapter.name, index, e),
        }
    }

    debug!(
        "{}: {} of {} containers yielded valid products",
        adapter.name,
        products.len(),
        seen
    );
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SpaceEncoding;
    use crate::normalize::{CountFormat, PLACEHOLDER};

    const SITE_A: AdapterConfig = AdapterConfig {
        name: "SiteA",
        search_url: "https://site-a.test/search?q=",
        space_encoding: SpaceEncoding::Plus,
        selectors: SelectorSet {
            container: "div.card",
            name: ".name",
            price: ".price",
            rating: Some(".rating"),
            reviews: Some(".reviews"),
            image: "img",
            image_attr: "src",
        },
        reviews_format: CountFormat::AllDigits,
    };

    #[test]
    fn test_site_a_drops_card_missing_image() {
        let html = r#"
            <html><body>
                <div class="card">
                    <span class="name">Widget</span>
                    <span class="price">$10.00</span>
                    <span class="rating">4.5 stars</span>
                    <span class="reviews">12 reviews</span>
                    <img src="http://x/y.jpg">
                </div>
                <div class="card">
                    <span class="name">Gadget</span>
                    <span class="price">$20.00</span>
                    <span class="rating">3.9 stars</span>
                    <span class="reviews">7 reviews</span>
                </div>
            </body></html>
        "#;
        let products = extract_static(html, &SITE_A).unwrap();
        assert_eq!(
            products,
            vec![Product {
                name: "Widget".to_string(),
                price: 10.0,
                rating: 4.5,
                reviews: 12,
                image_url: "http://x/y.jpg".to_string(),
            }]
        );
    }

    #[test]
    fn test_no_containers_is_empty_not_error() {
        let products = extract_static("<html><body><p>Nothing</p></body></html>", &SITE_A).unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn test_zero_price_card_is_dropped() {
        let html = r#"
            <div class="card">
                <span class="name">Free sample</span>
                <span class="price">Currently unavailable</span>
                <img src="/s.jpg">
            </div>
        "#;
        assert!(extract_static(html, &SITE_A).unwrap().is_empty());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let html = r#"
            <div class="card">
                <span class="name">Plain</span>
                <span class="price">₹499</span>
                <img src="/img/plain.png">
            </div>
        "#;
        let products = extract_static(html, &SITE_A).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].rating, 0.0);
        assert_eq!(products[0].reviews, 0);
        assert_eq!(products[0].image_url, "/img/plain.png");
    }

    #[test]
    fn test_bad_item_does_not_abort_batch() {
        let html = r#"
            <div class="card">
                <span class="name">Broken</span>
                <span class="price">$5</span>
            </div>
            <div class="card">
                <span class="name">Fine</span>
                <span class="price">$6</span>
                <img src="/b.jpg">
            </div>
        "#;
        let products = extract_static(html, &SITE_A).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Fine");
    }

    #[test]
    fn test_overflowing_review_count_keeps_product() {
        let html = r#"
            <div class="card">
                <span class="name">Widget</span>
                <span class="price">$10.00</span>
                <span class="reviews">Bought by 12,345,678,901,234,567,890,123 people</span>
                <img src="/w.jpg">
            </div>
        "#;
        let products = extract_static(html, &SITE_A).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Widget");
        assert_eq!(products[0].reviews, u64::MAX);
    }

    #[test]
    fn test_filter_invariant_holds() {
        let html = r#"
            <div class="card"><span class="name"> </span><span class="price">$1</span><img src="/1.jpg"></div>
            <div class="card"><span class="name">A</span><span class="price">$0</span><img src="/2.jpg"></div>
            <div class="card"><span class="name">B</span><span class="price">$3</span><img></div>
            <div class="card"><span class="name">C</span><span class="price">$4</span><img src="/4.jpg"></div>
        "#;
        let products = extract_static(html, &SITE_A).unwrap();
        assert_eq!(products.len(), 1);
        for product in &products {
            assert_ne!(product.name, PLACEHOLDER);
            assert!(product.price > 0.0);
            assert_ne!(product.image_url, PLACEHOLDER);
        }
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let adapter = AdapterConfig {
            selectors: SelectorSet {
                container: "div[[",
                ..SITE_A.selectors
            },
            ..SITE_A
        };
        let err = extract_static("<div></div>", &adapter).unwrap_err();
        assert!(matches!(err, ScrapeError::Selector(_)));
    }

    #[test]
    fn test_keep_valid_drops_failed_captures() {
        let listings = vec![
            Err(ScrapeError::Extraction("boom".into())),
            Ok(RawListing {
                name: Some("Ok".into()),
                price: Some("9.99".into()),
                image: Some("/ok.png".into()),
                ..Default::default()
            }),
        ];
        let products = keep_valid(listings, &SITE_A);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, 9.99);
    }
}

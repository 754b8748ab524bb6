//! Amazon India search results.

use crate::adapter::{AdapterConfig, SelectorSet, SpaceEncoding};
use crate::normalize::CountFormat;

/// Amazon-style listing: server-rendered cards, prices split into
/// whole/fraction spans and ratings written as "4.3 out of 5 stars".
pub const AMAZON: AdapterConfig = AdapterConfig {
    name: "Amazon",
    search_url: "https://www.amazon.in/s?k=",
    space_encoding: SpaceEncoding::Plus,
    selectors: SelectorSet {
        container: ".s-result-item",
        name: "h2 span",
        price: ".a-price-whole",
        rating: Some(".a-icon-alt"),
        reviews: Some(".a-size-small .a-link-normal"),
        image: "img.s-image",
        image_attr: "src",
    },
    reviews_format: CountFormat::AllDigits,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_static;

    #[test]
    fn test_amazon_search_url() {
        assert_eq!(
            AMAZON.build_search_url("Samsung Galaxy F14 5G").unwrap(),
            "https://www.amazon.in/s?k=Samsung+Galaxy+F14+5G"
        );
    }

    #[test]
    fn test_amazon_result_card() {
        let html = r#"
            <div class="s-main-slot">
                <div class="s-result-item" data-asin="B0C1">
                    <img class="s-image" src="https://m.media-amazon.com/images/I/61.jpg">
                    <h2><a href="/dp/B0C1"><span>Samsung Galaxy F14 5G (GOAT Green, 128 GB)</span></a></h2>
                    <span class="a-icon-alt">4.1 out of 5 stars</span>
                    <div class="a-size-small"><a class="a-link-normal" href="/dp/B0C1#reviews">2,317</a></div>
                    <span class="a-price"><span class="a-price-symbol">₹</span><span class="a-price-whole">12,490.</span></span>
                </div>
                <div class="s-result-item s-widget">
                    <h2><span>Related searches</span></h2>
                </div>
            </div>
        "#;
        let products = extract_static(html, &AMAZON).unwrap();
        assert_eq!(products.len(), 1);
        let phone = &products[0];
        assert_eq!(phone.name, "Samsung Galaxy F14 5G (GOAT Green, 128 GB)");
        assert_eq!(phone.price, 12490.0);
        assert_eq!(phone.rating, 4.1);
        assert_eq!(phone.reviews, 2317);
        assert_eq!(phone.image_url, "https://m.media-amazon.com/images/I/61.jpg");
    }
}

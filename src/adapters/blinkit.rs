//! Blinkit search results.

use crate::adapter::{AdapterConfig, SelectorSet, SpaceEncoding};
use crate::normalize::CountFormat;

/// Blinkit-style grocery listing. Utility-class markup, no ratings or
/// review counts, and `%20` for spaces in the query string.
pub const BLINKIT: AdapterConfig = AdapterConfig {
    name: "Blinkit",
    search_url: "https://blinkit.com/s/?q=",
    space_encoding: SpaceEncoding::Percent,
    selectors: SelectorSet {
        container: ".tw-relative.tw-flex.tw-h-full.tw-flex-col.tw-items-start",
        name: ".tw-text-300.tw-font-semibold.tw-line-clamp-2",
        price: ".tw-text-200.tw-font-semibold",
        rating: None,
        reviews: None,
        image: ".tw-h-full.tw-w-full.tw-transition-opacity.tw-opacity-100",
        image_attr: "src",
    },
    reviews_format: CountFormat::AllDigits,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_static;

    #[test]
    fn test_blinkit_search_url_uses_percent() {
        assert_eq!(
            BLINKIT.build_search_url("amul butter 500g").unwrap(),
            "https://blinkit.com/s/?q=amul%20butter%20500g"
        );
    }

    #[test]
    fn test_blinkit_card_without_ratings() {
        let html = r#"
            <div class="tw-relative tw-flex tw-h-full tw-flex-col tw-items-start">
                <img class="tw-h-full tw-w-full tw-transition-opacity tw-opacity-100"
                     src="https://cdn.grofers.com/app/images/products/butter.png">
                <div class="tw-text-300 tw-font-semibold tw-line-clamp-2">Amul Salted Butter</div>
                <div class="tw-text-200 tw-font-semibold">₹285</div>
            </div>
        "#;
        let products = extract_static(html, &BLINKIT).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Amul Salted Butter");
        assert_eq!(products[0].price, 285.0);
        assert_eq!(products[0].rating, 0.0);
        assert_eq!(products[0].reviews, 0);
    }
}

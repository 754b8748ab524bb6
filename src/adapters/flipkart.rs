//! Flipkart search results.

use crate::adapter::{AdapterConfig, SelectorSet, SpaceEncoding};
use crate::normalize::CountFormat;

/// Flipkart-style listing. Cards are usually client-rendered, so this
/// adapter tends to fall through to the dynamic extractor.
pub const FLIPKART: AdapterConfig = AdapterConfig {
    name: "Flipkart",
    search_url: "https://www.flipkart.com/search?q=",
    space_encoding: SpaceEncoding::Plus,
    selectors: SelectorSet {
        container: ".cPHDOP.col-12-12",
        name: ".KzDlHZ",
        price: ".Nx9bqj._4b5DiR",
        rating: Some(".XQDdHH"),
        reviews: Some(".Wphh3N"),
        image: ".DByuf4",
        image_attr: "src",
    },
    reviews_format: CountFormat::FirstNumber,
};

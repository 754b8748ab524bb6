//! Product records and the validity filter.

use serde::{Deserialize, Serialize};

use crate::normalize::{self, CountFormat, PLACEHOLDER};

/// A single product listing extracted from a search-result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product title.
    pub name: String,
    /// Listed price, always positive.
    pub price: f64,
    /// Star rating in `0.0..=5.0`, `0.0` when absent.
    pub rating: f64,
    /// Number of reviews or ratings, `0` when absent.
    pub reviews: u64,
    /// Product image URL, absolute or relative to the site.
    pub image_url: String,
}

impl Product {
    /// Returns `true` when the record passes the validity filter.
    pub fn is_valid(&self) -> bool {
        self.name != PLACEHOLDER
            && !self.name.is_empty()
            && self.price > 0.0
            && self.image_url != PLACEHOLDER
            && !self.image_url.is_empty()
    }
}

/// Raw, un-normalized field text captured for one listing container.
///
/// Both extractors produce this shape so that normalization and filtering
/// happen in one place. `None` means the sub-node was missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawListing {
    pub name: Option<String>,
    pub price: Option<String>,
    pub rating: Option<String>,
    pub reviews: Option<String>,
    pub image: Option<String>,
}

impl RawListing {
    /// Normalizes every field, substituting sentinels for missing ones.
    ///
    /// Rating and review text never make the result invalid; only name,
    /// price and image decide that.
    pub fn normalize(&self, reviews_format: CountFormat) -> Product {
        Product {
            name: normalize::text_or_placeholder(self.name.as_deref()),
            price: normalize::price(self.price.as_deref().unwrap_or_default()),
            rating: normalize::rating(self.rating.as_deref().unwrap_or_default()),
            reviews: normalize::count(self.reviews.as_deref().unwrap_or_default(), reviews_format),
            image_url: normalize::text_or_placeholder(self.image.as_deref()),
        }
    }
}

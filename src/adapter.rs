//! Site adapter records and site keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::normalize::CountFormat;
use crate::{adapters, Result, ScrapeError};

/// Identifies one configured target site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKey {
    Amazon,
    Flipkart,
    Blinkit,
}

impl SiteKey {
    /// All configured sites.
    pub const ALL: [SiteKey; 3] = [SiteKey::Amazon, SiteKey::Flipkart, SiteKey::Blinkit];

    /// Returns the adapter bound to this site.
    pub fn adapter(self) -> &'static AdapterConfig {
        match self {
            SiteKey::Amazon => &adapters::AMAZON,
            SiteKey::Flipkart => &adapters::FLIPKART,
            SiteKey::Blinkit => &adapters::BLINKIT,
        }
    }

    /// Short lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            SiteKey::Amazon => "amazon",
            SiteKey::Flipkart => "flipkart",
            SiteKey::Blinkit => "blinkit",
        }
    }

    /// Human-readable site name.
    pub fn display_name(self) -> &'static str {
        self.adapter().name
    }
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteKey {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self> {
        SiteKey::ALL
            .into_iter()
            .find(|site| site.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScrapeError::UnknownSite(s.to_string()))
    }
}

/// How whitespace in a search term is written into the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceEncoding {
    /// Form-style `+`.
    Plus,
    /// Percent-encoded `%20`.
    Percent,
}

/// CSS selectors locating each field inside one listing container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectorSet {
    /// Matches one node per listing.
    pub container: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    /// `None` when the site shows no ratings in its listing.
    pub rating: Option<&'static str>,
    /// `None` when the site shows no review counts in its listing.
    pub reviews: Option<&'static str>,
    pub image: &'static str,
    /// Attribute on the image node carrying the URL.
    pub image_attr: &'static str,
}

impl SelectorSet {
    /// Iterates over every selector string, container first.
    pub fn all(&self) -> impl Iterator<Item = &'static str> {
        [
            Some(self.container),
            Some(self.name),
            Some(self.price),
            self.rating,
            self.reviews,
            Some(self.image),
        ]
        .into_iter()
        .flatten()
    }
}

/// Binds one target site's quirks to the generic extraction engine.
///
/// Adapters are plain data: selectors, normalization choices and the search
/// URL template. They are immutable and shared freely between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Display name used in logs and failure reports.
    pub name: &'static str,
    /// Search URL prefix; the encoded term is appended.
    pub search_url: &'static str,
    pub space_encoding: SpaceEncoding,
    pub selectors: SelectorSet,
    pub reviews_format: CountFormat,
}

impl AdapterConfig {
    /// Builds the search URL for `term`.
    pub fn build_search_url(&self, term: &str) -> Result<String> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ScrapeError::InvalidQuery(
                "search term cannot be empty".into(),
            ));
        }

        let words: Vec<String> = term
            .split_whitespace()
            .map(|word| urlencoding::encode(word).into_owned())
            .collect();
        let separator = match self.space_encoding {
            SpaceEncoding::Plus => "+",
            SpaceEncoding::Percent => "%20",
        };

        let url = format!("{}{}", self.search_url, words.join(separator));
        Url::parse(&url)?;
        Ok(url)
    }
}

//! Strategy coordination: static first, dynamic only when static comes up empty.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::adapter::AdapterConfig;
use crate::dynamic::{BrowserLauncher, DynamicExtractor};
use crate::extract::extract_static;
use crate::fetcher::PageFetcher;
use crate::fetcher_http::HttpFetcher;
use crate::{Product, Result, ScrapeConfig, SiteKey};

/// Strategy that produced a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Plain HTTP fetch and markup parsing.
    Static,
    /// Rendered in a headless browser.
    Dynamic,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Static => "static",
            Strategy::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one extraction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Adapter display name.
    pub site: String,
    /// Search term actually used.
    pub term: String,
    /// Search URL that was requested.
    pub url: String,
    /// Valid products, in page order.
    pub products: Vec<Product>,
    /// Strategy that yielded the products; `None` when both came up empty.
    pub strategy: Option<Strategy>,
    /// Debugging screenshot from the dynamic attempt, if one was saved.
    pub artifact: Option<PathBuf>,
    /// Total time in milliseconds.
    pub duration_ms: u64,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }
}

/// Runs the static and dynamic strategies for one site and term.
///
/// Holds no per-request state; one instance can serve concurrent requests.
pub struct Scraper {
    config: ScrapeConfig,
    fetcher: Arc<dyn PageFetcher>,
    dynamic: DynamicExtractor,
    dynamic_enabled: bool,
}

impl Scraper {
    /// Creates a scraper with the reqwest fetcher and the default browser.
    ///
    /// Without the `headless` feature the dynamic strategy reports a
    /// launch error whenever it is needed.
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&config)?);
        Self::with_components(config, fetcher, default_launcher())
    }

    /// Creates a scraper from explicit collaborators.
    pub fn with_components(
        config: ScrapeConfig,
        fetcher: Arc<dyn PageFetcher>,
        launcher: Arc<dyn BrowserLauncher>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dynamic: DynamicExtractor::new(launcher, config.clone()),
            config,
            fetcher,
            dynamic_enabled: true,
        })
    }

    /// Enables or disables the dynamic fallback.
    pub fn set_dynamic_enabled(&mut self, enabled: bool) {
        self.dynamic_enabled = enabled;
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Extracts listings for `term` (or the default term) from `site`.
    pub async fn scrape(&self, site: SiteKey, term: Option<&str>) -> Result<Listing> {
        self.scrape_with(site.adapter(), term).await
    }

    /// Extracts listings using an arbitrary adapter.
    pub async fn scrape_with(&self, adapter: &AdapterConfig, term: Option<&str>) -> Result<Listing> {
        let start = Instant::now();
        let term = self.config.search_term(term).to_string();
        let url = adapter.build_search_url(&term)?;

        let mut listing = Listing {
            site: adapter.name.to_string(),
            term,
            url,
            products: Vec::new(),
            strategy: None,
            artifact: None,
            duration_ms: 0,
        };

        let products = self.attempt_static(&listing.url, adapter).await;
        if !products.is_empty() {
            info!("{}: static extraction found {} products", adapter.name, products.len());
            listing.products = products;
            listing.strategy = Some(Strategy::Static);
        } else if self.dynamic_enabled {
            info!("{}: no static products, falling back to headless browser", adapter.name);
            let outcome = self.dynamic.extract(&listing.url, adapter).await?;
            if !outcome.products.is_empty() {
                listing.strategy = Some(Strategy::Dynamic);
            }
            listing.products = outcome.products;
            listing.artifact = outcome.artifact;
        } else {
            debug!("{}: dynamic fallback disabled", adapter.name);
        }

        listing.duration_ms = start.elapsed().as_millis() as u64;
        Ok(listing)
    }

    /// Static attempt; any failure counts as an empty result.
    async fn attempt_static(&self, url: &str, adapter: &AdapterConfig) -> Vec<Product> {
        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("{}: static fetch failed: {}", adapter.name, e);
                return Vec::new();
            }
        };

        extract_static(&html, adapter).unwrap_or_else(|e| {
            warn!("{}: static extraction failed: {}", adapter.name, e);
            Vec::new()
        })
    }
}

#[cfg(feature = "headless")]
fn default_launcher() -> Arc<dyn BrowserLauncher> {
    Arc::new(crate::browser::ChromiumLauncher::new())
}

#[cfg(not(feature = "headless"))]
fn default_launcher() -> Arc<dyn BrowserLauncher> {
    Arc::new(crate::dynamic::UnavailableLauncher)
}

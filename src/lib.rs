//! # shelfscan
//!
//! Product listing extraction for third-party e-commerce search pages.
//!
//! Each request runs two strategies in order:
//!
//! - A lightweight HTTP fetch parsed with CSS selectors (static)
//! - A headless browser render with scroll-triggered lazy loading (dynamic),
//!   only when the static attempt yields no valid products
//!
//! Sites are described by [`AdapterConfig`] records; the extraction engine
//! itself is shared by all of them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use shelfscan::{ScrapeConfig, Scraper, SiteKey};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let scraper = Scraper::new(ScrapeConfig::default())?;
//!     let listing = scraper.scrape(SiteKey::Amazon, Some("usb c charger")).await?;
//!
//!     for product in &listing.products {
//!         println!("{} - {:.2} ({} reviews)", product.name, product.price, product.reviews);
//!     }
//!     Ok(())
//! }
//! ```

mod adapter;
mod config;
mod coordinator;
mod error;
mod extract;
mod fetcher;
mod fetcher_http;
mod product;

pub mod adapters;
pub mod dynamic;
pub mod normalize;

#[cfg(feature = "headless")]
pub mod browser;
#[cfg(feature = "headless")]
pub mod browser_setup;

pub use adapter::{AdapterConfig, SelectorSet, SiteKey, SpaceEncoding};
pub use config::{ScrapeConfig, DEFAULT_USER_AGENT};
pub use coordinator::{Listing, Scraper, Strategy};
pub use dynamic::{BrowserLauncher, BrowserSession, DynamicExtractor, DynamicOutcome};
pub use error::{FailureReport, Result, ScrapeError};
pub use extract::extract_static;
pub use fetcher::PageFetcher;
pub use fetcher_http::HttpFetcher;
pub use product::{Product, RawListing};

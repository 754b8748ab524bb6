//! Error types for the extraction engine.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::SiteKey;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Errors that can occur while extracting listings.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The lightweight HTTP fetch failed (network error or non-2xx status).
    #[error("Failed to fetch {url}: {cause}")]
    Fetch { url: String, cause: String },

    /// The browser could not load the page within its navigation timeout.
    #[error("Navigation to {url} failed: {cause}")]
    Navigation { url: String, cause: String },

    /// The headless browser process could not be started.
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// A single item's field extraction failed.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// An in-page browser operation failed.
    #[error("Browser error: {0}")]
    Browser(String),

    /// An adapter selector could not be compiled.
    #[error("Invalid selector '{0}'")]
    Selector(String),

    /// No adapter is registered for the requested site.
    #[error("Unknown site '{0}'")]
    UnknownSite(String),

    /// The request could not be turned into a search URL.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The engine configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl ScrapeError {
    /// Builds a `Fetch` error for `url`.
    pub fn fetch(url: impl Into<String>, cause: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            cause: cause.to_string(),
        }
    }

    /// Builds a `Navigation` error for `url`.
    pub fn navigation(url: impl Into<String>, cause: impl ToString) -> Self {
        Self::Navigation {
            url: url.into(),
            cause: cause.to_string(),
        }
    }

    /// Returns `true` when the coordinator may fall back to the next strategy.
    ///
    /// Only static-path fetch failures are recoverable; everything raised by
    /// the dynamic path ends the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// Failure body handed to the HTTP collaborator.
///
/// Carries the site name and an optional pointer to a debugging artifact.
/// Internal details such as selectors or raw causes are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl FailureReport {
    /// Creates a report for a request against `site`.
    pub fn for_site(site: SiteKey, artifact: Option<&Path>) -> Self {
        Self {
            error: format!("No data scraped from {}", site.display_name()),
            details: artifact.map(|path| {
                format!("Check server logs or {} for more info", path.display())
            }),
        }
    }
}

//! Engine configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, ScrapeError};

/// Desktop Chrome identity sent by both the HTTP fetcher and the browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Configuration handed to the coordinator at construction.
///
/// Every field has a default, so a partial JSON document is enough to
/// override a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Term used when the caller supplies none.
    pub default_search_term: String,
    /// User-agent for both strategies.
    pub user_agent: String,
    /// Timeout for the static HTTP request.
    pub request_timeout_ms: u64,
    /// Hard limit for browser navigation.
    pub navigation_timeout_ms: u64,
    /// Extra settle time after the load event.
    pub network_idle_ms: u64,
    /// Soft limit for the container selector to appear.
    pub selector_wait_timeout_ms: u64,
    /// Distance of one scroll tick.
    pub scroll_step_px: u32,
    /// Pause between scroll ticks.
    pub scroll_interval_ms: u64,
    /// Upper bound on scroll ticks for pages that keep growing.
    pub max_scroll_ticks: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Run Chrome without a window.
    pub headless: bool,
    /// Chrome executable; auto-detected when unset.
    pub chrome_path: Option<PathBuf>,
    /// Extra Chrome command-line arguments.
    pub launch_args: Vec<String>,
    /// Where dynamic attempts save a debugging screenshot.
    pub debug_artifact_dir: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            default_search_term: "Samsung Galaxy F14 5G".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_ms: 20_000,
            navigation_timeout_ms: 30_000,
            network_idle_ms: 500,
            selector_wait_timeout_ms: 10_000,
            scroll_step_px: 100,
            scroll_interval_ms: 100,
            max_scroll_ticks: 600,
            viewport_width: 1280,
            viewport_height: 800,
            headless: true,
            chrome_path: None,
            launch_args: Vec::new(),
            debug_artifact_dir: None,
        }
    }
}

impl ScrapeConfig {
    /// Loads a configuration from a JSON file and validates it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            ScrapeError::Config(format!("invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would stall or spin the engine.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(ScrapeError::Config(msg.to_string()));

        if self.default_search_term.trim().is_empty() {
            return invalid("default_search_term cannot be empty");
        }
        if self.user_agent.trim().is_empty() {
            return invalid("user_agent cannot be empty");
        }
        if self.request_timeout_ms == 0 || self.navigation_timeout_ms == 0 {
            return invalid("timeouts must be greater than zero");
        }
        if self.scroll_step_px == 0 {
            return invalid("scroll_step_px must be greater than zero");
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return invalid("viewport dimensions must be greater than zero");
        }
        Ok(())
    }

    /// Resolves the term for a request, falling back to the default.
    pub fn search_term<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested.map(str::trim) {
            Some(term) if !term.is_empty() => term,
            _ => self.default_search_term.trim(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    pub fn selector_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.selector_wait_timeout_ms)
    }

    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_interval_ms)
    }
}

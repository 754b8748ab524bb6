//! Dynamic extraction through a script-executing browser.
//!
//! The extractor owns the procedure (navigate, settle, wait for listings,
//! scroll to trigger lazy loading, capture) while the browser itself sits
//! behind [`BrowserLauncher`] and [`BrowserSession`], so the procedure can
//! be driven against a real Chromium or a test double.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::adapter::{AdapterConfig, SelectorSet};
use crate::extract::keep_valid;
use crate::product::{Product, RawListing};
use crate::{Result, ScrapeConfig, ScrapeError};

/// Starts isolated browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Launches a fresh session carrying the configured identity.
    ///
    /// Fails with [`ScrapeError::Launch`] when no browser can be started.
    async fn launch(&self, config: &ScrapeConfig) -> Result<Box<dyn BrowserSession>>;
}

/// One exclusive browser session with a single open page.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Loads `url` and returns once the load event has fired.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Resolves once `css` matches at least one element.
    ///
    /// May poll forever; callers bound it with a timeout.
    async fn wait_for_selector(&self, css: &str) -> Result<()>;

    /// Current scrollable height of the document in CSS pixels.
    async fn scroll_height(&self) -> Result<f64>;

    /// Scrolls the viewport down by `px`.
    async fn scroll_by(&self, px: u32) -> Result<()>;

    /// Evaluates `script` in the page and returns its JSON value.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    /// Saves a full-page screenshot to `path`.
    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// Shuts the session down and releases the browser process.
    async fn close(&mut self) -> Result<()>;
}

/// Launcher used when no browser backend is compiled in.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableLauncher;

#[async_trait]
impl BrowserLauncher for UnavailableLauncher {
    async fn launch(&self, _config: &ScrapeConfig) -> Result<Box<dyn BrowserSession>> {
        Err(ScrapeError::Launch(
            "built without the `headless` feature".to_string(),
        ))
    }
}

/// What one dynamic attempt produced.
#[derive(Debug, Clone, Default)]
pub struct DynamicOutcome {
    pub products: Vec<Product>,
    /// Screenshot saved for debugging, if any.
    pub artifact: Option<PathBuf>,
}

/// Result of one container as captured in the page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CapturedCard {
    Failed { error: String },
    Listing(RawListing),
}

/// Renders pages in a browser and extracts listings from the live DOM.
pub struct DynamicExtractor {
    launcher: Arc<dyn BrowserLauncher>,
    config: ScrapeConfig,
}

impl DynamicExtractor {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: ScrapeConfig) -> Self {
        Self { launcher, config }
    }

    /// Runs one dynamic attempt against `url`.
    ///
    /// The session is closed on every path once it has been launched.
    pub async fn extract(&self, url: &str, adapter: &AdapterConfig) -> Result<DynamicOutcome> {
        let mut session = self.launcher.launch(&self.config).await?;
        debug!("{}: browser session launched", adapter.name);

        let outcome = self.drive(session.as_ref(), url, adapter).await;

        if let Err(e) = session.close().await {
            warn!("{}: failed to close browser session: {}", adapter.name, e);
        }
        outcome
    }

    async fn drive(
        &self,
        session: &dyn BrowserSession,
        url: &str,
        adapter: &AdapterConfig,
    ) -> Result<DynamicOutcome> {
        let limit = self.config.navigation_timeout();
        match timeout(limit, session.navigate(url)).await {
            Ok(Ok(())) => {}
            Ok(Err(e @ ScrapeError::Navigation { .. })) => return Err(e),
            Ok(Err(e)) => return Err(ScrapeError::navigation(url, e)),
            Err(_) => {
                return Err(ScrapeError::navigation(
                    url,
                    format!("timed out after {}ms", limit.as_millis()),
                ));
            }
        }
        sleep(self.config.network_idle()).await;

        let container = adapter.selectors.container;
        let wait = self.config.selector_wait_timeout();
        match timeout(wait, session.wait_for_selector(container)).await {
            Ok(Ok(())) => debug!("{}: listing container present", adapter.name),
            Ok(Err(e)) => warn!("{}: waiting for listings failed: {}", adapter.name, e),
            Err(_) => warn!(
                "{}: listing container not found within {}ms, extracting current DOM",
                adapter.name,
                wait.as_millis()
            ),
        }

        match scroll_to_bottom(
            session,
            self.config.scroll_step_px,
            self.config.scroll_interval(),
            self.config.max_scroll_ticks,
        )
        .await
        {
            Ok(ticks) => debug!("{}: scrolled {} ticks", adapter.name, ticks),
            Err(e) => warn!("{}: scrolling stopped early: {}", adapter.name, e),
        }

        let artifact = self.save_artifact(session, adapter).await;

        let script = capture_script(&adapter.selectors)?;
        let value = session.evaluate(&script).await?;
        let cards: Vec<CapturedCard> = serde_json::from_value(value)
            .map_err(|e| ScrapeError::Browser(format!("unexpected capture result: {}", e)))?;

        let listings = cards.into_iter().map(|card| match card {
            CapturedCard::Listing(raw) => Ok(raw),
            CapturedCard::Failed { error } => Err(ScrapeError::Extraction(error)),
        });
        let products = keep_valid(listings, adapter);
        info!("{}: dynamic extraction found {} products", adapter.name, products.len());

        Ok(DynamicOutcome { products, artifact })
    }

    async fn save_artifact(
        &self,
        session: &dyn BrowserSession,
        adapter: &AdapterConfig,
    ) -> Option<PathBuf> {
        let dir = self.config.debug_artifact_dir.as_ref()?;
        let path = dir.join(format!("{}-debug.png", adapter.name.to_lowercase()));
        match session.screenshot(&path).await {
            Ok(()) => {
                debug!("{}: saved screenshot to {}", adapter.name, path.display());
                Some(path)
            }
            Err(e) => {
                warn!("{}: screenshot failed: {}", adapter.name, e);
                None
            }
        }
    }
}

/// Scrolls down in fixed steps until the distance travelled reaches the
/// document's scroll height, re-reading the height on every tick.
///
/// Always performs at least one tick and never more than `max_ticks`.
/// Returns the number of ticks performed.
pub async fn scroll_to_bottom(
    session: &dyn BrowserSession,
    step_px: u32,
    interval: Duration,
    max_ticks: u32,
) -> Result<u32> {
    let step = step_px.max(1);
    let mut travelled = 0u64;
    let mut ticks = 0u32;

    loop {
        sleep(interval).await;
        let height = session.scroll_height().await?;
        session.scroll_by(step).await?;
        travelled += u64::from(step);
        ticks += 1;

        if travelled as f64 >= height || ticks >= max_ticks {
            return Ok(ticks);
        }
    }
}

/// Builds the in-page script applying `selectors` to every container.
///
/// Each container maps to an object of raw field texts, or to
/// `{ error }` when reading it threw.
pub fn capture_script(selectors: &SelectorSet) -> Result<String> {
    let rules = serde_json::to_string(selectors)
        .map_err(|e| ScrapeError::Browser(format!("cannot encode selectors: {}", e)))?;

    Ok(format!(
        r#"(() => {{
  const rules = {rules};
  const text = (card, css) => {{
    if (!css) return null;
    const node = card.querySelector(css);
    return node ? node.textContent : null;
  }};
  const image = (card) => {{
    const node = card.querySelector(rules.image);
    if (!node) return null;
    if (rules.image_attr === "src" && node.src) return node.src;
    return node.getAttribute(rules.image_attr);
  }};
  return Array.from(document.querySelectorAll(rules.container)).map((card) => {{
    try {{
      return {{
        name: text(card, rules.name),
        price: text(card, rules.price),
        rating: text(card, rules.rating),
        reviews: text(card, rules.reviews),
        image: image(card),
      }};
    }} catch (e) {{
      return {{ error: String(e) }};
    }}
  }});
}})()"#
    ))
}

//! Chromium-backed browser sessions.
//!
//! This module is only available when the `headless` Cargo feature is
//! enabled. Every launch starts a dedicated Chrome process that lives for
//! exactly one dynamic attempt.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::browser_setup::resolve_chrome;
use crate::dynamic::{BrowserLauncher, BrowserSession};
use crate::{Result, ScrapeConfig, ScrapeError};

/// Interval between selector probes while waiting for listings.
const SELECTOR_POLL: Duration = Duration::from_millis(100);

/// Launches one Chrome process per dynamic attempt.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromiumLauncher;

impl ChromiumLauncher {
    pub fn new() -> Self {
        Self
    }

    fn browser_config(config: &ScrapeConfig) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .chrome_executable(resolve_chrome(config)?)
            .window_size(config.viewport_width, config.viewport_height)
            .viewport(Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
                ..Default::default()
            })
            .request_timeout(config.navigation_timeout());

        builder = if config.headless {
            builder.arg("--headless=new")
        } else {
            builder.with_head()
        };

        // --headless=new puts "HeadlessChrome" in the default UA.
        builder = builder
            .arg(format!("--user-agent={}", config.user_agent))
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--mute-audio")
            .arg("--no-first-run");

        for arg in &config.launch_args {
            builder = builder.arg(arg);
        }

        builder
            .build()
            .map_err(|e| ScrapeError::Launch(format!("invalid browser config: {}", e)))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, config: &ScrapeConfig) -> Result<Box<dyn BrowserSession>> {
        let browser_config = Self::browser_config(config)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser CDP handler error: {}", e);
                }
            }
            debug!("Browser CDP handler exited");
        });

        let mut session = ChromiumSession {
            browser,
            page: None,
            events,
        };

        match session.open_page(&config.user_agent).await {
            Ok(()) => Ok(Box::new(session)),
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    warn!("Failed to close browser after launch error: {}", close_err);
                }
                Err(e)
            }
        }
    }
}

/// A Chrome process with one tab.
pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    events: JoinHandle<()>,
}

impl ChromiumSession {
    async fn open_page(&mut self, user_agent: &str) -> Result<()> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::Launch(format!("failed to open tab: {}", e)))?;

        page.set_user_agent(SetUserAgentOverrideParams::new(user_agent))
            .await
            .map_err(|e| ScrapeError::Launch(format!("failed to set user agent: {}", e)))?;

        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| ScrapeError::Browser("session has no open page".to_string()))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page()?
            .goto(url)
            .await
            .map_err(|e| ScrapeError::navigation(url, e))?;
        Ok(())
    }

    async fn wait_for_selector(&self, css: &str) -> Result<()> {
        let page = self.page()?;
        while page.find_element(css).await.is_err() {
            tokio::time::sleep(SELECTOR_POLL).await;
        }
        Ok(())
    }

    async fn scroll_height(&self) -> Result<f64> {
        self.page()?
            .evaluate("document.body ? document.body.scrollHeight : 0")
            .await
            .map_err(|e| ScrapeError::Browser(format!("reading scroll height: {}", e)))?
            .into_value::<f64>()
            .map_err(|e| ScrapeError::Browser(format!("reading scroll height: {}", e)))
    }

    async fn scroll_by(&self, px: u32) -> Result<()> {
        self.page()?
            .evaluate(format!("window.scrollBy(0, {}); true", px))
            .await
            .map_err(|e| ScrapeError::Browser(format!("scrolling: {}", e)))?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        self.page()?
            .evaluate(script)
            .await
            .map_err(|e| ScrapeError::Browser(format!("evaluating script: {}", e)))?
            .into_value::<serde_json::Value>()
            .map_err(|e| ScrapeError::Browser(format!("decoding script result: {}", e)))
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let params = ScreenshotParams::builder().full_page(true).build();
        self.page()?
            .save_screenshot(params, path)
            .await
            .map_err(|e| ScrapeError::Browser(format!("screenshot: {}", e)))?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.page = None;
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| ScrapeError::Browser(format!("closing browser: {}", e)));
        if let Err(e) = self.browser.wait().await {
            warn!("Waiting for browser exit failed: {}", e);
        }
        self.events.abort();
        closed
    }
}

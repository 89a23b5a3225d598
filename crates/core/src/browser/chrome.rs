// ABOUTME: Chrome DevTools implementation of BrowserSession built on chromiumoxide.
// ABOUTME: Launches one browser with one page; the CDP handler runs on a spawned tokio task.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::{
    Bounds, GetWindowForTargetParams, SetWindowBoundsParams, WindowState,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::BrowserSession;
use crate::error::ScrapeError;

/// Script deciding whether the page's tables are rendered and visible.
const TABLES_VISIBLE_JS: &str = r#"
(() => {
    const tables = Array.from(document.querySelectorAll('table'));
    if (tables.length === 0) {
        return false;
    }
    return tables.every((table) => {
        const style = window.getComputedStyle(table);
        if (style.display === 'none' || style.visibility === 'hidden') {
            return false;
        }
        const rect = table.getBoundingClientRect();
        return rect.width > 0 && rect.height > 0;
    });
})()
"#;

/// How to launch Chrome.
#[derive(Debug, Clone)]
pub struct ChromeOptions {
    /// Chrome/Chromium binary; detected automatically when unset.
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub window_size: (u32, u32),
    /// Timeout for individual CDP requests, page loads included.
    pub request_timeout: Duration,
    pub no_sandbox: bool,
}

impl Default for ChromeOptions {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            window_size: (1920, 1080),
            request_timeout: Duration::from_secs(30),
            no_sandbox: false,
        }
    }
}

/// A launched Chrome with a single page.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    closed: bool,
}

impl ChromeSession {
    /// Launch Chrome and open a blank page.
    pub async fn launch(opts: &ChromeOptions) -> Result<Self, ScrapeError> {
        let mut builder = BrowserConfig::builder()
            .window_size(opts.window_size.0, opts.window_size.1)
            .viewport(None)
            .request_timeout(opts.request_timeout);
        if let Some(ref exe) = opts.executable {
            builder = builder.chrome_executable(exe);
        }
        if !opts.headless {
            builder = builder.with_head();
        }
        if opts.no_sandbox {
            builder = builder.no_sandbox();
        }
        let config = builder.build().map_err(|e| {
            ScrapeError::browser("chrome", "Launch", Some(anyhow::anyhow!("config: {}", e)))
        })?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            ScrapeError::browser("chrome", "Launch", Some(anyhow::anyhow!("{}", e)))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler stopped: {}", e);
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(|e| {
            ScrapeError::browser("about:blank", "NewPage", Some(anyhow::anyhow!("{}", e)))
        })?;

        info!(headless = opts.headless, "launched chrome");
        Ok(Self {
            browser,
            page,
            handler,
            closed: false,
        })
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn maximize(&mut self) -> Result<(), ScrapeError> {
        let window = self
            .page
            .execute(GetWindowForTargetParams::default())
            .await
            .map_err(|e| {
                ScrapeError::browser("window", "Maximize", Some(anyhow::anyhow!("{}", e)))
            })?;
        let bounds = Bounds::builder().window_state(WindowState::Maximized).build();
        self.page
            .execute(SetWindowBoundsParams::new(window.result.window_id, bounds))
            .await
            .map_err(|e| {
                ScrapeError::browser("window", "Maximize", Some(anyhow::anyhow!("{}", e)))
            })?;
        Ok(())
    }

    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ScrapeError::browser(url, "Goto", Some(anyhow::anyhow!("{}", e))))?;
        Ok(())
    }

    async fn tables_visible(&mut self) -> Result<bool, ScrapeError> {
        let result = self.page.evaluate(TABLES_VISIBLE_JS).await.map_err(|e| {
            ScrapeError::browser("page", "TablesVisible", Some(anyhow::anyhow!("{}", e)))
        })?;
        result.into_value::<bool>().map_err(|e| {
            ScrapeError::browser("page", "TablesVisible", Some(anyhow::Error::new(e)))
        })
    }

    async fn content(&mut self) -> Result<String, ScrapeError> {
        self.page
            .content()
            .await
            .map_err(|e| ScrapeError::browser("page", "Content", Some(anyhow::anyhow!("{}", e))))
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!("waiting for chrome to exit: {}", e);
        }
        self.handler.abort();
        closed.map_err(|e| ScrapeError::browser("chrome", "Close", Some(anyhow::anyhow!("{}", e))))?;
        info!("closed chrome");
        Ok(())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        // chromiumoxide kills the child process when the Browser drops.
        self.handler.abort();
    }
}

// ABOUTME: Browser session abstraction used by the page navigator and batch driver.
// ABOUTME: ChromeSession drives a real Chrome over CDP; tests supply scripted sessions.

//! Browser sessions.
//!
//! The navigator only needs five things from a browser: maximize the window,
//! load a URL, report whether every table on the page is visible, hand back
//! the rendered DOM, and shut down. [`BrowserSession`] is that surface.

use async_trait::async_trait;

use crate::error::ScrapeError;

pub mod chrome;

pub use chrome::{ChromeOptions, ChromeSession};

/// A single long-lived browser tab reused across navigations.
#[async_trait]
pub trait BrowserSession: Send {
    /// Maximize the browser window.
    async fn maximize(&mut self) -> Result<(), ScrapeError>;

    /// Load `url` in the current tab.
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// True when at least one `table` exists and all of them are visible.
    async fn tables_visible(&mut self) -> Result<bool, ScrapeError>;

    /// Serialized HTML of the rendered DOM.
    async fn content(&mut self) -> Result<String, ScrapeError>;

    /// Release the browser. Calling it more than once is allowed.
    async fn close(&mut self) -> Result<(), ScrapeError>;
}

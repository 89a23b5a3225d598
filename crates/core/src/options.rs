// ABOUTME: Configuration options for the QuickFacts client including Options and ClientBuilder.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::time::Duration;

use crate::client::Client;
use crate::error::ScrapeError;

/// Host serving QuickFacts.
pub const DEFAULT_BASE_URL: &str = "https://www.census.gov";

/// Dataset vintage appended to every table URL.
pub const DEFAULT_VINTAGE: &str = "PST045222";

/// Configuration options for the QuickFacts client.
#[derive(Debug, Clone)]
pub struct Options {
    pub base_url: String,
    pub vintage: String,
    /// Upper bound on waiting for a page's tables to become visible.
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    /// Abort the batch on the first failed county instead of recording it.
    pub fail_fast: bool,
    /// Keep records already in the output document and skip their counties.
    pub resume: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            vintage: DEFAULT_VINTAGE.to_string(),
            wait_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
            fail_fast: false,
            resume: false,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the site root, e.g. `https://www.census.gov`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.opts.base_url = base_url.into();
        self
    }

    /// Set the dataset vintage.
    pub fn vintage(mut self, vintage: impl Into<String>) -> Self {
        self.opts.vintage = vintage.into();
        self
    }

    /// Set the table visibility timeout.
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.opts.wait_timeout = timeout;
        self
    }

    /// Set how often table visibility is checked while waiting.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.opts.poll_interval = interval;
        self
    }

    /// Stop the batch at the first failed county.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.opts.fail_fast = fail_fast;
        self
    }

    /// Resume from an existing output document.
    pub fn resume(mut self, resume: bool) -> Self {
        self.opts.resume = resume;
        self
    }

    /// Build the Client, validating the base URL.
    pub fn build(self) -> Result<Client, ScrapeError> {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let opts = Options::default();
        assert_eq!(opts.base_url, "https://www.census.gov");
        assert_eq!(opts.vintage, "PST045222");
        assert_eq!(opts.wait_timeout, Duration::from_secs(10));
        assert!(!opts.fail_fast);
        assert!(!opts.resume);
    }

    #[test]
    fn builder_sets_fields() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:9000")
            .vintage("V2023")
            .wait_timeout(Duration::from_secs(3))
            .poll_interval(Duration::from_millis(10))
            .fail_fast(true)
            .resume(true)
            .build()
            .unwrap();
        let opts = client.options();
        assert_eq!(opts.base_url, "http://localhost:9000");
        assert_eq!(opts.vintage, "V2023");
        assert_eq!(opts.wait_timeout, Duration::from_secs(3));
        assert_eq!(opts.poll_interval, Duration::from_millis(10));
        assert!(opts.fail_fast);
        assert!(opts.resume);
    }

    #[test]
    fn builder_rejects_bad_base_url() {
        let err = ClientBuilder::new().base_url("census.gov").build().unwrap_err();
        assert!(err.is_input());
    }
}

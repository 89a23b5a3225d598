// ABOUTME: The main Client struct: builds QuickFacts URLs, drives a browser session to them and extracts records.
// ABOUTME: Provides navigate() for live pages and parse_html() for already-rendered HTML.

use scraper::Html;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument};
use url::Url;

use crate::browser::BrowserSession;
use crate::error::ScrapeError;
use crate::location::{county_url, parse_base_url};
use crate::options::{ClientBuilder, Options};
use crate::record::CountyRecord;
use crate::table::{extract_data_tables, tables};

/// Turns (county, state) pairs into CountyRecords.
#[derive(Debug, Clone)]
pub struct Client {
    opts: Options,
    base: Url,
}

impl Client {
    /// Create a ClientBuilder for configuring a new Client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Result<Self, ScrapeError> {
        let base = parse_base_url(&opts.base_url)?;
        Ok(Self { opts, base })
    }

    /// Options this client was built with.
    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// The QuickFacts table URL for a county.
    pub fn county_url(&self, county: &str, state: &str) -> Result<String, ScrapeError> {
        county_url(&self.base, &self.opts.vintage, county, state)
    }

    /// Load the county's page in `session` and extract its record.
    ///
    /// Waits up to the configured timeout for every table to be visible;
    /// expiry is a Timeout error and nothing from the page is kept.
    #[instrument(skip(self, session), fields(url = tracing::field::Empty))]
    pub async fn navigate<S>(
        &self,
        session: &mut S,
        county: &str,
        state: &str,
    ) -> Result<CountyRecord, ScrapeError>
    where
        S: BrowserSession + ?Sized,
    {
        let url = self.county_url(county, state)?;
        tracing::Span::current().record("url", url.as_str());

        session.goto(&url).await?;
        self.wait_for_tables(session, &url).await?;
        let html = session.content().await?;

        let record = self.record_from_html(&html, county, state, url);
        info!(
            blocks = record.data.len(),
            fields = record.field_count(),
            "extracted county"
        );
        Ok(record)
    }

    /// Extract a record from HTML that was rendered elsewhere (e.g. a saved page).
    pub fn parse_html(
        &self,
        html: &str,
        county: &str,
        state: &str,
    ) -> Result<CountyRecord, ScrapeError> {
        let url = self.county_url(county, state)?;
        Ok(self.record_from_html(html, county, state, url))
    }

    fn record_from_html(&self, html: &str, county: &str, state: &str, url: String) -> CountyRecord {
        let doc = Html::parse_document(html);
        debug!(tables = tables(&doc).len(), "parsed page");
        CountyRecord {
            state: state.to_string(),
            county: county.to_string(),
            result_url: url,
            data: extract_data_tables(&doc),
        }
    }

    async fn wait_for_tables<S>(&self, session: &mut S, url: &str) -> Result<(), ScrapeError>
    where
        S: BrowserSession + ?Sized,
    {
        let poll = self.opts.poll_interval;
        let mut last_error = None;
        let waited = timeout(self.opts.wait_timeout, async {
            loop {
                match session.tables_visible().await {
                    Ok(true) => return,
                    Ok(false) => {}
                    // The page may be mid-render; a failed check counts as "not yet".
                    Err(e) => {
                        debug!("visibility check failed: {}", e);
                        last_error = Some(e);
                    }
                }
                sleep(poll).await;
            }
        })
        .await;

        if waited.is_ok() {
            return Ok(());
        }
        let expired = format!("no visible tables after {:?}", self.opts.wait_timeout);
        let source = match last_error {
            Some(e) => anyhow::Error::new(e).context(expired),
            None => anyhow::anyhow!(expired),
        };
        Err(ScrapeError::timeout(url, "WaitForTables", Some(source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    /// Serves one HTML page; tables become visible after `ready_after` polls.
    struct OnePage {
        html: String,
        ready_after: Option<usize>,
        /// Number of initial polls that fail instead of answering.
        failing_polls: usize,
        polls: usize,
        visited: Vec<String>,
    }

    impl OnePage {
        fn new(html: &str, ready_after: Option<usize>) -> Self {
            Self {
                html: html.to_string(),
                ready_after,
                failing_polls: 0,
                polls: 0,
                visited: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl BrowserSession for OnePage {
        async fn maximize(&mut self) -> Result<(), ScrapeError> {
            Ok(())
        }

        async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
            self.visited.push(url.to_string());
            Ok(())
        }

        async fn tables_visible(&mut self) -> Result<bool, ScrapeError> {
            self.polls += 1;
            if self.polls <= self.failing_polls {
                return Err(ScrapeError::browser(
                    "page",
                    "TablesVisible",
                    Some(anyhow::anyhow!("Execution context was destroyed")),
                ));
            }
            Ok(self.ready_after.is_some_and(|n| self.polls > n))
        }

        async fn content(&mut self) -> Result<String, ScrapeError> {
            Ok(self.html.clone())
        }

        async fn close(&mut self) -> Result<(), ScrapeError> {
            Ok(())
        }
    }

    const PAGE: &str = r#"<html><body>
        <table><tbody><tr><th>Nav</th></tr><tr><td>x</td><td>y</td></tr></tbody></table>
        <table><tbody>
            <tr><th>Population</th></tr>
            <tr><td>2020</td><td><span>🧑</span><br>1,147,532</td></tr>
        </tbody></table>
    </body></html>"#;

    fn quick_client() -> Client {
        Client::builder()
            .wait_timeout(Duration::from_millis(200))
            .poll_interval(Duration::from_millis(5))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn navigate_builds_record() {
        let client = quick_client();
        let mut session = OnePage::new(PAGE, Some(2));

        let record = client.navigate(&mut session, "fairfax", "va").await.unwrap();

        assert_eq!(
            session.visited,
            vec!["https://www.census.gov/quickfacts/fact/table/fairfaxcountyva/PST045222"]
        );
        assert_eq!(record.state, "va");
        assert_eq!(record.county, "fairfax");
        assert_eq!(record.result_url, session.visited[0]);
        assert_eq!(record.data.len(), 1);
        assert_eq!(
            record.block("Population").and_then(|b| b.get("2020")),
            Some("1,147,532")
        );
    }

    #[tokio::test]
    async fn navigate_times_out_when_tables_never_show() {
        let client = quick_client();
        let mut session = OnePage::new(PAGE, None);

        let err = client.navigate(&mut session, "fairfax", "va").await.unwrap_err();

        assert!(err.is_timeout());
        assert!(err.target.ends_with("fairfaxcountyva/PST045222"));
        assert!(session.polls > 1);
    }

    #[tokio::test]
    async fn failed_visibility_check_keeps_polling() {
        let client = quick_client();
        let mut session = OnePage::new(PAGE, Some(1));
        session.failing_polls = 1;

        let record = client.navigate(&mut session, "fairfax", "va").await.unwrap();

        assert_eq!(session.polls, 2);
        assert_eq!(record.field_count(), 1);
    }

    #[tokio::test]
    async fn timeout_carries_last_visibility_error() {
        let client = quick_client();
        let mut session = OnePage::new(PAGE, None);
        session.failing_polls = usize::MAX;

        let err = client.navigate(&mut session, "fairfax", "va").await.unwrap_err();

        assert!(err.is_timeout());
        let chain = format!("{:#}", err.source.unwrap());
        assert!(chain.contains("no visible tables after"));
        assert!(chain.contains("Execution context was destroyed"));
    }

    #[tokio::test]
    async fn invalid_identifier_never_navigates() {
        let client = quick_client();
        let mut session = OnePage::new(PAGE, Some(0));

        let err = client.navigate(&mut session, "doña ana", "nm").await.unwrap_err();

        assert!(err.is_invalid_identifier());
        assert!(session.visited.is_empty());
    }

    #[test]
    fn parse_html_matches_navigate_output() {
        let client = quick_client();
        let record = client.parse_html(PAGE, "fairfax", "va").unwrap();
        assert_eq!(
            record.result_url,
            "https://www.census.gov/quickfacts/fact/table/fairfaxcountyva/PST045222"
        );
        assert_eq!(record.field_count(), 1);
    }

    #[test]
    fn page_without_tables_gives_empty_record() {
        let client = quick_client();
        let record = client
            .parse_html("<html><body><p>nothing</p></body></html>", "travis", "tx")
            .unwrap();
        assert!(record.is_empty());
    }
}

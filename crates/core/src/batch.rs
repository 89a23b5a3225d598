// ABOUTME: Batch driver: reads the input sheet, navigates every county in order and keeps the output document current.
// ABOUTME: Failures are isolated per county and summarized in a BatchReport; the browser session is always closed.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::browser::BrowserSession;
use crate::client::Client;
use crate::error::ScrapeError;
use crate::input::{dedup_pairs, read_identifier_pairs, IdentifierPair};
use crate::output::{read_document, write_document};
use crate::record::CountyRecord;

/// A county that could not be scraped.
#[derive(Debug)]
pub struct FailedPair {
    pub state: String,
    pub county: String,
    /// None when the names cannot form a QuickFacts URL.
    pub result_url: Option<String>,
    pub error: ScrapeError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Unique pairs in the input.
    pub total: usize,
    /// Pairs skipped because the output already had them (resume).
    pub skipped: usize,
    /// The document as written to disk, in order.
    pub records: Vec<CountyRecord>,
    pub failures: Vec<FailedPair>,
}

impl BatchReport {
    /// Returns true if no county failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of counties scraped in this run.
    pub fn scraped(&self) -> usize {
        self.total - self.skipped - self.failures.len()
    }
}

impl Client {
    /// Scrape every county listed in `input` and write the document to `output`.
    ///
    /// The input is read before `launch` is called, so a bad sheet never
    /// starts a browser. The session returned by `launch` is closed on every
    /// path out of the batch.
    #[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    pub async fn run<S, F, Fut>(
        &self,
        input: &Path,
        output: &Path,
        launch: F,
    ) -> Result<BatchReport, ScrapeError>
    where
        S: BrowserSession,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<S, ScrapeError>>,
    {
        let pairs = dedup_pairs(read_identifier_pairs(input)?);
        info!(pairs = pairs.len(), "read input");

        let mut session = launch().await?;
        let outcome = self.run_pairs(&mut session, &pairs, output).await;
        if let Err(e) = session.close().await {
            warn!("closing browser session: {}", e);
        }
        outcome
    }

    /// Scrape `pairs` in order with an already-open session.
    ///
    /// The document is rewritten after each scraped county, so an
    /// interrupted run keeps everything finished so far.
    pub async fn run_pairs<S>(
        &self,
        session: &mut S,
        pairs: &[IdentifierPair],
        output: &Path,
    ) -> Result<BatchReport, ScrapeError>
    where
        S: BrowserSession + ?Sized,
    {
        let mut report = BatchReport {
            total: pairs.len(),
            ..Default::default()
        };

        let mut cached: HashMap<(String, String), CountyRecord> = HashMap::new();
        if self.options().resume && output.exists() {
            let existing = read_document(output)?;
            info!(records = existing.len(), "resuming from existing output");
            for record in existing {
                cached
                    .entry((record.state.clone(), record.county.clone()))
                    .or_insert(record);
            }
        }

        // One slot per input pair; the document is the filled slots in input order.
        let mut slots: Vec<Option<CountyRecord>> = pairs
            .iter()
            .map(|pair| {
                let IdentifierPair { state, county } = pair.lowercased();
                cached.remove(&(state, county))
            })
            .collect();
        if !cached.is_empty() {
            warn!(
                dropped = cached.len(),
                "existing output has counties not in the input; dropping them"
            );
        }

        if let Err(e) = session.maximize().await {
            warn!("could not maximize browser window: {}", e);
        }

        for (i, pair) in pairs.iter().enumerate() {
            let IdentifierPair { state, county } = pair.lowercased();
            if slots[i].is_some() {
                debug!(%state, %county, "already in output, skipping");
                report.skipped += 1;
                continue;
            }

            match self.navigate(session, &county, &state).await {
                Ok(record) => {
                    slots[i] = Some(record);
                    write_document(output, &filled(&slots))?;
                }
                Err(error) if self.options().fail_fast || error.is_fatal() => {
                    warn!(%state, %county, "aborting batch: {}", error);
                    return Err(error);
                }
                Err(error) => {
                    warn!(%state, %county, "county failed: {}", error);
                    report.failures.push(FailedPair {
                        result_url: self.county_url(&county, &state).ok(),
                        state,
                        county,
                        error,
                    });
                }
            }
        }

        report.records = slots.into_iter().flatten().collect();
        write_document(output, &report.records)?;
        info!(
            total = report.total,
            scraped = report.scraped(),
            skipped = report.skipped,
            failed = report.failures.len(),
            "batch finished"
        );
        Ok(report)
    }
}

fn filled(slots: &[Option<CountyRecord>]) -> Vec<CountyRecord> {
    slots.iter().flatten().cloned().collect()
}

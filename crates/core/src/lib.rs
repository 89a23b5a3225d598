// ABOUTME: Main library entry point for the QuickFacts county scraper.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, BrowserSession, records, BatchReport, ScrapeError.

//! QuickFacts - county statistics from the U.S. Census Bureau QuickFacts tables.
//!
//! This crate drives a browser to each county's QuickFacts page, waits for
//! the tables to render, and turns every headed table body into a
//! parameter block of label/value fields.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use quickfacts_core::{ChromeOptions, ChromeSession, Client, ScrapeError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ScrapeError> {
//!     let client = Client::builder().build()?;
//!     let chrome = ChromeOptions::default();
//!     let report = client
//!         .run(
//!             Path::new("census_geo_sheet.csv"),
//!             Path::new("census_results.json"),
//!             || ChromeSession::launch(&chrome),
//!         )
//!         .await?;
//!     println!("{} counties scraped", report.records.len());
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod browser;
pub mod client;
pub mod error;
pub mod input;
pub mod location;
pub mod options;
pub mod output;
pub mod record;
pub mod table;
pub mod text;

pub use crate::batch::{BatchReport, FailedPair};
pub use crate::browser::{BrowserSession, ChromeOptions, ChromeSession};
pub use crate::client::Client;
pub use crate::error::{ErrorCode, ScrapeError};
pub use crate::input::{dedup_pairs, read_identifier_pairs, IdentifierPair};
pub use crate::options::{ClientBuilder, Options, DEFAULT_BASE_URL, DEFAULT_VINTAGE};
pub use crate::output::{read_document, to_pretty_json, write_document};
pub use crate::record::{CountyRecord, FieldEntry, ParameterBlock};
pub use crate::table::{extract_data_tables, extract_table};
pub use crate::text::{normalize, rendered_text};

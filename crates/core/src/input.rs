// ABOUTME: Reads (state, county) identifier pairs from a CSV sheet.
// ABOUTME: Only the first two columns are used; duplicate rows are dropped keeping first occurrence.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::ScrapeError;

/// One input row: the place to scrape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierPair {
    pub state: String,
    pub county: String,
}

impl IdentifierPair {
    pub fn new(state: impl Into<String>, county: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            county: county.into(),
        }
    }

    /// Both names lowercased, as used for navigation and in records.
    pub fn lowercased(&self) -> IdentifierPair {
        IdentifierPair {
            state: self.state.to_lowercase(),
            county: self.county.to_lowercase(),
        }
    }
}

/// Read identifier pairs from a CSV file with a header row.
pub fn read_identifier_pairs(path: &Path) -> Result<Vec<IdentifierPair>, ScrapeError> {
    let source = path.display().to_string();
    let file = File::open(path)
        .map_err(|e| ScrapeError::input(&source, "ReadInput", Some(anyhow::Error::new(e))))?;
    parse_identifier_pairs(file, &source)
}

/// Parse identifier pairs from CSV text: column 0 is the state, column 1 the county.
///
/// The first row is a header. Fields are trimmed; a row missing either
/// column, or with an empty state or county, is an input error.
pub fn parse_identifier_pairs<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<IdentifierPair>, ScrapeError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| ScrapeError::input(source, "ReadInput", Some(anyhow::Error::new(e))))?;
    if headers.len() < 2 {
        return Err(ScrapeError::input(
            source,
            "ReadInput",
            Some(anyhow::anyhow!(
                "expected at least two columns, header has {}",
                headers.len()
            )),
        ));
    }

    let mut pairs = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        // Line numbers are 1-based and the header is line 1.
        let line = idx + 2;
        let record = record
            .map_err(|e| ScrapeError::input(source, "ReadInput", Some(anyhow::Error::new(e))))?;

        let (state, county) = match (record.get(0), record.get(1)) {
            (Some(state), Some(county)) => (state, county),
            _ => {
                return Err(ScrapeError::input(
                    source,
                    "ReadInput",
                    Some(anyhow::anyhow!("line {}: expected two columns", line)),
                ))
            }
        };
        if state.is_empty() || county.is_empty() {
            return Err(ScrapeError::input(
                source,
                "ReadInput",
                Some(anyhow::anyhow!("line {}: empty state or county", line)),
            ));
        }
        pairs.push(IdentifierPair::new(state, county));
    }

    Ok(pairs)
}

/// Drop exact duplicate pairs, keeping the first occurrence and input order.
pub fn dedup_pairs(pairs: Vec<IdentifierPair>) -> Vec<IdentifierPair> {
    let mut seen = HashSet::new();
    pairs
        .into_iter()
        .filter(|pair| seen.insert(pair.clone()))
        .collect()
}

// ABOUTME: Reads and writes the result document (a JSON list of CountyRecord).
// ABOUTME: Writes go to a sibling temp file and are renamed into place so readers never see a partial file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::ScrapeError;
use crate::record::CountyRecord;

/// Serialize a value as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Replace the document at `path` with `records`.
pub fn write_document(path: &Path, records: &[CountyRecord]) -> Result<(), ScrapeError> {
    let target = path.display().to_string();
    let bytes = to_pretty_json(records)
        .map_err(|e| ScrapeError::output(&target, "WriteDocument", Some(anyhow::Error::new(e))))?;

    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, &bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(ScrapeError::output(
            &target,
            "WriteDocument",
            Some(anyhow::Error::new(e)),
        ));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(ScrapeError::output(
            &target,
            "WriteDocument",
            Some(anyhow::Error::new(e)),
        ));
    }
    Ok(())
}

/// Load a document previously written by [`write_document`].
pub fn read_document(path: &Path) -> Result<Vec<CountyRecord>, ScrapeError> {
    let target = path.display().to_string();
    let text = fs::read_to_string(path)
        .map_err(|e| ScrapeError::input(&target, "ReadDocument", Some(anyhow::Error::new(e))))?;
    serde_json::from_str(&text)
        .map_err(|e| ScrapeError::input(&target, "ReadDocument", Some(anyhow::Error::new(e))))
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results.json".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

//! File exports for the selected tab's payloads
//!
//! Exports never reshape content: the raw and JDBC payloads are
//! pretty-printed JSON, the CSV payload is passed through byte for byte.

use mime::Mime;
use thiserror::Error;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// The stored payload is not the JSON the engine promised
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A downloadable artifact: exact bytes plus naming metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: String,
    pub content_type: Mime,
    pub bytes: Vec<u8>,
}

/// Export the selected tab's raw JSON payload as `<tab>.json`.
pub fn export_json(tab_name: &str, raw: &str) -> Result<Download, ExportError> {
    pretty_json(tab_name, raw)
}

/// Export the selected tab's JDBC-shaped payload as `<tab>.json`.
pub fn export_jdbc(tab_name: &str, raw: &str) -> Result<Download, ExportError> {
    pretty_json(tab_name, raw)
}

fn pretty_json(tab_name: &str, raw: &str) -> Result<Download, ExportError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let pretty = serde_json::to_string_pretty(&value)?;
    Ok(Download {
        file_name: format!("{}.json", tab_name),
        content_type: mime::APPLICATION_JSON,
        bytes: pretty.into_bytes(),
    })
}

/// Export the selected tab's CSV payload verbatim as `<tab>.csv`.
pub fn export_csv(tab_name: &str, raw: &str) -> Download {
    Download {
        file_name: format!("{}.csv", tab_name),
        content_type: mime::TEXT_CSV,
        bytes: raw.as_bytes().to_vec(),
    }
}

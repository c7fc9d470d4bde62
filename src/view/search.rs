//! Search seam over the full record set
//!
//! Matching is a collaborator concern: the host application may plug in a
//! structured query engine. The default implementation is a plain
//! free-text match over scalar cells.

use serde_json::Value;

use crate::normalize::Record;

/// Collaborator interface for matching records against a search query.
pub trait RecordFilter {
    /// Return the records matching `query`, preserving input order.
    fn filter(&self, query: &str, records: &[Record]) -> Vec<Record>;
}

/// Case-insensitive substring match over scalar cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeTextFilter;

impl RecordFilter for FreeTextFilter {
    fn filter(&self, query: &str, records: &[Record]) -> Vec<Record> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return records.to_vec();
        }
        records
            .iter()
            .filter(|record| {
                record.values().any(|value| {
                    scalar_text(value).map_or(false, |text| text.to_lowercase().contains(&needle))
                })
            })
            .cloned()
            .collect()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

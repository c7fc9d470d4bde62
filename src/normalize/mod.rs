//! Normalizing raw engine payloads into tabular results
//!
//! Whatever shape the engine answers with, the result view renders one
//! uniform structure: ordered column names plus records keyed by column.
//! Records always carry a synthetic `id` column used as the row key.

pub mod shape;

use indexmap::IndexMap;
use serde_json::Value;

use crate::response::ResponseDetail;
pub use shape::{ResponseShape, SchemaColumn, TabularKind};

/// One result row: field name to value, in column order.
pub type Record = IndexMap<String, Value>;

/// Synthetic row-key column present in every normalized result.
pub const ID_FIELD: &str = "id";

const SUCCESS_MESSAGE: &str = "Success";
const TABLE_NAME_FIELD: &str = "TABLE_NAME";

/// Uniform tabular view of one statement's result.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Ordered column names, starting with the synthetic `id`.
    pub fields: Vec<String>,
    pub records: Vec<Record>,
    /// Status line shown in the Messages tab.
    pub message: String,
}

/// Normalize one statement's raw outcome into a tabular result.
///
/// Rejected outcomes propagate untouched. A fulfilled payload that is not
/// valid JSON rejects with the parse error instead of poisoning the whole
/// result view.
pub fn normalize(detail: &ResponseDetail<String>) -> ResponseDetail<QueryResult> {
    let body = match detail {
        ResponseDetail::Rejected { error } => return ResponseDetail::rejected(error.clone()),
        ResponseDetail::Fulfilled(body) => body,
    };

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => return ResponseDetail::rejected(format!("invalid response body: {}", err)),
    };

    ResponseDetail::Fulfilled(normalize_value(&value))
}

fn normalize_value(body: &Value) -> QueryResult {
    match shape::sniff(body) {
        ResponseShape::Tabular { kind, schema, datarows } => from_tabular(kind, &schema, &datarows),
        ResponseShape::Aggregation(aggregations) => from_aggregations(&aggregations),
        ResponseShape::Hits(hits) => from_hits(&hits),
    }
}

/// `schema` + `datarows`: values are positional by definition, so each
/// datarow cell is bound to the schema column at the same index.
fn from_tabular(kind: TabularKind, schema: &[SchemaColumn], datarows: &[Value]) -> QueryResult {
    // SHOW surfaces only the table name; fall back to the generic layout
    // when the schema carries no TABLE_NAME column.
    if kind == TabularKind::Show {
        if let Some(position) = schema.iter().position(|column| column.name == TABLE_NAME_FIELD) {
            let fields = vec![ID_FIELD.to_string(), TABLE_NAME_FIELD.to_string()];
            let records = datarows
                .iter()
                .enumerate()
                .map(|(index, row)| {
                    let mut record = Record::new();
                    record.insert(ID_FIELD.to_string(), Value::String(index.to_string()));
                    record.insert(TABLE_NAME_FIELD.to_string(), cell(row, position));
                    record
                })
                .collect();
            return QueryResult { fields, records, message: SUCCESS_MESSAGE.to_string() };
        }
    }

    let mut fields = vec![ID_FIELD.to_string()];
    fields.extend(schema.iter().map(|column| column.name.clone()));

    let records = datarows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let mut record = Record::new();
            record.insert(ID_FIELD.to_string(), Value::String(index.to_string()));
            for (position, column) in schema.iter().enumerate() {
                record.insert(column.name.clone(), cell(row, position));
            }
            record
        })
        .collect();

    QueryResult { fields, records, message: SUCCESS_MESSAGE.to_string() }
}

fn cell(row: &Value, position: usize) -> Value {
    row.get(position).cloned().unwrap_or(Value::Null)
}

/// Aggregations collapse into exactly one record with `id = "value"` and
/// one column per aggregation key.
fn from_aggregations(aggregations: &serde_json::Map<String, Value>) -> QueryResult {
    let mut fields = vec![ID_FIELD.to_string()];
    let mut record = Record::new();
    record.insert(ID_FIELD.to_string(), Value::String("value".to_string()));

    for (name, aggregation) in aggregations {
        fields.push(name.clone());
        record.insert(name.clone(), aggregation.get("value").cloned().unwrap_or(Value::Null));
    }

    QueryResult {
        fields,
        records: vec![record],
        message: SUCCESS_MESSAGE.to_string(),
    }
}

/// Document hits: columns come from the first hit's `_source` keys and
/// values are looked up by key for every hit, so a hit with a divergent
/// key order still lands in the right columns.
fn from_hits(hits: &[Value]) -> QueryResult {
    let mut fields = vec![ID_FIELD.to_string()];
    if let Some(first) = hits.first().and_then(|hit| hit.get("_source")).and_then(Value::as_object) {
        fields.extend(first.keys().cloned());
    }

    let records = hits
        .iter()
        .enumerate()
        .map(|(index, hit)| {
            let mut record = Record::new();
            record.insert(ID_FIELD.to_string(), Value::String(index.to_string()));
            let source = hit.get("_source").and_then(Value::as_object);
            for field in fields.iter().skip(1) {
                let value = source
                    .and_then(|source| source.get(field))
                    .cloned()
                    .unwrap_or(Value::Null);
                record.insert(field.clone(), value);
            }
            record
        })
        .collect();

    QueryResult { fields, records, message: SUCCESS_MESSAGE.to_string() }
}

//! Shape sniffing for engine payloads
//!
//! The engine answers with one of three JSON shapes depending on the
//! statement. Sniffing order is a contract: `schema`/`datarows` wins over
//! `aggregations`, which wins over document hits.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One column entry of a tabular response's `schema` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    #[serde(rename = "type", default)]
    pub column_type: Option<String>,
}

/// Sub-shape of a `schema` + `datarows` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularKind {
    /// Response to a DELETE statement (`deleted_rows` column present).
    Delete,
    /// Response to DESCRIBE (`DATA_TYPE` column present).
    Describe,
    /// Response to SHOW; only `TABLE_NAME` is surfaced.
    Show,
}

/// The recognized payload shapes, in sniffing priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    Tabular {
        kind: TabularKind,
        schema: Vec<SchemaColumn>,
        datarows: Vec<Value>,
    },
    Aggregation(Map<String, Value>),
    Hits(Vec<Value>),
}

/// Classify a parsed payload.
///
/// Anything that is neither tabular nor an aggregation falls through to
/// the hits shape; a body without `hits.hits` yields an empty hit list,
/// which normalizes to an empty table.
pub fn sniff(body: &Value) -> ResponseShape {
    if let (Some(schema), Some(datarows)) = (body.get("schema"), body.get("datarows")) {
        // Positions must line up with datarow cells, so unparseable schema
        // entries become unnamed columns instead of being dropped.
        let schema: Vec<SchemaColumn> = schema
            .as_array()
            .map(|columns| {
                columns
                    .iter()
                    .map(|column| {
                        serde_json::from_value(column.clone())
                            .unwrap_or(SchemaColumn { name: String::new(), column_type: None })
                    })
                    .collect()
            })
            .unwrap_or_default();
        let datarows = datarows.as_array().cloned().unwrap_or_default();
        let kind = classify_tabular(&schema);
        return ResponseShape::Tabular { kind, schema, datarows };
    }

    if let Some(aggregations) = body.get("aggregations").and_then(Value::as_object) {
        return ResponseShape::Aggregation(aggregations.clone());
    }

    let hits = body
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    ResponseShape::Hits(hits)
}

fn classify_tabular(schema: &[SchemaColumn]) -> TabularKind {
    if schema.iter().any(|column| column.name == "deleted_rows") {
        TabularKind::Delete
    } else if schema.iter().any(|column| column.name == "DATA_TYPE") {
        TabularKind::Describe
    } else {
        TabularKind::Show
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tabular_wins_over_hits() {
        let body = json!({
            "schema": [{"name": "TABLE_NAME", "type": "keyword"}],
            "datarows": [["accounts"]],
            "hits": {"hits": [{"_source": {"a": 1}}]}
        });
        match sniff(&body) {
            ResponseShape::Tabular { kind, schema, datarows } => {
                assert_eq!(kind, TabularKind::Show);
                assert_eq!(schema.len(), 1);
                assert_eq!(datarows.len(), 1);
            }
            other => panic!("expected tabular shape, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregation_wins_over_hits() {
        let body = json!({
            "aggregations": {"count": {"value": 5}},
            "hits": {"hits": []}
        });
        assert!(matches!(sniff(&body), ResponseShape::Aggregation(_)));
    }

    #[test]
    fn test_tabular_classification() {
        let deleted = json!({"schema": [{"name": "deleted_rows"}], "datarows": []});
        assert!(matches!(
            sniff(&deleted),
            ResponseShape::Tabular { kind: TabularKind::Delete, .. }
        ));

        let describe = json!({
            "schema": [{"name": "COLUMN_NAME"}, {"name": "DATA_TYPE"}],
            "datarows": []
        });
        assert!(matches!(
            sniff(&describe),
            ResponseShape::Tabular { kind: TabularKind::Describe, .. }
        ));
    }

    #[test]
    fn test_default_shape_is_hits() {
        let body = json!({"took": 3, "hits": {"hits": [{"_source": {"a": 1}}]}});
        match sniff(&body) {
            ResponseShape::Hits(hits) => assert_eq!(hits.len(), 1),
            other => panic!("expected hits shape, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_hits_yields_empty_list() {
        assert_eq!(sniff(&json!({"took": 1})), ResponseShape::Hits(vec![]));
    }
}

//! Presentation-independent shaping of cells and nested sub-tables

use serde_json::Value;

use crate::normalize::{Record, ID_FIELD};

/// How a single table cell should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldView {
    /// Null renders as an empty cell.
    Empty,
    /// Plain value rendered inline.
    Scalar(String),
    /// Array of scalars; the link text reads `field: [len]`.
    ExpandableArray { link: String },
    /// Object, or array of objects; the link text reads `field: {len}`.
    ExpandableRows { link: String },
}

impl FieldView {
    pub fn of(field: &str, value: &Value) -> Self {
        match value {
            Value::Null => FieldView::Empty,
            Value::Array(items) => {
                if items.first().map_or(true, |first| !first.is_object()) {
                    FieldView::ExpandableArray { link: format!("{}: [{}]", field, items.len()) }
                } else {
                    FieldView::ExpandableRows { link: format!("{}: {{{}}}", field, items.len()) }
                }
            }
            Value::Object(_) => FieldView::ExpandableRows { link: format!("{}: {{1}}", field) },
            scalar => FieldView::Scalar(display(scalar)),
        }
    }

    /// Whether clicking this cell opens a nested view.
    pub fn is_expandable(&self) -> bool {
        matches!(self, FieldView::ExpandableArray { .. } | FieldView::ExpandableRows { .. })
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// A nested table rendered for an expanded node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubTable {
    /// Ordered column names; starts with the synthetic `id` when the data
    /// carries named columns.
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

/// Column name used for elements of a scalar array.
const VALUE_COLUMN: &str = "value";

impl SubTable {
    /// Normalize a node's data into rows and columns.
    ///
    /// An array of objects becomes one row per element with columns from
    /// the first object's keys; a single object becomes one row; an array
    /// of scalars becomes single-column rows. Values bind by key, so
    /// objects with missing keys produce null cells.
    pub fn from_value(data: &Value) -> Self {
        match data {
            Value::Object(_) => Self::from_rows(std::slice::from_ref(data)),
            Value::Array(items) if items.first().map_or(false, Value::is_object) => {
                Self::from_rows(items)
            }
            Value::Array(items) => {
                let columns = vec![ID_FIELD.to_string(), VALUE_COLUMN.to_string()];
                let records = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let mut record = Record::new();
                        record.insert(ID_FIELD.to_string(), Value::String(index.to_string()));
                        record.insert(VALUE_COLUMN.to_string(), item.clone());
                        record
                    })
                    .collect();
                SubTable { columns, records }
            }
            _ => SubTable::default(),
        }
    }

    fn from_rows(rows: &[Value]) -> Self {
        let mut columns = vec![ID_FIELD.to_string()];
        if let Some(first) = rows.first().and_then(Value::as_object) {
            columns.extend(first.keys().cloned());
        }

        let records = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut record = Record::new();
                record.insert(ID_FIELD.to_string(), Value::String(index.to_string()));
                let fields = row.as_object();
                for column in columns.iter().skip(1) {
                    let value = fields
                        .and_then(|fields| fields.get(column))
                        .cloned()
                        .unwrap_or(Value::Null);
                    record.insert(column.clone(), value);
                }
                record
            })
            .collect();

        SubTable { columns, records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

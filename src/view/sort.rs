//! Single-column sorting over normalized records

use std::cmp::Ordering;

use serde_json::Value;

use crate::normalize::Record;

/// One active sort column plus direction.
///
/// Reselecting the active column flips the direction; selecting another
/// column switches to it ascending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sorter {
    columns: Vec<String>,
    sorted_column: String,
    ascending: bool,
}

impl Sorter {
    /// Build from a result's field list; the first field starts active.
    pub fn new(fields: &[String]) -> Self {
        Sorter {
            columns: fields.to_vec(),
            sorted_column: fields.first().cloned().unwrap_or_default(),
            ascending: true,
        }
    }

    pub fn sorted_column(&self) -> &str {
        &self.sorted_column
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    pub fn sort_on(&mut self, column: &str) {
        if self.sorted_column == column {
            self.ascending = !self.ascending;
        } else if self.columns.iter().any(|candidate| candidate == column) {
            self.sorted_column = column.to_string();
            self.ascending = true;
        }
    }

    /// Order the full record set by the active column.
    pub fn sort(&self, records: &mut [Record]) {
        if self.sorted_column.is_empty() {
            return;
        }
        records.sort_by(|a, b| {
            let left = a.get(&self.sorted_column).unwrap_or(&Value::Null);
            let right = b.get(&self.sorted_column).unwrap_or(&Value::Null);
            let ordering = compare_values(left, right);
            if self.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
    }
}

/// Total order over JSON values: null < bool < number < string, with
/// arrays and objects falling back to their rendered text.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (x, y) if rank(x) == rank(y) => x.to_string().cmp(&y.to_string()),
        (x, y) => rank(x).cmp(&rank(y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: &[Value]) -> Vec<Record> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let mut record = Record::new();
                record.insert("id".to_string(), json!(index.to_string()));
                record.insert("v".to_string(), value.clone());
                record
            })
            .collect()
    }

    fn fields() -> Vec<String> {
        vec!["id".to_string(), "v".to_string()]
    }

    #[test]
    fn test_sort_numbers_ascending() {
        let mut sorter = Sorter::new(&fields());
        sorter.sort_on("v");
        let mut rows = records(&[json!(3), json!(1), json!(2)]);
        sorter.sort(&mut rows);
        let sorted: Vec<_> = rows.iter().map(|r| r["v"].clone()).collect();
        assert_eq!(sorted, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_reselect_flips_direction() {
        let mut sorter = Sorter::new(&fields());
        sorter.sort_on("v");
        assert!(sorter.is_ascending());
        sorter.sort_on("v");
        assert!(!sorter.is_ascending());

        let mut rows = records(&[json!(1), json!(3), json!(2)]);
        sorter.sort(&mut rows);
        assert_eq!(rows[0]["v"], json!(3));
    }

    #[test]
    fn test_switching_column_defaults_ascending() {
        let mut sorter = Sorter::new(&fields());
        sorter.sort_on("v");
        sorter.sort_on("v");
        sorter.sort_on("id");
        assert_eq!(sorter.sorted_column(), "id");
        assert!(sorter.is_ascending());
    }

    #[test]
    fn test_unknown_column_is_ignored() {
        let mut sorter = Sorter::new(&fields());
        sorter.sort_on("nope");
        assert_eq!(sorter.sorted_column(), "id");
    }

    #[test]
    fn test_nulls_sort_first() {
        let mut sorter = Sorter::new(&fields());
        sorter.sort_on("v");
        let mut rows = records(&[json!("b"), json!(null), json!("a")]);
        sorter.sort(&mut rows);
        assert_eq!(rows[0]["v"], json!(null));
        assert_eq!(rows[1]["v"], json!("a"));
    }
}

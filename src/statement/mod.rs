//! Statement splitting and tab labeling
//!
//! The editor submits one free-form text blob; everything downstream works
//! on individual statements.

/// Split a multi-statement input on `;` into trimmed, non-empty statements.
///
/// A literal `;` inside a SQL string constant is treated as a statement
/// boundary too; the engine rejects the resulting fragments and the error
/// surfaces in the Messages tab.
pub fn split_statements(input: &str) -> Vec<String> {
    input
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Derive a display label for a statement's result tab.
///
/// Uses the index name following the first `FROM` keyword, lowercased.
/// Statements without a `FROM` clause label themselves.
pub fn statement_label(statement: &str) -> String {
    let lowered = statement.to_lowercase();
    if let Some(position) = lowered.find("from") {
        if let Some(word) = lowered[position + "from".len()..].split_whitespace().next() {
            return word.trim_end_matches(',').to_string();
        }
    }
    statement.to_string()
}

//! SQL Console
//!
//! A SQL console service for search-engine SQL backends: thin HTTP proxy
//! routes that forward statements to the engine, plus the result-shaping
//! core that turns raw engine responses into paginated, sortable, lazily
//! expandable tables.
//!
//! # Architecture
//!
//! Control flow for one Run action:
//!
//! 1. [`statement`] splits the editor input into individual statements.
//! 2. [`console::Session`] fans out one backend call per statement per
//!    output format and joins them before touching any state.
//! 3. [`normalize`] sniffs each raw payload's shape (tabular,
//!    aggregation, or document hits) and produces a uniform
//!    `{fields, records}` table.
//! 4. [`view`] filters, sorts, and paginates the full record set.
//! 5. [`tree`] and [`expansion`] grow per-row expansion trees on demand
//!    and remember what the user opened until the tab, page, or search
//!    query changes.
//! 6. [`export`] hands the selected tab's payloads back as downloads.
//!
//! The [`http`] module is the server half: pass-through routes wrapping
//! the engine's answers in `{ok, resp}` envelopes.
//!
//! # Example Usage
//!
//! ```rust
//! use sql_console::normalize::{normalize, QueryResult};
//! use sql_console::response::ResponseDetail;
//! use sql_console::statement::split_statements;
//!
//! let statements = split_statements("SELECT * FROM t1; SELECT * FROM t2;");
//! assert_eq!(statements.len(), 2);
//!
//! let raw = ResponseDetail::Fulfilled(
//!     r#"{"hits":{"hits":[{"_source":{"a":1,"b":2}}]}}"#.to_string(),
//! );
//! let table: ResponseDetail<QueryResult> = normalize(&raw);
//! let table = table.data().unwrap();
//! assert_eq!(table.fields, vec!["id", "a", "b"]);
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod console;
pub mod engine;
pub mod expansion;
pub mod export;
pub mod http;
pub mod normalize;
pub mod render;
pub mod response;
pub mod statement;
pub mod tree;
pub mod view;

// Re-export main types for convenience
pub use config::{ConfigError, ConsoleConfig, EngineConfig};
pub use console::{Batch, Session, Tab, MESSAGE_TAB_ID, MESSAGE_TAB_LABEL};
pub use engine::{EngineClient, EngineError, SqlFormat};
pub use expansion::{ExpansionEntry, ExpansionState};
pub use export::{export_csv, export_jdbc, export_json, Download, ExportError};
pub use http::{HttpServer, QueryRequest};
pub use normalize::{normalize, QueryResult, Record, ResponseShape, TabularKind, ID_FIELD};
pub use render::{FieldView, SubTable};
pub use response::{
    message_report, process_response, EngineResponse, MessageKind, QueryMessage, ResponseDetail,
};
pub use statement::{split_statements, statement_label};
pub use tree::{is_expandable, RowTree, TreeNode};
pub use view::{FreeTextFilter, Pager, RecordFilter, Sorter, DEFAULT_PAGE_SIZE, PAGE_OPTIONS};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

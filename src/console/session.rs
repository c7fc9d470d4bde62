//! Console session state and the Run/Translate orchestration
//!
//! A session owns everything one console view needs: per-format raw
//! results, normalized tables, tab selection, search, pagination, sorting,
//! and expansion state. All backend calls for one action are issued
//! concurrently and joined before any state changes, so partial results
//! are never visible.
//!
//! Overlapping actions are serialized by a monotonic sequence number:
//! a batch that resolves after a newer one has been applied is dropped
//! instead of silently overwriting fresher state.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::{EngineClient, SqlFormat};
use crate::expansion::ExpansionState;
use crate::export::{export_csv, export_jdbc, export_json, Download, ExportError};
use crate::normalize::{normalize, QueryResult, Record, ID_FIELD};
use crate::response::{self, process_response, EngineResponse, QueryMessage, ResponseDetail};
use crate::statement::{split_statements, statement_label};
use crate::tree::{RowTree, TreeNode};
use crate::view::{FreeTextFilter, Pager, RecordFilter, Sorter};

/// Identifier of the always-present Messages tab.
pub const MESSAGE_TAB_ID: &str = "messages";

/// Display label of the Messages tab.
pub const MESSAGE_TAB_LABEL: &str = "Messages";

/// One selectable result tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Statement index as a string, or [`MESSAGE_TAB_ID`].
    pub id: String,
    pub name: String,
}

fn message_tab() -> Tab {
    Tab { id: MESSAGE_TAB_ID.to_string(), name: MESSAGE_TAB_LABEL.to_string() }
}

/// Everything one action fetched, tagged with its sequence number.
#[derive(Debug)]
pub struct Batch {
    seq: u64,
    statements: Vec<String>,
    translations: Vec<ResponseDetail<String>>,
    /// Present for Run actions; a Translate action carries none and
    /// clears the result tabs on apply.
    results: Option<RunResults>,
}

#[derive(Debug)]
struct RunResults {
    raw: Vec<ResponseDetail<String>>,
    jdbc: Vec<ResponseDetail<String>>,
    csv: Vec<ResponseDetail<String>>,
    text: Vec<ResponseDetail<String>>,
}

/// One console view over the engine.
pub struct Session {
    engine: Arc<EngineClient>,
    filter: Box<dyn RecordFilter + Send + Sync>,

    next_seq: u64,
    applied_seq: Option<u64>,

    statements: Vec<String>,
    translations: Vec<ResponseDetail<String>>,
    raw_results: Vec<ResponseDetail<String>>,
    jdbc_results: Vec<ResponseDetail<String>>,
    csv_results: Vec<ResponseDetail<String>>,
    text_results: Vec<ResponseDetail<String>>,
    table_results: Vec<ResponseDetail<QueryResult>>,
    messages: Vec<QueryMessage>,

    selected_tab: Tab,
    search_query: String,
    pager: Pager,
    sorter: Sorter,
    expansion: ExpansionState,
}

impl Session {
    pub fn new(engine: Arc<EngineClient>) -> Self {
        Self {
            engine,
            filter: Box::new(FreeTextFilter),
            next_seq: 0,
            applied_seq: None,
            statements: Vec::new(),
            translations: Vec::new(),
            raw_results: Vec::new(),
            jdbc_results: Vec::new(),
            csv_results: Vec::new(),
            text_results: Vec::new(),
            table_results: Vec::new(),
            messages: Vec::new(),
            selected_tab: message_tab(),
            search_query: String::new(),
            pager: Pager::default(),
            sorter: Sorter::default(),
            expansion: ExpansionState::new(),
        }
    }

    /// Replace the search collaborator.
    pub fn with_filter(mut self, filter: impl RecordFilter + Send + Sync + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// Run every statement in `input` and apply the batch unless a newer
    /// one already landed.
    pub async fn run(&mut self, input: &str) -> bool {
        let batch = self.fetch(input).await;
        self.apply(batch)
    }

    /// Translate every statement in `input`; result tabs are cleared.
    pub async fn translate(&mut self, input: &str) -> bool {
        let batch = self.fetch_translations(input).await;
        self.apply(batch)
    }

    /// Fetch one Run batch: one call per statement per output format, all
    /// in flight together, joined before returning.
    pub async fn fetch(&mut self, input: &str) -> Batch {
        let statements = split_statements(input);
        let seq = self.take_seq();
        debug!(seq, statements = statements.len(), "running statements");

        let (translations, raw, jdbc, csv, text) = futures::join!(
            self.fan_out(&statements, None),
            self.fan_out(&statements, Some(SqlFormat::Json)),
            self.fan_out(&statements, Some(SqlFormat::Jdbc)),
            self.fan_out(&statements, Some(SqlFormat::Csv)),
            self.fan_out(&statements, Some(SqlFormat::Text)),
        );

        Batch {
            seq,
            statements,
            translations,
            results: Some(RunResults { raw, jdbc, csv, text }),
        }
    }

    /// Fetch one Translate batch.
    pub async fn fetch_translations(&mut self, input: &str) -> Batch {
        let statements = split_statements(input);
        let seq = self.take_seq();
        debug!(seq, statements = statements.len(), "translating statements");

        let translations = self.fan_out(&statements, None).await;
        Batch { seq, statements, translations, results: None }
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    async fn fan_out(
        &self,
        statements: &[String],
        format: Option<SqlFormat>,
    ) -> Vec<ResponseDetail<String>> {
        join_all(statements.iter().map(|statement| self.call(statement, format))).await
    }

    async fn call(&self, statement: &str, format: Option<SqlFormat>) -> ResponseDetail<String> {
        let result = match format {
            Some(format) => self.engine.query(statement, format).await,
            None => self.engine.translate(statement).await,
        };
        process_response(Some(EngineResponse::from(result)))
    }

    /// Apply a fetched batch. Returns false (and changes nothing) when a
    /// newer batch has already been applied.
    pub fn apply(&mut self, batch: Batch) -> bool {
        if self.applied_seq.map_or(false, |applied| batch.seq <= applied) {
            warn!(seq = batch.seq, "dropping stale response batch");
            return false;
        }
        self.applied_seq = Some(batch.seq);

        self.statements = batch.statements;
        self.translations = batch.translations;

        match batch.results {
            Some(results) => {
                self.table_results = results.raw.iter().map(normalize).collect();
                self.messages = result_messages(&self.table_results);
                self.raw_results = results.raw;
                self.jdbc_results = results.jdbc;
                self.csv_results = results.csv;
                self.text_results = results.text;
                self.selected_tab = default_tab(&self.statements, &self.table_results);
            }
            None => {
                self.table_results = Vec::new();
                self.raw_results = Vec::new();
                self.jdbc_results = Vec::new();
                self.csv_results = Vec::new();
                self.text_results = Vec::new();
                self.messages = translate_messages(&self.translations);
                self.selected_tab = message_tab();
            }
        }

        self.reset_view();
        true
    }

    /// Drop all results and return to the initial state.
    pub fn clear(&mut self) {
        self.statements.clear();
        self.translations.clear();
        self.raw_results.clear();
        self.jdbc_results.clear();
        self.csv_results.clear();
        self.text_results.clear();
        self.table_results.clear();
        self.messages.clear();
        self.selected_tab = message_tab();
        self.reset_view();
    }

    fn reset_view(&mut self) {
        self.search_query.clear();
        self.expansion = ExpansionState::new();
        self.pager = Pager::new(0, self.pager.items_per_page());
        let sorter = match self.selected_result() {
            Some(result) => Sorter::new(&result.fields),
            None => Sorter::default(),
        };
        self.sorter = sorter;
    }

    /// The Messages tab plus one tab per fulfilled statement.
    pub fn tabs(&self) -> Vec<Tab> {
        let mut tabs = vec![message_tab()];
        for (index, result) in self.table_results.iter().enumerate() {
            if result.is_fulfilled() {
                let name = self
                    .statements
                    .get(index)
                    .map(|statement| statement_label(statement))
                    .unwrap_or_else(|| index.to_string());
                tabs.push(Tab { id: index.to_string(), name });
            }
        }
        tabs
    }

    pub fn selected_tab(&self) -> &Tab {
        &self.selected_tab
    }

    /// Select a tab by id. Node ids are relative to the previous tab's
    /// rows, so all view state resets.
    pub fn select_tab(&mut self, tab_id: &str) {
        if let Some(tab) = self.tabs().into_iter().find(|tab| tab.id == tab_id) {
            self.selected_tab = tab;
            self.reset_view();
        }
    }

    /// The normalized result behind the selected tab, if it is a result
    /// tab and its statement fulfilled.
    pub fn selected_result(&self) -> Option<&QueryResult> {
        let index: usize = self.selected_tab.id.parse().ok()?;
        self.table_results.get(index)?.data()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.expansion = ExpansionState::new();
        self.pager.go_to_page(0);
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn go_to_page(&mut self, page_index: usize) {
        self.pager.go_to_page(page_index);
        self.expansion = ExpansionState::new();
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.pager.set_items_per_page(items_per_page);
        self.expansion = ExpansionState::new();
    }

    pub fn sorter(&self) -> &Sorter {
        &self.sorter
    }

    pub fn sort_on(&mut self, column: &str) {
        self.sorter.sort_on(column);
    }

    /// The page of records currently visible: filter, then sort, then the
    /// pager's slice. Also refreshes the pager's total.
    pub fn visible_records(&mut self) -> Vec<Record> {
        let result = match self.selected_result() {
            Some(result) => result.clone(),
            None => return Vec::new(),
        };
        let mut matching = self.filter.filter(&self.search_query, &result.records);
        self.pager.set_total_items(matching.len());
        self.sorter.sort(&mut matching);
        self.pager.slice(&matching).to_vec()
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// The cached tree for one visible row, built on first use.
    pub fn row_tree(&mut self, row_id: &str) -> Option<RowTree> {
        let record = self.find_record(row_id)?;
        let (next, tree) = self.expansion.row_tree(row_id, &record);
        self.expansion = next;
        Some(tree)
    }

    /// Expand or collapse one node of one row inline.
    pub fn toggle_node(&mut self, row_id: &str, node_id: &str) {
        if let Some(record) = self.find_record(row_id) {
            self.expansion = self.expansion.toggle_node(row_id, &record, node_id);
        }
    }

    /// Toggle a side-nav selection under `parent`.
    pub fn toggle_selected_child(&mut self, parent: &TreeNode, child: &TreeNode) {
        self.expansion = self.expansion.toggle_selected_child(parent, child);
    }

    fn find_record(&self, row_id: &str) -> Option<Record> {
        self.selected_result()?
            .records
            .iter()
            .find(|record| record.get(ID_FIELD).and_then(Value::as_str) == Some(row_id))
            .cloned()
    }

    pub fn messages(&self) -> &[QueryMessage] {
        &self.messages
    }

    /// The Messages tab content: one labeled paragraph per statement.
    pub fn message_report(&self) -> String {
        let names: Vec<String> =
            self.statements.iter().map(|statement| statement_label(statement)).collect();
        response::message_report(&self.messages, &names)
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn translations(&self) -> &[ResponseDetail<String>] {
        &self.translations
    }

    /// The selected tab's plain-text rendering, when its statement
    /// fulfilled.
    pub fn text_result(&self) -> Option<&str> {
        selected_payload(&self.text_results, &self.selected_tab)
    }

    /// Export the selected tab's raw JSON payload.
    pub fn download_json(&self) -> Option<Result<Download, ExportError>> {
        let raw = selected_payload(&self.raw_results, &self.selected_tab)?;
        Some(export_json(&self.selected_tab.name, raw))
    }

    /// Export the selected tab's JDBC payload.
    pub fn download_jdbc(&self) -> Option<Result<Download, ExportError>> {
        let raw = selected_payload(&self.jdbc_results, &self.selected_tab)?;
        Some(export_jdbc(&self.selected_tab.name, raw))
    }

    /// Export the selected tab's CSV payload verbatim.
    pub fn download_csv(&self) -> Option<Download> {
        let raw = selected_payload(&self.csv_results, &self.selected_tab)?;
        Some(export_csv(&self.selected_tab.name, raw))
    }
}

fn selected_payload<'a>(results: &'a [ResponseDetail<String>], tab: &Tab) -> Option<&'a str> {
    let index: usize = tab.id.parse().ok()?;
    results.get(index)?.data().map(String::as_str)
}

fn default_tab(statements: &[String], results: &[ResponseDetail<QueryResult>]) -> Tab {
    match (statements.first(), results.first()) {
        (Some(statement), Some(result)) if result.is_fulfilled() => {
            Tab { id: "0".to_string(), name: statement_label(statement) }
        }
        _ => message_tab(),
    }
}

fn result_messages(results: &[ResponseDetail<QueryResult>]) -> Vec<QueryMessage> {
    results
        .iter()
        .map(|detail| match detail {
            ResponseDetail::Fulfilled(result) => QueryMessage::success(result.message.clone()),
            ResponseDetail::Rejected { error } => QueryMessage::error(error.clone()),
        })
        .collect()
}

fn translate_messages(translations: &[ResponseDetail<String>]) -> Vec<QueryMessage> {
    translations
        .iter()
        .map(|detail| match detail {
            ResponseDetail::Fulfilled(_) => QueryMessage::success("Success"),
            ResponseDetail::Rejected { error } => QueryMessage::error(error.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::response::MessageKind;
    use serde_json::json;

    fn session() -> Session {
        let engine = EngineClient::new(&EngineConfig::default()).unwrap();
        Session::new(Arc::new(engine))
    }

    fn hits_payload() -> String {
        json!({"hits": {"hits": [
            {"_source": {"name": "alice", "address": {"x": 1}}},
            {"_source": {"name": "bob", "address": {"x": 2}}}
        ]}})
        .to_string()
    }

    fn run_batch(seq: u64, statements: &[&str], raw: Vec<ResponseDetail<String>>) -> Batch {
        let per_statement: Vec<ResponseDetail<String>> = statements
            .iter()
            .map(|_| ResponseDetail::Fulfilled("{}".to_string()))
            .collect();
        Batch {
            seq,
            statements: statements.iter().map(|s| s.to_string()).collect(),
            translations: per_statement.clone(),
            results: Some(RunResults {
                raw,
                jdbc: per_statement.clone(),
                csv: per_statement.clone(),
                text: per_statement,
            }),
        }
    }

    #[test]
    fn test_apply_selects_first_fulfilled_tab() {
        let mut session = session();
        let applied = session.apply(run_batch(
            0,
            &["SELECT * FROM accounts"],
            vec![ResponseDetail::Fulfilled(hits_payload())],
        ));

        assert!(applied);
        assert_eq!(session.selected_tab().id, "0");
        assert_eq!(session.selected_tab().name, "accounts");
        assert_eq!(session.tabs().len(), 2);
        assert_eq!(session.messages()[0].kind, MessageKind::Success);
    }

    #[test]
    fn test_failed_statement_falls_back_to_messages_tab() {
        let mut session = session();
        session.apply(run_batch(
            0,
            &["SELECT * FROM missing"],
            vec![ResponseDetail::rejected("no such index")],
        ));

        assert_eq!(session.selected_tab().id, MESSAGE_TAB_ID);
        // failed statements get no tab of their own
        assert_eq!(session.tabs().len(), 1);
        assert_eq!(session.messages()[0].kind, MessageKind::Error);
        assert_eq!(session.message_report(), "Missing: no such index\n\n");
    }

    #[test]
    fn test_failures_are_local_to_their_statement() {
        let mut session = session();
        session.apply(run_batch(
            0,
            &["SELECT * FROM accounts", "SELECT * FROM missing"],
            vec![
                ResponseDetail::Fulfilled(hits_payload()),
                ResponseDetail::rejected("no such index"),
            ],
        ));

        let tabs = session.tabs();
        assert_eq!(tabs.len(), 2); // Messages + the fulfilled statement
        assert_eq!(tabs[1].id, "0");
        assert_eq!(session.messages().len(), 2);
    }

    #[test]
    fn test_stale_batch_is_dropped() {
        let mut session = session();
        let older = run_batch(
            0,
            &["SELECT * FROM stale"],
            vec![ResponseDetail::Fulfilled(hits_payload())],
        );
        let newer = run_batch(
            1,
            &["SELECT * FROM fresh"],
            vec![ResponseDetail::Fulfilled(hits_payload())],
        );

        assert!(session.apply(newer));
        assert!(!session.apply(older));
        assert_eq!(session.selected_tab().name, "fresh");
        assert_eq!(session.statements(), ["SELECT * FROM fresh"]);
    }

    #[test]
    fn test_tab_change_resets_expansion_state() {
        let mut session = session();
        session.apply(run_batch(
            0,
            &["SELECT * FROM accounts"],
            vec![ResponseDetail::Fulfilled(hits_payload())],
        ));

        session.toggle_node("0", "0_address");
        assert!(!session.expansion().is_empty());

        session.select_tab(MESSAGE_TAB_ID);
        assert!(session.expansion().is_empty());
    }

    #[test]
    fn test_search_change_resets_expansion_state() {
        let mut session = session();
        session.apply(run_batch(
            0,
            &["SELECT * FROM accounts"],
            vec![ResponseDetail::Fulfilled(hits_payload())],
        ));

        session.toggle_node("0", "0_address");
        session.set_search_query("alice");
        assert!(session.expansion().is_empty());

        let visible = session.visible_records();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0]["name"], json!("alice"));
    }

    #[test]
    fn test_visible_records_sorts_before_slicing() {
        let mut session = session();
        session.apply(run_batch(
            0,
            &["SELECT * FROM accounts"],
            vec![ResponseDetail::Fulfilled(hits_payload())],
        ));

        session.sort_on("name");
        session.sort_on("name"); // flip to descending
        let visible = session.visible_records();
        assert_eq!(visible[0]["name"], json!("bob"));
    }

    #[test]
    fn test_downloads_use_tab_name_and_exact_payloads() {
        let mut session = session();
        let mut batch = run_batch(
            0,
            &["SELECT * FROM accounts"],
            vec![ResponseDetail::Fulfilled(hits_payload())],
        );
        if let Some(results) = batch.results.as_mut() {
            results.csv = vec![ResponseDetail::Fulfilled("name\nalice\n".to_string())];
        }
        session.apply(batch);

        let csv = session.download_csv().unwrap();
        assert_eq!(csv.file_name, "accounts.csv");
        assert_eq!(csv.bytes, b"name\nalice\n");

        let json_download = session.download_json().unwrap().unwrap();
        assert_eq!(json_download.file_name, "accounts.json");
    }

    #[test]
    fn test_translate_batch_clears_result_tabs() {
        let mut session = session();
        session.apply(run_batch(
            0,
            &["SELECT * FROM accounts"],
            vec![ResponseDetail::Fulfilled(hits_payload())],
        ));
        assert_eq!(session.tabs().len(), 2);

        let translate = Batch {
            seq: 1,
            statements: vec!["SELECT * FROM accounts".to_string()],
            translations: vec![ResponseDetail::Fulfilled("{\"query\":{}}".to_string())],
            results: None,
        };
        session.apply(translate);

        assert_eq!(session.tabs().len(), 1);
        assert_eq!(session.selected_tab().id, MESSAGE_TAB_ID);
        assert_eq!(session.messages()[0].kind, MessageKind::Success);
    }

    #[test]
    fn test_clear_returns_to_initial_state() {
        let mut session = session();
        session.apply(run_batch(
            0,
            &["SELECT * FROM accounts"],
            vec![ResponseDetail::Fulfilled(hits_payload())],
        ));
        session.clear();

        assert!(session.statements().is_empty());
        assert_eq!(session.tabs().len(), 1);
        assert!(session.messages().is_empty());
        assert!(session.expansion().is_empty());
        assert!(session.visible_records().is_empty());
    }
}

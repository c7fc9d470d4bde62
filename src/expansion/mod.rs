//! Transient expansion state for the result view
//!
//! Maps node ids to whatever the view currently shows for them: the row's
//! cached tree, a rendered sub-table for inline-expanded nodes, and the
//! selected children of side-nav parents. Every operation is copy-on-write
//! so the previous state stays valid while a re-render is in flight.
//!
//! Node ids are only meaningful relative to one row set and page, so the
//! whole map is reset whenever the selected tab, page, or search query
//! changes.

use indexmap::IndexMap;
use serde_json::Value;

use crate::normalize::Record;
use crate::render::SubTable;
use crate::tree::{RowTree, TreeNode};

/// Per-node view state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionEntry {
    /// The row's tree; present on row-root entries only.
    pub nodes: Option<RowTree>,
    /// Rendered sub-table for an inline-expanded node.
    pub expanded_row: Option<SubTable>,
    /// Side-nav selections under this node: child node id to child data.
    pub selected_nodes: IndexMap<String, Value>,
}

/// Node id to view state for the currently rendered result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionState {
    entries: IndexMap<String, ExpansionEntry>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, node_id: &str) -> Option<&ExpansionEntry> {
        self.entries.get(node_id)
    }

    /// Whether a node currently shows its rendered sub-table.
    pub fn is_expanded(&self, node_id: &str) -> bool {
        self.entries
            .get(node_id)
            .map_or(false, |entry| entry.expanded_row.is_some())
    }

    /// Return the row's cached tree, building and caching it on first use.
    ///
    /// The cached tree always wins over a rebuild; rebuilding would lose
    /// lazily expanded children.
    pub fn row_tree(&self, row_id: &str, record: &Record) -> (Self, RowTree) {
        if let Some(tree) = self.entries.get(row_id).and_then(|entry| entry.nodes.clone()) {
            return (self.clone(), tree);
        }
        let tree = RowTree::build(row_id, record);
        let mut next = self.clone();
        next.entries.entry(row_id.to_string()).or_default().nodes = Some(tree.clone());
        (next, tree)
    }

    /// Expand or collapse a node inline.
    ///
    /// Collapsing removes the rendered sub-table; expanding lazily grows
    /// the row tree at that node and renders the node's data. Toggling
    /// twice returns to a state with no rendered row for the node.
    pub fn toggle_node(&self, row_id: &str, record: &Record, node_id: &str) -> Self {
        let (mut next, mut tree) = self.row_tree(row_id, record);

        if next.is_expanded(node_id) {
            if let Some(entry) = next.entries.get_mut(node_id) {
                entry.expanded_row = None;
            }
            return next;
        }

        tree.expand(node_id);
        if let Some(node) = tree.get(node_id) {
            next.entries.entry(node_id.to_string()).or_default().expanded_row =
                Some(SubTable::from_value(&node.data));
        }
        next.entries.entry(row_id.to_string()).or_default().nodes = Some(tree);
        next
    }

    /// Add or remove a child from its parent's side-nav selection.
    pub fn toggle_selected_child(&self, parent: &TreeNode, child: &TreeNode) -> Self {
        let mut next = self.clone();
        let entry = next.entries.entry(parent.node_id.clone()).or_default();
        if entry.selected_nodes.shift_remove(&child.node_id).is_none() {
            entry.selected_nodes.insert(child.node_id.clone(), child.data.clone());
        }
        next
    }

    /// Drop all view state. Invoked on tab, page, or search change.
    pub fn reset(&self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Record {
        [
            ("id".to_string(), json!("0")),
            ("name".to_string(), json!("alice")),
            ("address".to_string(), json!({"x": 1})),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_toggle_renders_sub_table() {
        let state = ExpansionState::new();
        let next = state.toggle_node("0", &record(), "0_address");

        let table = next.get("0_address").unwrap().expanded_row.as_ref().unwrap();
        assert_eq!(table.columns, vec!["id", "x"]);
        assert_eq!(table.records.len(), 1);
        // the source state is untouched
        assert!(state.is_empty());
    }

    #[test]
    fn test_double_toggle_collapses() {
        let state = ExpansionState::new();
        let expanded = state.toggle_node("0", &record(), "0_address");
        let collapsed = expanded.toggle_node("0", &record(), "0_address");

        assert!(!collapsed.is_expanded("0_address"));
        // a third toggle re-expands to the same rendered content
        let reexpanded = collapsed.toggle_node("0", &record(), "0_address");
        assert_eq!(
            reexpanded.get("0_address").unwrap().expanded_row,
            expanded.get("0_address").unwrap().expanded_row
        );
    }

    #[test]
    fn test_row_tree_is_cached() {
        let state = ExpansionState::new();
        let (state, first) = state.row_tree("0", &record());
        let (_, second) = state.row_tree("0", &record());
        assert_eq!(first, second);
        assert!(state.get("0").unwrap().nodes.is_some());
    }

    #[test]
    fn test_toggle_keeps_expanded_tree_cached() {
        let state = ExpansionState::new();
        let next = state.toggle_node("0", &record(), "0_address");
        let cached = next.get("0").unwrap().nodes.as_ref().unwrap();
        // the lazily expanded node is part of the cached tree now
        assert!(cached.get("0_address").is_some());
    }

    #[test]
    fn test_toggle_selected_child() {
        let state = ExpansionState::new();
        let (state, tree) = state.row_tree("0", &record());
        let parent = tree.root().clone();
        let child = tree.get("0_address").unwrap().clone();

        let selected = state.toggle_selected_child(&parent, &child);
        assert!(selected.get("0").unwrap().selected_nodes.contains_key("0_address"));

        let unselected = selected.toggle_selected_child(&parent, &child);
        assert!(!unselected.get("0").unwrap().selected_nodes.contains_key("0_address"));
    }

    #[test]
    fn test_reset_drops_everything() {
        let state = ExpansionState::new().toggle_node("0", &record(), "0_address");
        assert!(!state.is_empty());
        assert!(state.reset().is_empty());
    }
}

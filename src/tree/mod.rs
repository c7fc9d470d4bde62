//! Lazy expansion trees over nested record values
//!
//! One tree per row, built the first time the row renders. Nodes live in
//! an arena keyed by node id; parent and child links are ids, so the tree
//! is freely cloneable and has no reference cycles.
//!
//! Only the root's direct children are computed at build time. Expanding a
//! child applies the same algorithm to that child's data, so arbitrarily
//! deep nesting costs nothing until the user actually opens it.

use indexmap::IndexMap;
use serde_json::Value;

use crate::normalize::Record;

/// One expandable element of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Derived as `{parent id}_{name}`; the root uses the row id itself.
    pub node_id: String,
    /// Field name, or element index for array children.
    pub name: String,
    /// The nested value this node wraps.
    pub data: Value,
    pub parent: Option<String>,
    pub children: Vec<String>,
    /// Whether `children` has been computed yet.
    expanded: bool,
}

/// Arena of nodes for a single row, rooted at the row id.
#[derive(Debug, Clone, PartialEq)]
pub struct RowTree {
    nodes: IndexMap<String, TreeNode>,
    root: String,
}

/// Non-null objects and arrays can open into sub-tables.
pub fn is_expandable(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

impl RowTree {
    /// Build the tree for one record. The root wraps the whole record; one
    /// direct child is created per field holding an object or array.
    pub fn build(row_id: &str, record: &Record) -> Self {
        let data = Value::Object(record.clone().into_iter().collect());
        let root = TreeNode {
            node_id: row_id.to_string(),
            name: row_id.to_string(),
            data,
            parent: None,
            children: Vec::new(),
            expanded: true,
        };

        let mut nodes = IndexMap::new();
        nodes.insert(root.node_id.clone(), root);
        let mut tree = RowTree { nodes, root: row_id.to_string() };

        for (field, value) in record {
            if is_expandable(value) {
                tree.attach(row_id, field, value.clone());
            }
        }
        tree
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[&self.root]
    }

    pub fn get(&self, node_id: &str) -> Option<&TreeNode> {
        self.nodes.get(node_id)
    }

    /// Resolved child nodes of `node_id`, in insertion order.
    pub fn children(&self, node_id: &str) -> Vec<&TreeNode> {
        self.nodes
            .get(node_id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child_id| self.nodes.get(child_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Compute the children of `node_id` from its data, if they have not
    /// been computed yet. Expanding twice is a no-op.
    pub fn expand(&mut self, node_id: &str) {
        let (data, already_expanded) = match self.nodes.get_mut(node_id) {
            Some(node) => {
                let already = node.expanded;
                node.expanded = true;
                (node.data.clone(), already)
            }
            None => return,
        };
        if already_expanded {
            return;
        }

        match data {
            Value::Object(fields) => {
                for (field, value) in fields {
                    if is_expandable(&value) {
                        self.attach(node_id, &field, value);
                    }
                }
            }
            Value::Array(items) => {
                for (index, value) in items.into_iter().enumerate() {
                    if is_expandable(&value) {
                        self.attach(node_id, &index.to_string(), value);
                    }
                }
            }
            _ => {}
        }
    }

    /// Walk parent links from `node_id` up to the row root.
    pub fn find_root(&self, node_id: &str) -> Option<&TreeNode> {
        let mut current = self.nodes.get(node_id)?;
        while let Some(parent_id) = &current.parent {
            current = self.nodes.get(parent_id)?;
        }
        Some(current)
    }

    fn attach(&mut self, parent_id: &str, name: &str, data: Value) {
        let node_id = format!("{}_{}", parent_id, name);
        let node = TreeNode {
            node_id: node_id.clone(),
            name: name.to_string(),
            data,
            parent: Some(parent_id.to_string()),
            children: Vec::new(),
            expanded: false,
        };
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.push(node_id.clone());
        }
        self.nodes.insert(node_id, node);
    }
}

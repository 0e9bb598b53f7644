//! Title search across every leaf of the tree.

use crate::core::tree::Tree;

/// Upper bound on results shown at once; the total is still reported.
pub const MAX_SEARCH_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafEntry {
    pub title: String,
    /// Key path from the root, usable with `Navigator::jump_to`.
    pub path: Vec<String>,
    pub message: Option<String>,
}

impl LeafEntry {
    /// `a > leaf1`, or `Root` for a root leaf.
    pub fn path_label(&self) -> String {
        if self.path.is_empty() {
            "Root".to_string()
        } else {
            self.path.join(" > ")
        }
    }
}

/// All leaves, depth-first in display order.
pub fn collect_leaves(tree: &Tree) -> Vec<LeafEntry> {
    let mut leaves = Vec::new();
    tree.visit(|path, node| {
        if node.is_leaf() {
            leaves.push(LeafEntry {
                title: node.title.clone(),
                path: path.to_vec(),
                message: node.message().map(str::to_string),
            });
        }
    });
    leaves
}

/// Leaves whose title contains `query`, ignoring case. A blank query matches nothing.
pub fn search_leaves(tree: &Tree, query: &str) -> Vec<LeafEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    collect_leaves(tree)
        .into_iter()
        .filter(|leaf| leaf.title.to_lowercase().contains(&needle))
        .collect()
}

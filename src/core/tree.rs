//! # Concept Tree
//!
//! The loaded concept map: a tree of categories and leaves, read once at
//! startup and never mutated afterwards.
//!
//! ```text
//! Tree
//! └── root: TreeNode
//!     ├── title: String
//!     ├── description: Option<String>
//!     └── kind: NodeKind
//!         ├── Category { children: [(key, TreeNode), ...] }   // document order
//!         └── Leaf { message: Option<String> }
//! ```
//!
//! The node shape is decided once, at load time. Everything downstream
//! matches on `NodeKind` instead of probing for optional JSON keys.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde_json::{Map, Value};

// ============================================================================
// Model
// ============================================================================

/// What a node is: a grouping of named children, or a terminal leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Children in display order. Keys are unique (JSON object semantics).
    Category { children: Vec<(String, TreeNode)> },
    /// `message` is `None` for a degenerate leaf that cannot trigger a send.
    Leaf { message: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub title: String,
    pub description: Option<String>,
    pub kind: NodeKind,
}

impl TreeNode {
    /// True iff the node carries a children mapping, even an empty one.
    pub fn is_category(&self) -> bool {
        matches!(self.kind, NodeKind::Category { .. })
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_category()
    }

    /// Ordered `(key, child)` pairs. Empty for leaves.
    pub fn children(&self) -> &[(String, TreeNode)] {
        match &self.kind {
            NodeKind::Category { children } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    pub fn child(&self, key: &str) -> Option<&TreeNode> {
        self.children()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }

    /// The leaf message, if this is a leaf that has one.
    pub fn message(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf { message } => message.as_deref(),
            NodeKind::Category { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: TreeNode,
}

impl Tree {
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Follows `path` from the root. `None` if any segment is missing.
    pub fn resolve(&self, path: &[String]) -> Option<&TreeNode> {
        path.iter()
            .try_fold(&self.root, |node, key| node.child(key))
    }

    /// Depth-first pre-order walk in display order. The callback receives the
    /// key path of each node (empty for the root).
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&[String], &TreeNode),
    {
        fn walk<F>(node: &TreeNode, path: &mut Vec<String>, f: &mut F)
        where
            F: FnMut(&[String], &TreeNode),
        {
            f(path.as_slice(), node);
            for (key, child) in node.children() {
                path.push(key.clone());
                walk(child, path, f);
                path.pop();
            }
        }

        let mut path = Vec::new();
        walk(&self.root, &mut path, &mut f);
    }

    /// Paths of categories whose children mapping is empty.
    pub fn childless_categories(&self) -> Vec<String> {
        let mut found = Vec::new();
        self.visit(|path, node| {
            if node.is_category() && node.children().is_empty() {
                found.push(render_path(path));
            }
        });
        found
    }
}

/// Renders a key path for diagnostics: `/` for the root, `/a/leaf1` below it.
pub fn render_path<S: AsRef<str>>(path: &[S]) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.iter().fold(String::new(), |mut out, key| {
        out.push('/');
        out.push_str(key.as_ref());
        out
    })
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum LoadError {
    /// The concept map file could not be read.
    Io(std::io::Error),
    /// Not syntactically valid JSON. No partial tree is usable.
    Malformed(serde_json::Error),
    /// Structurally invalid node at `path`.
    Schema { path: String, reason: String },
}

impl LoadError {
    fn schema(path: &[String], reason: impl Into<String>) -> Self {
        LoadError::Schema {
            path: render_path(path),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "could not read concept map: {e}"),
            LoadError::Malformed(e) => write!(f, "concept map is not valid JSON: {e}"),
            LoadError::Schema { path, reason } => write!(f, "invalid node at {path}: {reason}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Malformed(e) => Some(e),
            LoadError::Schema { .. } => None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Reads and validates the concept map at `path`.
pub fn load_file(path: &Path) -> Result<Tree, LoadError> {
    let source = fs::read_to_string(path).map_err(LoadError::Io)?;
    info!("Loading concept map from {}", path.display());
    load(&source)
}

/// Parses and validates a concept map document.
pub fn load(source: &str) -> Result<Tree, LoadError> {
    let value: Value = serde_json::from_str(source).map_err(LoadError::Malformed)?;
    let mut path = Vec::new();
    let root = build_node(&value, &mut path)?;
    let tree = Tree::new(root);

    for childless in tree.childless_categories() {
        warn!("Category at {} has no children", childless);
    }
    debug!("Concept map loaded, root title: {}", tree.root().title);
    Ok(tree)
}

fn build_node(value: &Value, path: &mut Vec<String>) -> Result<TreeNode, LoadError> {
    let object = value
        .as_object()
        .ok_or_else(|| LoadError::schema(path, "node must be a JSON object"))?;

    let title = match object.get("title") {
        Some(Value::String(t)) if !t.trim().is_empty() => t.clone(),
        Some(Value::String(_)) => return Err(LoadError::schema(path, "title must not be empty")),
        Some(_) => return Err(LoadError::schema(path, "title must be a string")),
        None => return Err(LoadError::schema(path, "missing title")),
    };

    let description = match object.get("description") {
        None => None,
        Some(Value::String(d)) => Some(d.clone()),
        Some(_) => return Err(LoadError::schema(path, "description must be a string")),
    };

    let kind = match (object.get("children"), object.get("message")) {
        (Some(_), Some(_)) => {
            return Err(LoadError::schema(
                path,
                "category nodes may not carry a message",
            ));
        }
        (Some(children), None) => NodeKind::Category {
            children: build_children(children, path)?,
        },
        (None, Some(Value::String(m))) if !m.is_empty() => NodeKind::Leaf {
            message: Some(m.clone()),
        },
        (None, Some(Value::String(_))) => {
            return Err(LoadError::schema(path, "leaf message must not be empty"));
        }
        (None, Some(_)) => return Err(LoadError::schema(path, "message must be a string")),
        (None, None) => NodeKind::Leaf { message: None },
    };

    Ok(TreeNode {
        title,
        description,
        kind,
    })
}

fn build_children(
    value: &Value,
    path: &mut Vec<String>,
) -> Result<Vec<(String, TreeNode)>, LoadError> {
    let entries: &Map<String, Value> = value
        .as_object()
        .ok_or_else(|| LoadError::schema(path, "children must be a JSON object"))?;

    let mut children = Vec::with_capacity(entries.len());
    for (key, child) in entries {
        path.push(key.clone());
        let node = build_node(child, path)?;
        path.pop();
        children.push((key.clone(), node));
    }
    Ok(children)
}

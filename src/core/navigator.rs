//! # Navigator
//!
//! Per-session position in the concept tree.
//!
//! The position is a path of child keys from the root (empty = root). It is
//! only ever extended with keys that were checked against the tree, so
//! resolving it cannot fail.
//!
//! ```text
//!   enter("a")      enter("leaf1")
//! / ──────────► /a ───────────────► /a/leaf1
//!   ◄──────────    ◄───────────────
//!     back()            back()
//! ```

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::core::tree::{Tree, TreeNode, render_path};

/// A navigation request the current state does not allow. The path is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidTransition {
    /// `enter` on a node that is not a category.
    NotACategory { title: String },
    /// `enter` with a key that is not a child of the current node.
    UnknownKey { key: String },
    /// `back` while at the root.
    AtRoot,
    /// `jump_to` with a path that does not exist in the tree.
    UnknownPath { path: String },
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidTransition::NotACategory { title } => {
                write!(f, "\"{title}\" has no sub-topics")
            }
            InvalidTransition::UnknownKey { key } => write!(f, "no sub-topic named \"{key}\""),
            InvalidTransition::AtRoot => write!(f, "already at root"),
            InvalidTransition::UnknownPath { path } => write!(f, "no node at {path}"),
        }
    }
}

impl std::error::Error for InvalidTransition {}

/// One breadcrumb entry. The root has no key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub key: Option<String>,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    tree: Arc<Tree>,
    path: Vec<String>,
}

impl Navigator {
    /// Starts a session at the root.
    pub fn new(tree: Arc<Tree>) -> Self {
        Self {
            tree,
            path: Vec::new(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Another handle on the same tree, for components that outlive a borrow.
    pub fn shared_tree(&self) -> Arc<Tree> {
        Arc::clone(&self.tree)
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn current(&self) -> &TreeNode {
        self.tree
            .resolve(&self.path)
            .expect("navigator path only holds keys validated against the tree")
    }

    pub fn is_leaf(&self) -> bool {
        self.current().is_leaf()
    }

    /// Children of the current node in display order.
    pub fn children(&self) -> &[(String, TreeNode)] {
        self.current().children()
    }

    /// The message a send would deliver, if the current node is a leaf that has one.
    pub fn sendable_message(&self) -> Option<&str> {
        self.current().message()
    }

    pub fn enter(&mut self, key: &str) -> Result<(), InvalidTransition> {
        let current = self.current();
        if !current.is_category() {
            return Err(InvalidTransition::NotACategory {
                title: current.title.clone(),
            });
        }
        if current.child(key).is_none() {
            return Err(InvalidTransition::UnknownKey {
                key: key.to_string(),
            });
        }
        self.path.push(key.to_string());
        debug!("Entered {}", render_path(&self.path));
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), InvalidTransition> {
        if self.path.pop().is_none() {
            return Err(InvalidTransition::AtRoot);
        }
        debug!("Back to {}", render_path(&self.path));
        Ok(())
    }

    pub fn reset_to_root(&mut self) {
        self.path.clear();
    }

    /// Replaces the whole path at once. Every segment is checked first.
    pub fn jump_to(&mut self, path: &[String]) -> Result<(), InvalidTransition> {
        if self.tree.resolve(path).is_none() {
            return Err(InvalidTransition::UnknownPath {
                path: render_path(path),
            });
        }
        self.path = path.to_vec();
        debug!("Jumped to {}", render_path(&self.path));
        Ok(())
    }

    /// Root-to-current `(key, title)` pairs, current node included.
    pub fn breadcrumb(&self) -> Vec<Crumb> {
        let mut crumbs = Vec::with_capacity(self.path.len() + 1);
        let mut node = self.tree.root();
        crumbs.push(Crumb {
            key: None,
            title: node.title.clone(),
        });
        for key in &self.path {
            match node.child(key) {
                Some(child) => {
                    node = child;
                    crumbs.push(Crumb {
                        key: Some(key.clone()),
                        title: node.title.clone(),
                    });
                }
                None => break,
            }
        }
        crumbs
    }
}

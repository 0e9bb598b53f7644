//! Whole-tree counts for the sidebar.

use crate::core::tree::Tree;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStatistics {
    /// Nodes carrying a children mapping, empty or not. Includes the root.
    pub category_count: usize,
    /// Every other node, whether or not it has a message.
    pub leaf_count: usize,
    /// Leaves with a message to send.
    pub sendable_leaf_count: usize,
    /// Length of the longest key path from the root.
    pub max_depth: usize,
}

impl TreeStatistics {
    pub fn total(&self) -> usize {
        self.category_count + self.leaf_count
    }
}

/// One depth-first pass over the tree. Pure; safe to call repeatedly.
pub fn compute_statistics(tree: &Tree) -> TreeStatistics {
    let mut stats = TreeStatistics::default();
    tree.visit(|path, node| {
        if node.is_category() {
            stats.category_count += 1;
        } else {
            stats.leaf_count += 1;
            if node.message().is_some() {
                stats.sendable_leaf_count += 1;
            }
        }
        stats.max_depth = stats.max_depth.max(path.len());
    });
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::load;
    use crate::test_support::SAMPLE_MAP;

    #[test]
    fn test_sample_counts() {
        let stats = compute_statistics(&load(SAMPLE_MAP).unwrap());
        assert_eq!(stats.category_count, 2);
        assert_eq!(stats.leaf_count, 1);
        assert_eq!(stats.sendable_leaf_count, 1);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn test_silent_leaf_and_empty_category() {
        let tree = load(
            r#"{"title":"R","children":{
                "e":{"title":"E","children":{}},
                "s":{"title":"S"},
                "m":{"title":"M","message":"go"}}}"#,
        )
        .unwrap();
        let stats = compute_statistics(&tree);
        assert_eq!(stats.category_count, 2);
        assert_eq!(stats.leaf_count, 2);
        assert_eq!(stats.sendable_leaf_count, 1);
    }

    #[test]
    fn test_root_only_leaf() {
        let stats = compute_statistics(&load(r#"{"title":"Only","message":"x"}"#).unwrap());
        assert_eq!(stats.category_count, 0);
        assert_eq!(stats.leaf_count, 1);
        assert_eq!(stats.max_depth, 0);
    }

    #[test]
    fn test_repeatable() {
        let tree = load(SAMPLE_MAP).unwrap();
        assert_eq!(compute_statistics(&tree), compute_statistics(&tree));
    }
}

//! Expand/collapse state
//!
//! Kept beside the tree, keyed by folder path, so the tree itself stays
//! immutable and a refetched tree keeps whatever was open before.

use crate::search::Query;
use crate::tree::TreeNode;
use std::collections::HashSet;

/// Which folders are open. Folders start collapsed.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The folder's own state, ignoring any active search
    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// Whether the folder is shown open: a non-empty query opens everything
    pub fn is_open(&self, path: &str, query: &Query) -> bool {
        !query.is_empty() || self.is_expanded(path)
    }

    pub fn expand(&mut self, path: &str) {
        self.expanded.insert(path.to_string());
    }

    pub fn collapse(&mut self, path: &str) {
        self.expanded.remove(path);
    }

    /// Flip a folder; returns the new state
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_string());
            true
        }
    }

    /// Open `folder` and every folder below it
    pub fn expand_all(&mut self, folder: &TreeNode) {
        for path in folder.folder_paths() {
            self.expand(path);
        }
    }

    /// Close `folder` only. Descendants keep their state and show it again
    /// the next time `folder` is opened.
    pub fn collapse_all(&mut self, folder: &TreeNode) {
        self.collapse(folder.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;
    use browser_core::Secret;

    fn tree() -> TreeNode {
        build_tree(&[
            Secret::new("DB_HOST", "db.local", "/prod/db"),
            Secret::new("REPLICA", "r1", "/prod/db/replicas"),
            Secret::new("API_KEY", "abc123", "/prod"),
            Secret::new("DEBUG", "1", "/dev"),
        ])
    }

    #[test]
    fn test_default_collapsed() {
        let state = ExpansionState::new();
        assert!(!state.is_expanded("/prod"));
        assert!(!state.is_open("/prod", &Query::default()));
    }

    #[test]
    fn test_toggle() {
        let mut state = ExpansionState::new();
        assert!(state.toggle("/prod"));
        assert!(state.is_expanded("/prod"));
        assert!(!state.toggle("/prod"));
        assert!(!state.is_expanded("/prod"));
    }

    #[test]
    fn test_expand_all_reaches_every_descendant() {
        let root = tree();
        let mut state = ExpansionState::new();
        state.expand_all(root.find_folder("/prod").unwrap());

        assert!(state.is_expanded("/prod"));
        assert!(state.is_expanded("/prod/db"));
        assert!(state.is_expanded("/prod/db/replicas"));
        assert!(!state.is_expanded("/dev"));
    }

    #[test]
    fn test_collapse_all_only_closes_that_folder() {
        let root = tree();
        let prod = root.find_folder("/prod").unwrap();
        let mut state = ExpansionState::new();
        state.expand_all(prod);
        state.collapse_all(prod);

        assert!(!state.is_expanded("/prod"));
        assert!(state.is_expanded("/prod/db"));
        assert!(state.is_expanded("/prod/db/replicas"));
    }

    #[test]
    fn test_search_overrides_collapse() {
        let mut state = ExpansionState::new();
        state.expand("/prod");
        state.collapse("/prod");

        let query = Query::new("api");
        assert!(state.is_open("/prod", &query));
        assert!(!state.is_expanded("/prod"));

        // Manual state comes back once the query is cleared
        assert!(!state.is_open("/prod", &Query::new("")));
    }
}

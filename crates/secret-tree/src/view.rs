//! Visible rows
//!
//! Flattens the part of the tree a user can currently see into a list of
//! rows, depth first, for rendering and cursor movement. The root itself is
//! not a row; its children sit at depth 0.

use crate::expand::ExpansionState;
use crate::search::{Highlight, Query};
use crate::tree::TreeNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub node: &'a TreeNode,
    pub depth: usize,
    /// Folder shown open (always false for secrets)
    pub open: bool,
    /// Children that pass the current filter (always 0 for secrets)
    pub visible_children: usize,
    pub name_match: Option<Highlight>,
    pub value_match: Option<Highlight>,
}

/// Rows for everything visible under `root` given a query and the
/// expansion state
pub fn visible_rows<'a>(root: &'a TreeNode, query: &Query, expansion: &ExpansionState) -> Vec<Row<'a>> {
    let mut rows = Vec::new();
    push_children(root, 0, query, expansion, &mut rows);
    rows
}

fn push_children<'a>(
    folder: &'a TreeNode,
    depth: usize,
    query: &Query,
    expansion: &ExpansionState,
    rows: &mut Vec<Row<'a>>,
) {
    for child in query.visible_children(folder) {
        let open = child.is_folder() && expansion.is_open(child.path(), query);
        let visible_children = if child.is_folder() {
            query.visible_children(child).len()
        } else {
            0
        };

        rows.push(Row {
            node: child,
            depth,
            open,
            visible_children,
            name_match: query.name_match(child),
            value_match: query.value_match(child),
        });

        if open {
            push_children(child, depth + 1, query, expansion, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;
    use browser_core::Secret;

    fn scenario() -> TreeNode {
        build_tree(&[
            Secret::new("DB_HOST", "db.local", "/prod/db"),
            Secret::new("DB_PORT", "5432", "/prod/db"),
            Secret::new("API_KEY", "abc123", "/prod"),
        ])
    }

    fn summary(rows: &[Row]) -> Vec<(usize, String)> {
        rows.iter().map(|r| (r.depth, r.node.name().to_string())).collect()
    }

    #[test]
    fn test_collapsed_tree_shows_top_level_only() {
        let root = scenario();
        let rows = visible_rows(&root, &Query::default(), &ExpansionState::new());
        assert_eq!(summary(&rows), vec![(0, "prod".to_string())]);
        assert!(!rows[0].open);
        assert_eq!(rows[0].visible_children, 2);
    }

    #[test]
    fn test_expanded_tree_in_order() {
        let root = scenario();
        let mut state = ExpansionState::new();
        state.expand_all(&root);

        let rows = visible_rows(&root, &Query::default(), &state);
        assert_eq!(
            summary(&rows),
            vec![
                (0, "prod".to_string()),
                (1, "db".to_string()),
                (2, "DB_HOST".to_string()),
                (2, "DB_PORT".to_string()),
                (1, "API_KEY".to_string()),
            ]
        );
        assert!(rows.iter().all(|r| r.name_match.is_none() && r.value_match.is_none()));
    }

    #[test]
    fn test_query_forces_folders_open() {
        let root = scenario();
        let mut state = ExpansionState::new();
        state.collapse("/prod");

        let rows = visible_rows(&root, &Query::new("5432"), &state);
        assert_eq!(
            summary(&rows),
            vec![(0, "prod".to_string()), (1, "db".to_string()), (2, "DB_PORT".to_string())]
        );
        assert!(rows[0].open && rows[1].open);
        assert_eq!(rows[0].visible_children, 1);
        assert_eq!(rows[2].value_match, Some(Highlight { start: 0, len: 4 }));
    }

    #[test]
    fn test_collapsed_child_hides_its_subtree() {
        let root = scenario();
        let mut state = ExpansionState::new();
        state.expand_all(&root);
        state.collapse_all(root.find_folder("/prod/db").unwrap());

        let rows = visible_rows(&root, &Query::default(), &state);
        assert_eq!(
            summary(&rows),
            vec![(0, "prod".to_string()), (1, "db".to_string()), (1, "API_KEY".to_string())]
        );
    }

    #[test]
    fn test_rows_borrow_only_the_tree() {
        let root = scenario();
        let rows = {
            let query = Query::new("api");
            let state = ExpansionState::new();
            visible_rows(&root, &query, &state)
        };
        assert_eq!(summary(&rows), vec![(0, "prod".to_string()), (1, "API_KEY".to_string())]);
    }

    #[test]
    fn test_name_highlight_on_folders() {
        let root = scenario();
        let rows = visible_rows(&root, &Query::new("DB"), &ExpansionState::new());
        let db = rows.iter().find(|r| r.node.name() == "db").unwrap();
        assert_eq!(db.name_match, Some(Highlight { start: 0, len: 2 }));
        // DB_HOST matches by name and value
        let host = rows.iter().find(|r| r.node.name() == "DB_HOST").unwrap();
        assert!(host.name_match.is_some() && host.value_match.is_some());
    }
}

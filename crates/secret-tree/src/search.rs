//! Search and filtering
//!
//! A secret matches when the query occurs in its name or its value,
//! ignoring case. A folder is visible when anything below it matches. An
//! empty query shows everything.

use crate::tree::TreeNode;
use std::ops::Range;

/// First occurrence of the query inside a piece of text, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize,
    pub len: usize,
}

impl Highlight {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Text before, inside and after the highlighted span
    pub fn split<'t>(&self, text: &'t str) -> (&'t str, &'t str, &'t str) {
        let range = self.range();
        (&text[..range.start], &text[range.clone()], &text[range.end..])
    }
}

/// A search query, lowercased once up front
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    raw: String,
    needle: String,
}

impl Query {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            needle: lowercase(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Where the query first occurs in `text`, ignoring case.
    ///
    /// The span is reported in bytes of `text` itself, so it can be sliced
    /// directly even when lowercasing changes character widths.
    pub fn find_in(&self, text: &str) -> Option<Highlight> {
        if self.needle.is_empty() {
            return None;
        }

        'start: for (start, _) in text.char_indices() {
            let mut needle = self.needle.chars().peekable();

            for (offset, c) in text[start..].char_indices() {
                // A needle may end inside a multi-char lowering ("İ" -> "i̇");
                // the span then covers the whole original character.
                for lower in c.to_lowercase() {
                    match needle.next() {
                        Some(n) if n == lower => {}
                        None => break,
                        Some(_) => continue 'start,
                    }
                }
                if needle.peek().is_none() {
                    return Some(Highlight {
                        start,
                        len: offset + c.len_utf8(),
                    });
                }
            }

            // Ran out of text; later starts are shorter still
            return None;
        }

        None
    }

    pub fn matches(&self, text: &str) -> bool {
        self.find_in(text).is_some()
    }

    /// Whether a node should be shown.
    ///
    /// Secrets are tested on name and value; folders are visible when any
    /// descendant at any depth is.
    pub fn is_visible(&self, node: &TreeNode) -> bool {
        if self.is_empty() {
            return true;
        }
        match node {
            TreeNode::Secret { name, value, .. } => self.matches(name) || self.matches(value),
            TreeNode::Folder { children, .. } => children.iter().any(|c| self.is_visible(c)),
        }
    }

    /// The children of `node` that pass the filter, in tree order
    pub fn visible_children<'n>(&self, node: &'n TreeNode) -> Vec<&'n TreeNode> {
        node.children().iter().filter(|c| self.is_visible(c)).collect()
    }

    /// Highlight for a node's name
    pub fn name_match(&self, node: &TreeNode) -> Option<Highlight> {
        self.find_in(node.name())
    }

    /// Highlight for a secret's value; folders have none
    pub fn value_match(&self, node: &TreeNode) -> Option<Highlight> {
        node.value().and_then(|v| self.find_in(v))
    }
}

// Per character, so the needle and the text are folded the same way.
fn lowercase(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
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

    fn visible_paths<'a>(query: &Query, node: &'a TreeNode, out: &mut Vec<&'a str>) {
        if query.is_visible(node) {
            out.push(node.path());
            for child in node.children() {
                visible_paths(query, child, out);
            }
        }
    }

    fn all_paths(query: &Query, root: &TreeNode) -> Vec<String> {
        let mut out = Vec::new();
        visible_paths(query, root, &mut out);
        out.into_iter().map(String::from).collect()
    }

    #[test]
    fn test_find_in_is_case_insensitive() {
        let q = Query::new("Port");
        assert_eq!(q.find_in("DB_PORT"), Some(Highlight { start: 3, len: 4 }));
        assert_eq!(q.find_in("db_port_port"), Some(Highlight { start: 3, len: 4 }));
        assert_eq!(q.find_in("DB_HOST"), None);
        assert_eq!(q.find_in(""), None);
    }

    #[test]
    fn test_find_in_reports_original_byte_offsets() {
        let q = Query::new("straße");
        let text = "Hauptstraße 1";
        let h = q.find_in(text).unwrap();
        assert_eq!(h.split(text), ("Haupt", "straße", " 1"));

        let q = Query::new("ÅR");
        let h = q.find_in("fem år").unwrap();
        assert_eq!(h.split("fem år"), ("fem ", "år", ""));
    }

    #[test]
    fn test_find_in_needle_ending_inside_expanded_char() {
        // "İ" lowercases to "i" plus a combining dot
        let q = Query::new("i");
        assert!(q.matches("İSTANBUL"));
        assert_eq!(q.find_in("İSTANBUL"), Some(Highlight { start: 0, len: 2 }));

        let h = Query::new("xi").find_in("XİY").unwrap();
        assert_eq!(h.split("XİY"), ("", "Xİ", "Y"));

        assert!(!Query::new("iy").matches("İY"));
    }

    #[test]
    fn test_find_in_only_first_occurrence() {
        let q = Query::new("ab");
        let h = q.find_in("xxABxxab").unwrap();
        assert_eq!(h.range(), 2..4);
    }

    #[test]
    fn test_empty_query_shows_everything() {
        let root = scenario();
        let q = Query::new("");
        assert!(q.is_empty());
        assert_eq!(
            all_paths(&q, &root),
            vec!["/", "/prod", "/prod/db", "/prod/db/DB_HOST", "/prod/db/DB_PORT", "/prod/API_KEY"]
        );
        assert_eq!(q.name_match(&root.children()[0]), None);
    }

    #[test]
    fn test_value_match_reveals_ancestors() {
        let root = scenario();
        let q = Query::new("5432");
        assert_eq!(all_paths(&q, &root), vec!["/", "/prod", "/prod/db", "/prod/db/DB_PORT"]);

        let port = &root.children()[0].children()[0].children()[1];
        assert_eq!(q.value_match(port), Some(Highlight { start: 0, len: 4 }));
        assert_eq!(q.name_match(port), None);
    }

    #[test]
    fn test_name_match() {
        let root = scenario();
        let q = Query::new("api_");
        assert_eq!(all_paths(&q, &root), vec!["/", "/prod", "/prod/API_KEY"]);
    }

    #[test]
    fn test_no_match_hides_root_contents() {
        let root = scenario();
        let q = Query::new("nothing-like-this");
        assert!(!q.is_visible(&root));
        assert!(q.visible_children(&root).is_empty());
    }

    #[test]
    fn test_deep_match_keeps_every_ancestor() {
        let root = build_tree(&[
            Secret::new("LEAF", "needle", "/a/b/c/d/e"),
            Secret::new("OTHER", "hay", "/a/x"),
        ]);
        let q = Query::new("NEEDLE");
        let a = root.find_folder("/a").unwrap();
        assert!(q.is_visible(a));
        assert!(!q.is_visible(root.find_folder("/a/x").unwrap()));

        let names: Vec<_> = q.visible_children(a).into_iter().map(TreeNode::name).collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn test_folder_visibility_matches_descendants_everywhere() {
        let root = build_tree(&[
            Secret::new("ALPHA", "one", "/x/y"),
            Secret::new("BETA", "two", "/x/z/w"),
            Secret::new("GAMMA", "three", "/q"),
            Secret::new("alphabet", "four", "/q/r"),
        ]);

        fn descendant_matches(q: &Query, node: &TreeNode) -> bool {
            node.children().iter().any(|c| match c {
                TreeNode::Secret { name, value, .. } => q.matches(name) || q.matches(value),
                TreeNode::Folder { .. } => descendant_matches(q, c),
            })
        }

        for term in ["alpha", "t", "w", "zzz", "E", "our"] {
            let q = Query::new(term);
            for path in root.folder_paths() {
                let folder = root.find_folder(path).unwrap();
                assert_eq!(q.is_visible(folder), descendant_matches(&q, folder), "{} / {}", term, path);
            }
        }
    }
}

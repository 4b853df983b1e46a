//! secret-tree - Turn a flat secret list into a browsable hierarchy
//!
//! - `tree`: builds the canonical, ordered folder tree from secret paths
//! - `search`: case-insensitive matching, highlight spans, visibility
//! - `expand`: per-folder expand/collapse state kept beside the tree
//! - `view`: the visible rows for a given query and expansion state
//!
//! The tree is immutable once built. Searching and expanding never touch
//! it; they only decide which of its nodes are shown.

pub mod expand;
pub mod search;
pub mod tree;
pub mod view;

pub use expand::ExpansionState;
pub use search::{Highlight, Query};
pub use tree::{build_tree, NodeKind, TreeNode};
pub use view::{visible_rows, Row};

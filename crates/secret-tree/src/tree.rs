//! Tree builder
//!
//! Secret paths like "/prod/db" become nested folders; each secret becomes
//! a leaf in the folder its path names. Within every folder, subfolders come
//! first and then secrets, each group ordered by name.

use browser_core::Secret;
use std::cmp::Ordering;
use std::fmt;

pub const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeKind {
    Folder,
    Secret,
}

/// A node of the secret tree
#[derive(Clone, PartialEq, Eq)]
pub enum TreeNode {
    Folder {
        name: String,
        /// Cumulative path from the root, e.g. "/prod/db"
        path: String,
        children: Vec<TreeNode>,
    },
    Secret {
        name: String,
        /// Folder path of the secret, a slash, then its key
        path: String,
        value: String,
    },
}

impl TreeNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Folder { .. } => NodeKind::Folder,
            Self::Secret { .. } => NodeKind::Secret,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == NodeKind::Folder
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Folder { name, .. } | Self::Secret { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Folder { path, .. } | Self::Secret { path, .. } => path,
        }
    }

    /// Children of a folder; secrets have none
    pub fn children(&self) -> &[TreeNode] {
        match self {
            Self::Folder { children, .. } => children,
            Self::Secret { .. } => &[],
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Secret { value, .. } => Some(value),
            Self::Folder { .. } => None,
        }
    }

    /// Number of secret leaves at or below this node
    pub fn secret_count(&self) -> usize {
        match self {
            Self::Secret { .. } => 1,
            Self::Folder { children, .. } => children.iter().map(TreeNode::secret_count).sum(),
        }
    }

    /// Find a folder by its path
    pub fn find_folder(&self, path: &str) -> Option<&TreeNode> {
        if !self.is_folder() {
            return None;
        }
        if self.path() == path {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find_folder(path))
    }

    /// Every folder path at or below this node, depth first
    pub fn folder_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.collect_folder_paths(&mut paths);
        paths
    }

    fn collect_folder_paths<'a>(&'a self, paths: &mut Vec<&'a str>) {
        if let Self::Folder { path, children, .. } = self {
            paths.push(path);
            for child in children {
                child.collect_folder_paths(paths);
            }
        }
    }
}

// Values stay out of debug output.
impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder { name, path, children } => f
                .debug_struct("Folder")
                .field("name", name)
                .field("path", path)
                .field("children", children)
                .finish(),
            Self::Secret { name, path, .. } => f
                .debug_struct("Secret")
                .field("name", name)
                .field("path", path)
                .finish_non_exhaustive(),
        }
    }
}

/// Folders before secrets, then by name (case-sensitive, byte order)
pub fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    a.kind().cmp(&b.kind()).then_with(|| a.name().cmp(b.name()))
}

/// A folder under construction. Subfolders and secrets are kept apart so
/// lookups only ever see folders.
struct PendingFolder {
    name: String,
    path: String,
    folders: Vec<PendingFolder>,
    secrets: Vec<TreeNode>,
}

impl PendingFolder {
    fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            folders: Vec::new(),
            secrets: Vec::new(),
        }
    }

    /// Existing subfolder with this name, or a new one
    fn subfolder(&mut self, name: &str, path: &str) -> &mut PendingFolder {
        let index = match self.folders.iter().position(|f| f.name == name) {
            Some(index) => index,
            None => {
                self.folders.push(PendingFolder::new(name, path));
                self.folders.len() - 1
            }
        };
        &mut self.folders[index]
    }

    fn into_node(self) -> TreeNode {
        let mut children: Vec<TreeNode> = self.folders.into_iter().map(PendingFolder::into_node).collect();
        children.extend(self.secrets);
        // Stable, so secrets sharing a name keep their insertion order
        children.sort_by(compare_nodes);

        TreeNode::Folder {
            name: self.name,
            path: self.path,
            children,
        }
    }
}

/// Build the folder tree for a list of secrets.
///
/// Every secret produces exactly one leaf, including secrets that repeat a
/// (path, key) pair; those end up as adjacent siblings in the order they
/// appeared in `secrets`. Empty path segments are ignored, so "//a//b"
/// and "/a/b" land in the same folder and "" lands at the root.
pub fn build_tree(secrets: &[Secret]) -> TreeNode {
    let mut sorted: Vec<&Secret> = secrets.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut root = PendingFolder::new(ROOT_PATH, ROOT_PATH);

    for secret in sorted {
        let mut folder = &mut root;
        let mut cumulative = String::new();

        for segment in secret.path.split('/').filter(|s| !s.is_empty()) {
            cumulative.push('/');
            cumulative.push_str(segment);
            folder = folder.subfolder(segment, &cumulative);
        }

        folder.secrets.push(TreeNode::Secret {
            name: secret.key.clone(),
            path: secret.node_path(),
            value: secret.value.clone(),
        });
    }

    root.into_node()
}

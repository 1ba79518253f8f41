use serde::{Deserialize, Serialize};

/// A node in a treemap: a file or a directory with a size weight.
///
/// This is also the JSON treemap document format (`isDirectory` in camelCase,
/// `path` optional, `size` and `children` defaulted when missing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub is_directory: bool,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a file leaf.
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: None,
            size,
            is_directory: false,
            children: Vec::new(),
        }
    }

    /// Create a directory whose size is the sum of its children.
    pub fn directory(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        let size = children.iter().map(|c| c.size).sum();
        Self {
            name: name.into(),
            path: None,
            size,
            is_directory: true,
            children,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Copy of this node with the same scalar fields and a new children sequence.
    pub fn with_children(&self, children: Vec<TreeNode>) -> Self {
        Self {
            name: self.name.clone(),
            path: self.path.clone(),
            size: self.size,
            is_directory: self.is_directory,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Sum of leaf sizes in this subtree. Ignores the `size` recorded on
    /// directories, which documents may leave unset.
    pub fn leaf_size(&self) -> u64 {
        if self.is_leaf() {
            self.size
        } else {
            self.children.iter().map(TreeNode::leaf_size).sum()
        }
    }
}

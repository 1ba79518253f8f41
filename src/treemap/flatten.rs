use std::collections::HashSet;

use crate::treemap::node::TreeNode;

/// A flattened representation of a tree node for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatItem {
    pub name: String,
    /// Stable identity of the row: the node's path, or its `/`-joined ancestry.
    pub key: String,
    pub size: u64,
    pub is_directory: bool,
    pub depth: usize,
    pub is_last_sibling: bool,
    pub is_collapsed: bool,
    pub child_count: usize,
}

/// Flatten a tree into rows, skipping everything under a collapsed key.
///
/// The root is always the first row, at depth 0.
pub fn flatten(root: &TreeNode, collapsed: &HashSet<String>) -> Vec<FlatItem> {
    let mut items = Vec::new();
    let key = root.path.clone().unwrap_or_else(|| root.name.clone());
    flatten_node(root, key, 0, true, collapsed, &mut items);
    items
}

fn flatten_node(
    node: &TreeNode,
    key: String,
    depth: usize,
    is_last: bool,
    collapsed: &HashSet<String>,
    items: &mut Vec<FlatItem>,
) {
    let is_collapsed = !node.children.is_empty() && collapsed.contains(&key);
    items.push(FlatItem {
        name: node.name.clone(),
        key: key.clone(),
        size: node.size,
        is_directory: node.is_directory,
        depth,
        is_last_sibling: is_last,
        is_collapsed,
        child_count: node.children.len(),
    });

    if is_collapsed {
        return;
    }

    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let child_key = child_key(&key, child);
        flatten_node(child, child_key, depth + 1, i == count - 1, collapsed, items);
    }
}

fn child_key(parent_key: &str, child: &TreeNode) -> String {
    match &child.path {
        Some(path) => path.clone(),
        None => format!("{}/{}", parent_key, child.name),
    }
}

/// Build the box-drawing indentation for the row at `index`.
///
/// Continuation lines depend on whether each ancestor was the last of its
/// siblings, found by walking back through the rows.
pub fn tree_prefix(items: &[FlatItem], index: usize) -> String {
    let item = &items[index];
    if item.depth == 0 {
        return String::new();
    }

    let mut parts: Vec<&str> = Vec::new();
    for d in 1..item.depth {
        let mut ancestor_is_last = false;
        for j in (0..index).rev() {
            if items[j].depth == d {
                ancestor_is_last = items[j].is_last_sibling;
                break;
            }
            if items[j].depth < d {
                break;
            }
        }
        parts.push(if ancestor_is_last { "   " } else { "│  " });
    }

    parts.push(if item.is_last_sibling { "└──" } else { "├──" });
    parts.join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> TreeNode {
        TreeNode::directory(
            "root",
            vec![
                TreeNode::directory(
                    "src",
                    vec![
                        TreeNode::file("main.js", 100).with_path("src/main.js"),
                        TreeNode::file("utils.js", 40),
                    ],
                )
                .with_path("src"),
                TreeNode::directory("assets", vec![TreeNode::file("image.png", 2048)]),
            ],
        )
    }

    #[test]
    fn flatten_lists_rows_depth_first() {
        let rows = flatten(&sample_tree(), &HashSet::new());
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["root", "src", "main.js", "utils.js", "assets", "image.png"]
        );
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[2].depth, 2);
        assert_eq!(rows[1].child_count, 2);
    }

    #[test]
    fn keys_prefer_path_and_fall_back_to_ancestry() {
        let rows = flatten(&sample_tree(), &HashSet::new());
        assert_eq!(rows[0].key, "root");
        assert_eq!(rows[1].key, "src");
        assert_eq!(rows[2].key, "src/main.js");
        assert_eq!(rows[3].key, "src/utils.js");
        assert_eq!(rows[4].key, "root/assets");
        assert_eq!(rows[5].key, "root/assets/image.png");
    }

    #[test]
    fn last_sibling_flags() {
        let rows = flatten(&sample_tree(), &HashSet::new());
        assert!(rows[0].is_last_sibling);
        assert!(!rows[1].is_last_sibling);
        assert!(rows[3].is_last_sibling);
        assert!(rows[4].is_last_sibling);
    }

    #[test]
    fn collapsed_directories_hide_children() {
        let collapsed: HashSet<String> = ["src".to_string()].into_iter().collect();
        let rows = flatten(&sample_tree(), &collapsed);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["root", "src", "assets", "image.png"]);
        assert!(rows[1].is_collapsed);
    }

    #[test]
    fn collapsing_a_leaf_is_ignored() {
        let collapsed: HashSet<String> = ["src/main.js".to_string()].into_iter().collect();
        let rows = flatten(&sample_tree(), &collapsed);
        assert_eq!(rows.len(), 6);
        assert!(!rows[2].is_collapsed);
    }

    #[test]
    fn prefixes_use_box_drawing() {
        let rows = flatten(&sample_tree(), &HashSet::new());
        assert_eq!(tree_prefix(&rows, 0), "");
        assert_eq!(tree_prefix(&rows, 1), "├──");
        assert_eq!(tree_prefix(&rows, 2), "│  ├──");
        assert_eq!(tree_prefix(&rows, 3), "│  └──");
        assert_eq!(tree_prefix(&rows, 4), "└──");
        assert_eq!(tree_prefix(&rows, 5), "   └──");
    }
}

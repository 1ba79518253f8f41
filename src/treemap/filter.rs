//! Recursive search filter over a treemap.
//!
//! The root is never matched itself; only its subtree is filtered. Every
//! surviving node is a fresh copy, the input tree is left untouched.

use std::borrow::Cow;

use super::node::TreeNode;
use super::search::{is_container_name, SearchContext};

/// Filter `root` with a raw search string.
///
/// - `Some(Cow::Borrowed(root))`: the query is empty, nothing was filtered.
/// - `Some(Cow::Owned(_))`: a new root holding the surviving subtrees.
/// - `None`: nothing below the root matched.
pub fn filter_tree<'a>(root: &'a TreeNode, query: &str) -> Option<Cow<'a, TreeNode>> {
    let ctx = SearchContext::new(query);
    filter_with_context(root, &ctx)
}

/// Same as [`filter_tree`] with an already built context.
pub fn filter_with_context<'a>(
    root: &'a TreeNode,
    ctx: &SearchContext,
) -> Option<Cow<'a, TreeNode>> {
    if ctx.is_empty() {
        return Some(Cow::Borrowed(root));
    }

    let children = filter_children(&root.children, ctx, 0);
    if children.is_empty() {
        None
    } else {
        Some(Cow::Owned(root.with_children(children)))
    }
}

fn filter_children(children: &[TreeNode], ctx: &SearchContext, path_idx: usize) -> Vec<TreeNode> {
    children
        .iter()
        .filter_map(|child| filter_node(child, ctx, path_idx))
        .collect()
}

/// Decide the fate of one non-root node. Branch order matters: exact mode
/// must win over the reveal-everything shortcut.
fn filter_node(node: &TreeNode, ctx: &SearchContext, path_idx: usize) -> Option<TreeNode> {
    let name_lower = node.name.to_lowercase();
    let current = ctx.current_node_matches(&name_lower, path_idx);
    let next_idx = ctx.advance_path_idx(&name_lower, path_idx);

    if current && ctx.is_exact {
        return Some(node.with_children(filter_children(&node.children, ctx, next_idx)));
    }

    if current && ctx.direct_name_match(&name_lower) {
        if is_container_name(&node.name) {
            return Some(node.with_children(filter_children(&node.children, ctx, next_idx)));
        }
        return Some(node.clone());
    }

    // Kept only as an ancestor of something that survives
    let child_idx = if current { next_idx } else { path_idx };
    let children = filter_children(&node.children, ctx, child_idx);
    if children.is_empty() {
        None
    } else {
        Some(node.with_children(children))
    }
}

/// Summary of a filter result, for status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Empty query, the whole tree is shown.
    Unchanged,
    /// Something survived: node count below the root and the summed size of
    /// the surviving leaves.
    Filtered { nodes: usize, size: u64 },
    NoMatch,
}

impl FilterOutcome {
    pub fn of(result: &Option<Cow<'_, TreeNode>>) -> Self {
        match result {
            None => FilterOutcome::NoMatch,
            Some(Cow::Borrowed(_)) => FilterOutcome::Unchanged,
            Some(Cow::Owned(root)) => FilterOutcome::Filtered {
                nodes: root.node_count() - 1,
                size: root.leaf_size(),
            },
        }
    }
}

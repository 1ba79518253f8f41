//! Batch-mode output: box-drawing text tree or pretty JSON.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::error::Result;
use crate::treemap::flatten::{flatten, tree_prefix};
use crate::treemap::node::TreeNode;

/// Human-readable size using 1024-based units.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Render a tree as text, one node per line.
pub fn render_text(root: &TreeNode, show_sizes: bool) -> String {
    let rows = flatten(root, &HashSet::new());
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        let prefix = tree_prefix(&rows, i);
        let sep = if prefix.is_empty() { "" } else { " " };
        let slash = if row.is_directory { "/" } else { "" };
        if show_sizes {
            let _ = writeln!(
                out,
                "{prefix}{sep}{}{slash} ({})",
                row.name,
                format_size(row.size)
            );
        } else {
            let _ = writeln!(out, "{prefix}{sep}{}{slash}", row.name);
        }
    }
    out
}

/// Render a filter result as pretty JSON; `null` when nothing matched.
pub fn render_json(root: Option<&TreeNode>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&root)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::treemap::filter_tree;

    fn sample_tree() -> TreeNode {
        TreeNode::directory(
            "root",
            vec![
                TreeNode::directory(
                    "src",
                    vec![
                        TreeNode::file("main.js", 100),
                        TreeNode::file("utils.js", 2048),
                    ],
                ),
                TreeNode::file("README.md", 10),
            ],
        )
    }

    #[test]
    fn format_size_bytes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_size(1024u64.pow(4)), "1.00 TB");
    }

    #[test]
    fn text_without_sizes() {
        let text = render_text(&sample_tree(), false);
        let expected = "root/\n├── src/\n│  ├── main.js\n│  └── utils.js\n└── README.md\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn text_with_sizes() {
        let text = render_text(&sample_tree(), true);
        let first = text.lines().next().unwrap();
        assert_eq!(first, "root/ (2.11 KB)");
        assert!(text.contains("└── utils.js (2.00 KB)"));
        assert!(text.contains("├── main.js (100 B)"));
    }

    #[test]
    fn text_of_filtered_tree() {
        let root = sample_tree();
        let filtered = filter_tree(&root, "util").unwrap();
        let text = render_text(&filtered, false);
        assert_eq!(text, "root/\n└── src/\n   └── utils.js\n");
    }

    #[test]
    fn json_null_on_no_match() {
        assert_eq!(render_json(None).unwrap(), "null");
    }

    #[test]
    fn json_round_trips_filtered_tree() {
        let root = sample_tree();
        let filtered = filter_tree(&root, "main").unwrap();
        let json = render_json(Some(filtered.as_ref())).unwrap();
        let back: TreeNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, filtered.into_owned());
    }
}

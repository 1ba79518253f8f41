use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::treemap::node::TreeNode;

/// Entry names skipped while scanning unless the ignore list is overridden.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "venv",
    ".venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    "target",
];

/// Sort criteria for scanned children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    /// Largest first, the natural treemap order. Default.
    Size,
    /// Alphabetical, case-insensitive.
    Name,
}

impl SortBy {
    /// Parse sort_by from a config or CLI string.
    pub fn parse(s: &str) -> Self {
        match s {
            "name" => SortBy::Name,
            _ => SortBy::Size,
        }
    }
}

/// Options controlling a directory scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub show_hidden: bool,
    /// Directories deeper than this are kept as unread leaves. `None` = unlimited.
    pub max_depth: Option<usize>,
    pub ignore: Vec<String>,
    pub sort_by: SortBy,
    pub dirs_first: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            show_hidden: false,
            max_depth: None,
            ignore: DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect(),
            sort_by: SortBy::Size,
            dirs_first: false,
        }
    }
}

/// Build a treemap from a directory on disk.
///
/// Child paths are relative to `root` and joined with `/`. Directory sizes are
/// the sum of what was read below them. Symlinks are leaves and never followed.
/// Unreadable entries are skipped.
pub fn scan_dir(root: &Path, options: &ScanOptions) -> Result<TreeNode> {
    let metadata = fs::symlink_metadata(root)
        .map_err(|_| AppError::InvalidPath(format!("{} does not exist", root.display())))?;
    if !metadata.is_dir() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.to_string_lossy().to_string());

    let children = read_children(root, "", 1, options)?;
    let mut node = TreeNode::directory(name, children);
    sort_children(&mut node.children, options.sort_by, options.dirs_first);

    tracing::debug!(
        root = %root.display(),
        nodes = node.node_count(),
        size = node.size,
        "scanned directory"
    );
    Ok(node)
}

fn read_children(
    dir: &Path,
    rel_prefix: &str,
    depth: usize,
    options: &ScanOptions,
) -> Result<Vec<TreeNode>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let name = entry.file_name().to_string_lossy().to_string();
        if !options.show_hidden && name.starts_with('.') {
            continue;
        }
        if options.ignore.iter().any(|pattern| *pattern == name) {
            continue;
        }

        let rel = if rel_prefix.is_empty() {
            name.clone()
        } else {
            format!("{rel_prefix}/{name}")
        };

        match scan_entry(&entry.path(), name, rel, depth, options) {
            Some(node) => children.push(node),
            None => continue,
        }
    }
    Ok(children)
}

fn scan_entry(
    path: &Path,
    name: String,
    rel: String,
    depth: usize,
    options: &ScanOptions,
) -> Option<TreeNode> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "skipping unreadable entry");
            return None;
        }
    };

    if !metadata.is_dir() {
        return Some(TreeNode::file(name, metadata.len()).with_path(rel));
    }

    let below_limit = options.max_depth.map_or(true, |max| depth < max);
    let mut children = if below_limit {
        match read_children(path, &rel, depth + 1, options) {
            Ok(children) => children,
            Err(e) => {
                // Permission denied and friends: keep the directory, empty
                tracing::debug!(path = %path.display(), error = %e, "cannot read directory");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };
    sort_children(&mut children, options.sort_by, options.dirs_first);

    Some(TreeNode::directory(name, children).with_path(rel))
}

/// Sort siblings in place (non-recursive).
pub fn sort_children(children: &mut [TreeNode], sort_by: SortBy, dirs_first: bool) {
    children.sort_by(|a, b| {
        let mut cmp = std::cmp::Ordering::Equal;

        if dirs_first {
            cmp = b.is_directory.cmp(&a.is_directory);
        }

        cmp.then_with(|| match sort_by {
            SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortBy::Size => b
                .size
                .cmp(&a.size)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        })
    });
}

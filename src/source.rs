//! Where a treemap comes from: a JSON document or a directory scan.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::treemap::node::TreeNode;
use crate::treemap::scan::{scan_dir, ScanOptions};

/// Accepted JSON layouts: a bare node, `{ "root": node }`, or a list of
/// top-level nodes gathered under a synthetic root.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Wrapped { root: TreeNode },
    Node(TreeNode),
    Forest(Vec<TreeNode>),
}

/// Input the tool reads its tree from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Json(PathBuf),
    Directory(PathBuf),
}

impl Source {
    /// Classify an input path. Directories are scanned, anything else is read as JSON.
    pub fn detect(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .map_err(|_| AppError::InvalidPath(format!("{} does not exist", path.display())))?;
        if metadata.is_dir() {
            Ok(Source::Directory(path.to_path_buf()))
        } else {
            Ok(Source::Json(path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Source::Json(p) | Source::Directory(p) => p,
        }
    }

    /// Read the tree. Called once at startup and again on every reload.
    pub fn load(&self, options: &ScanOptions) -> Result<TreeNode> {
        match self {
            Source::Json(path) => {
                let content = std::fs::read_to_string(path)?;
                let root = parse_document(&content, &display_name(path))?;
                tracing::debug!(path = %path.display(), nodes = root.node_count(), "loaded treemap");
                Ok(root)
            }
            Source::Directory(path) => scan_dir(path, options),
        }
    }
}

/// Parse a treemap JSON document. `fallback_name` names the synthetic root
/// used for the list layout.
pub fn parse_document(content: &str, fallback_name: &str) -> Result<TreeNode> {
    let root = match serde_json::from_str::<Document>(content) {
        Ok(Document::Wrapped { root }) | Ok(Document::Node(root)) => root,
        Ok(Document::Forest(nodes)) => TreeNode::directory(fallback_name, nodes),
        // Untagged errors are opaque; reparse as a bare node for a useful message
        Err(_) => serde_json::from_str::<TreeNode>(content)?,
    };
    Ok(root)
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "root".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"{
        "name": "root",
        "isDirectory": true,
        "children": [{ "name": "main.js", "size": 3 }]
    }"#;

    #[test]
    fn parses_bare_node() {
        let root = parse_document(BARE, "x").unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.children[0].name, "main.js");
    }

    #[test]
    fn parses_wrapped_root() {
        let content = format!(r#"{{ "root": {BARE} }}"#);
        let root = parse_document(&content, "x").unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn parses_forest_under_synthetic_root() {
        let content = r#"[{ "name": "a", "size": 2 }, { "name": "b", "size": 5 }]"#;
        let root = parse_document(content, "bundle").unwrap();
        assert_eq!(root.name, "bundle");
        assert!(root.is_directory);
        assert_eq!(root.size, 7);
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn malformed_document_is_json_error() {
        let err = parse_document(r#"{ "size": 1 }"#, "x").unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn detect_and_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(&path, BARE).unwrap();

        let source = Source::detect(&path).unwrap();
        assert_eq!(source, Source::Json(path.clone()));
        let root = source.load(&ScanOptions::default()).unwrap();
        assert_eq!(root.children[0].size, 3);
    }

    #[test]
    fn detect_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hi").unwrap();
        let source = Source::detect(dir.path()).unwrap();
        assert!(matches!(source, Source::Directory(_)));
        let root = source.load(&ScanOptions::default()).unwrap();
        assert_eq!(root.children[0].name, "a.txt");
        assert_eq!(source.path(), dir.path());
    }

    #[test]
    fn detect_missing_path() {
        let err = Source::detect(Path::new("/nonexistent/input.json")).unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
    }
}

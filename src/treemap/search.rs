//! Query normalization and the per-node match predicates.
//!
//! A query is trimmed, optionally unquoted from backticks (exact mode), then
//! lowercased. A query containing `/` is matched segment by segment against
//! the chain of ancestors leading to a node.

/// Directory suffixes that denote a bundle. A name match on one of these
/// still filters its contents instead of revealing all of them.
pub const CONTAINER_SUFFIXES: &[&str] = &[".app", ".framework", ".bundle", ".plugin"];

/// Normalized form of a raw search string, built once per filter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContext {
    /// The input exactly as supplied.
    pub raw_query: String,
    /// Effective term with the original casing, quotes removed.
    pub term: String,
    /// Lowercased effective term.
    pub term_lower: String,
    /// True when the trimmed query was wrapped in backticks on both ends.
    pub is_exact: bool,
    pub has_path_separator: bool,
    /// Lowercased `/`-delimited pieces of the term. Empty without a separator.
    pub path_segments: Vec<String>,
    /// Text matched against a node's own name.
    pub final_segment: String,
}

impl SearchContext {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (term, is_exact) =
            if trimmed.len() >= 2 && trimmed.starts_with('`') && trimmed.ends_with('`') {
                (&trimmed[1..trimmed.len() - 1], true)
            } else if let Some(rest) = trimmed.strip_prefix('`') {
                // Unbalanced quote: drop it, stay in substring mode
                (rest, false)
            } else {
                (trimmed, false)
            };

        let term_lower = term.to_lowercase();
        let has_path_separator = term_lower.contains('/');

        let (path_segments, final_segment) = if has_path_separator {
            let segments: Vec<String> = term_lower.split('/').map(str::to_string).collect();
            let last = segments.last().cloned().unwrap_or_default();
            (segments, last)
        } else {
            (Vec::new(), term_lower.clone())
        };

        Self {
            raw_query: raw.to_string(),
            term: term.to_string(),
            term_lower,
            is_exact,
            has_path_separator,
            path_segments,
            final_segment,
        }
    }

    /// Whether the effective term is empty, making the filter a no-op.
    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }

    /// Whether a node satisfies the active step of the query.
    ///
    /// Without a separator this is a plain substring test on the whole term.
    /// With one, a cursor past the last segment matches vacuously.
    pub fn current_node_matches(&self, name_lower: &str, path_idx: usize) -> bool {
        if !self.has_path_separator {
            return name_lower.contains(self.term_lower.as_str());
        }
        match self.path_segments.get(path_idx) {
            Some(segment) => name_lower.contains(segment.as_str()),
            None => true,
        }
    }

    /// Cursor value to hand to this node's children.
    pub fn advance_path_idx(&self, name_lower: &str, path_idx: usize) -> usize {
        if !self.has_path_separator {
            return path_idx;
        }
        match self.path_segments.get(path_idx) {
            Some(segment) if name_lower.contains(segment.as_str()) => path_idx + 1,
            _ => path_idx,
        }
    }

    /// Whether the node's own name contains the final segment, regardless of cursor.
    pub fn direct_name_match(&self, name_lower: &str) -> bool {
        name_lower.contains(self.final_segment.as_str())
    }
}

/// Whether a name ends in one of [`CONTAINER_SUFFIXES`], ignoring case.
pub fn is_container_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    CONTAINER_SUFFIXES
        .iter()
        .any(|suffix| lower.ends_with(suffix))
}

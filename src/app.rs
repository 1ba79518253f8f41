use std::borrow::Cow;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use crate::error::Result;
use crate::source::Source;
use crate::treemap::flatten::{flatten, FlatItem};
use crate::treemap::node::TreeNode;
use crate::treemap::scan::ScanOptions;
use crate::treemap::{filter_with_context, FilterOutcome, SearchContext};

/// Search box text and cursor (byte offset, always on a char boundary).
#[derive(Debug, Default)]
pub struct SearchInput {
    pub query: String,
    pub cursor_position: usize,
}

/// Main application state.
pub struct App {
    pub source: Source,
    pub scan_options: ScanOptions,
    /// The full tree as last loaded.
    pub tree: TreeNode,
    pub input: SearchInput,
    /// Context of the query currently applied.
    pub context: SearchContext,
    pub outcome: FilterOutcome,
    /// Pruned tree when `outcome` is `Filtered`.
    filtered: Option<TreeNode>,
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    /// Row keys of collapsed directories. Survives query edits and reloads.
    pub collapsed: HashSet<String>,
    /// Rows available to the tree widget, updated on every draw.
    pub viewport_height: usize,
    pub should_quit: bool,
    pub watcher_active: bool,
    /// Message, when it was set, and whether it is an error.
    pub status_message: Option<(String, Instant, bool)>,
}

impl App {
    /// Load the source and apply the initial query.
    pub fn new(source: Source, scan_options: ScanOptions, query: &str) -> Result<Self> {
        let tree = source.load(&scan_options)?;
        Ok(Self::with_tree(source, scan_options, tree, query))
    }

    pub fn with_tree(source: Source, scan_options: ScanOptions, tree: TreeNode, query: &str) -> Self {
        let mut app = Self {
            source,
            scan_options,
            tree,
            input: SearchInput {
                query: query.to_string(),
                cursor_position: query.len(),
            },
            context: SearchContext::new(""),
            outcome: FilterOutcome::Unchanged,
            filtered: None,
            flat_items: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            collapsed: HashSet::new(),
            viewport_height: 0,
            should_quit: false,
            watcher_active: true,
            status_message: None,
        };
        app.apply_query();
        app
    }

    /// Re-run the filter for the current query and rebuild the rows.
    pub fn apply_query(&mut self) {
        let ctx = SearchContext::new(&self.input.query);
        let result = filter_with_context(&self.tree, &ctx);
        self.outcome = FilterOutcome::of(&result);
        self.filtered = match result {
            Some(Cow::Owned(node)) => Some(node),
            _ => None,
        };
        tracing::debug!(query = %ctx.raw_query, outcome = ?self.outcome, "applied query");
        self.context = ctx;
        self.selected_index = 0;
        self.scroll_offset = 0;
        self.refresh_rows();
    }

    /// The tree currently on screen: everything, the pruned view, or nothing.
    pub fn visible_tree(&self) -> Option<&TreeNode> {
        match self.outcome {
            FilterOutcome::Unchanged => Some(&self.tree),
            FilterOutcome::Filtered { .. } => self.filtered.as_ref(),
            FilterOutcome::NoMatch => None,
        }
    }

    fn refresh_rows(&mut self) {
        let rows = self
            .visible_tree()
            .map(|tree| flatten(tree, &self.collapsed))
            .unwrap_or_default();
        self.flat_items = rows;
        if self.flat_items.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.flat_items.len() {
            self.selected_index = self.flat_items.len() - 1;
        }
    }

    /// Reload the source and re-apply the query, keeping the selection on the
    /// same row when it still exists.
    pub fn reload(&mut self) {
        match self.source.load(&self.scan_options) {
            Ok(tree) => {
                let selected_key = self.selected_item().map(|item| item.key.clone());
                self.tree = tree;
                self.apply_query();
                if let Some(key) = selected_key {
                    if let Some(idx) = self.flat_items.iter().position(|i| i.key == key) {
                        self.selected_index = idx;
                    }
                }
                tracing::info!(path = %self.source.path().display(), "reloaded input");
                self.set_status_message("Reloaded".to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, "reload failed");
                self.set_error_message(format!("Reload failed: {}", e));
            }
        }
    }

    /// The watched input changed on disk.
    pub fn handle_input_change(&mut self, paths: Vec<PathBuf>) {
        tracing::debug!(count = paths.len(), "input changed");
        self.reload();
    }

    // ── Search input editing ────────────────────────────────────────────────

    /// Insert a character at the current cursor position.
    pub fn input_char(&mut self, c: char) {
        self.input.query.insert(self.input.cursor_position, c);
        self.input.cursor_position += c.len_utf8();
        self.apply_query();
    }

    /// Delete the character before the cursor (backspace).
    pub fn delete_char(&mut self) {
        if let Some(prev) = self.input.query[..self.input.cursor_position]
            .chars()
            .next_back()
        {
            self.input.cursor_position -= prev.len_utf8();
            self.input.query.remove(self.input.cursor_position);
            self.apply_query();
        }
    }

    /// Delete the character under the cursor.
    pub fn delete_char_forward(&mut self) {
        if self.input.cursor_position < self.input.query.len() {
            self.input.query.remove(self.input.cursor_position);
            self.apply_query();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(prev) = self.input.query[..self.input.cursor_position]
            .chars()
            .next_back()
        {
            self.input.cursor_position -= prev.len_utf8();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(next) = self.input.query[self.input.cursor_position..].chars().next() {
            self.input.cursor_position += next.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.input.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.input.cursor_position = self.input.query.len();
    }

    /// Empty the search box, showing the whole tree again.
    pub fn clear_query(&mut self) {
        self.input = SearchInput::default();
        self.apply_query();
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    pub fn selected_item(&self) -> Option<&FlatItem> {
        self.flat_items.get(self.selected_index)
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        let len = self.flat_items.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn page_down(&mut self) {
        let step = self.viewport_height.max(1);
        let len = self.flat_items.len();
        if len > 0 {
            self.selected_index = (self.selected_index + step).min(len - 1);
        }
    }

    pub fn page_up(&mut self) {
        let step = self.viewport_height.max(1);
        self.selected_index = self.selected_index.saturating_sub(step);
    }

    /// Jump to the first item.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item.
    pub fn select_last(&mut self) {
        let len = self.flat_items.len();
        if len > 0 {
            self.selected_index = len - 1;
        }
    }

    /// Collapse or expand the selected directory. Leaves are ignored.
    pub fn toggle_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        if item.child_count == 0 {
            return;
        }
        let key = item.key.clone();
        if !self.collapsed.remove(&key) {
            self.collapsed.insert(key);
        }
        self.refresh_rows();
    }

    /// Update the scroll offset to ensure the selected item is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        self.viewport_height = visible_height;
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    // ── Status ──────────────────────────────────────────────────────────────

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), false));
    }

    pub fn set_error_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), true));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created, _)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    pub fn toggle_watcher(&mut self) {
        self.watcher_active = !self.watcher_active;
        let msg = if self.watcher_active {
            "Auto-reload on"
        } else {
            "Auto-reload paused"
        };
        self.set_status_message(msg.to_string());
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

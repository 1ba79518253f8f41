//! Search and prune hierarchical size trees.
//!
//! The core lives in [`treemap`]: a query becomes a [`treemap::SearchContext`]
//! and [`treemap::filter_tree`] returns the original root, a pruned copy, or
//! nothing. The remaining modules load trees, print them, and drive the
//! interactive browser behind the `tmf` binary.

pub mod app;
pub mod batch;
pub mod components;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod logging;
pub mod render;
pub mod source;
pub mod theme;
pub mod treemap;
pub mod tui;
pub mod ui;
pub mod watcher;

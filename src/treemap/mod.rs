//! Treemap model, search filter, and the helpers that feed and display it.

pub mod filter;
pub mod flatten;
pub mod node;
pub mod scan;
pub mod search;

pub use filter::{filter_tree, filter_with_context, FilterOutcome};
pub use node::TreeNode;
pub use search::SearchContext;

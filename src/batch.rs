//! One-shot filtering for the command line: load, filter, print.

use std::io::Write;

use crate::config::{AppConfig, OutputFormat};
use crate::error::Result;
use crate::render;
use crate::source::Source;
use crate::treemap::filter_tree;

/// Process exit status for a failed run (bad input, unreadable file, ...).
pub const ERROR_EXIT_CODE: u8 = 2;

/// How a successful batch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Matched,
    NoMatch,
}

impl BatchStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            BatchStatus::Matched => 0,
            BatchStatus::NoMatch => 1,
        }
    }
}

/// Filter `source` once, printing the result to `out` and diagnostics to `err`.
///
/// JSON output prints `null` when nothing matched; text output prints nothing.
pub fn run(
    source: &Source,
    query: &str,
    config: &AppConfig,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<BatchStatus> {
    let tree = source.load(&config.scan_options())?;
    let filtered = filter_tree(&tree, query);
    let format = config.output_format();

    let output = match format {
        OutputFormat::Json => render::render_json(filtered.as_deref())?,
        OutputFormat::Tree => match filtered.as_deref() {
            Some(root) => render::render_text(root, config.show_sizes()),
            None => String::new(),
        },
    };

    if !output.is_empty() {
        write!(out, "{output}")?;
        if !output.ends_with('\n') {
            writeln!(out)?;
        }
    }

    if filtered.is_none() {
        tracing::info!(query = %query.trim(), "no matches");
        writeln!(err, "tmf: no matches for `{}`", query.trim())?;
        return Ok(BatchStatus::NoMatch);
    }
    Ok(BatchStatus::Matched)
}

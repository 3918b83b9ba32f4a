//! Error types for port-labeled graphs.
//!
//! Structural violations (adding an existing edge, resetting ports with a
//! mismatched neighbor set, ...) are not errors: they are reported as a
//! `false` result and leave the graph untouched. `GraphError` only covers
//! importing a graph from its adjacency text form.

use thiserror::Error;

/// Errors that can occur while importing or exporting a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Reading or writing the graph file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The adjacency text has no vertex header line
    #[error("adjacency text is empty")]
    Empty,

    /// An adjacency line references a vertex missing from the header
    #[error("line {line}: unknown vertex name '{name}'")]
    UnknownVertexName { line: usize, name: String },
}

impl GraphError {
    /// Creates an unknown-name error for a 1-based line number.
    pub fn unknown_name(line: usize, name: impl Into<String>) -> Self {
        Self::UnknownVertexName {
            line,
            name: name.into(),
        }
    }
}

//! Error types for flowline operations.
//!
//! The sanitizer and layout engines never fail on malformed graph content.
//! [`FlowError`] covers the fallible edges around them: reading and decoding
//! a generator response, configuration, direct graph edits, the generation
//! collaborator and export.

use std::io;

use thiserror::Error;

use flowline_core::graph::GraphError;

/// The main error type for flowline operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the decoded source text together with the
/// 1-based line and column reported by the decoder, so callers can point at
/// the offending location.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
        src: String,
    },

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<GraphError> for FlowError {
    fn from(error: GraphError) -> Self {
        Self::Graph(error.to_string())
    }
}

impl FlowError {
    /// Create a new `Parse` error from a JSON decoding failure and the text
    /// that failed to decode.
    pub fn new_parse_error(err: &serde_json::Error, src: impl Into<String>) -> Self {
        Self::Parse {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
            src: src.into(),
        }
    }
}

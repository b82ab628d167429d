//! Error adapter for converting FlowError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Decoding failures carry the offending text and a 1-based line and column.
//! They are rendered as a labeled source snippet; every other variant becomes
//! a plain diagnostic with a `flowline::<kind>` code.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use flowline::FlowError;

/// Adapter for a [`FlowError::Parse`] error.
pub struct ParseAdapter<'a> {
    message: &'a str,
    src: &'a str,
    span: SourceSpan,
}

impl<'a> ParseAdapter<'a> {
    /// Create a new parse adapter pointing at `line`/`column` of `src`.
    pub fn new(message: &'a str, src: &'a str, line: usize, column: usize) -> Self {
        Self {
            message,
            src,
            span: span_at(src, line, column),
        }
    }
}

impl fmt::Debug for ParseAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseAdapter")
            .field("message", &self.message)
            .field("span", &self.span)
            .finish()
    }
}

impl fmt::Display for ParseAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseAdapter<'_> {}

impl MietteDiagnostic for ParseAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("flowline::parse"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "expected {\"nodes\": [...], \"edges\": [...]} with an `id` on every node",
        ))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some("here".to_string()), self.span),
        )))
    }
}

/// Adapter for non-diagnostic [`FlowError`] variants.
///
/// This adapter handles errors that don't have source location information,
/// such as I/O errors, graph errors, configuration errors, and export errors.
pub struct ErrorAdapter<'a>(pub &'a FlowError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            FlowError::Io(_) => "flowline::io",
            FlowError::Parse { .. } => "flowline::parse",
            FlowError::Graph(_) => "flowline::graph",
            FlowError::Config(_) => "flowline::config",
            FlowError::Generation(_) => "flowline::generation",
            FlowError::Export(_) => "flowline::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        None
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a located parse failure or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A decoding failure with source location information.
    Parse(ParseAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Parse(p) => fmt::Display::fmt(p, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Parse(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Parse(p) => p.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Parse(p) => p.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Parse(p) => p.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Parse(p) => p.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a 1-based `line`/`column` into a one-byte [`SourceSpan`].
///
/// Positions past the end of a line or of the text are clamped; a position at
/// the very end of `src` yields an empty span there.
fn span_at(src: &str, line: usize, column: usize) -> SourceSpan {
    let mut offset = 0;
    for (idx, text) in src.split_inclusive('\n').enumerate() {
        if idx + 1 == line {
            let within = column.saturating_sub(1).min(text.trim_end_matches('\n').len());
            offset += within;
            break;
        }
        offset += text.len();
    }

    let offset = offset.min(src.len());
    let len = usize::from(offset < src.len() && src.is_char_boundary(offset + 1));
    SourceSpan::new(offset.into(), len)
}

/// Convert a [`FlowError`] into a list of reportable errors.
///
/// A [`FlowError::Parse`] becomes a located diagnostic; every other variant
/// becomes a single plain [`Reportable`].
pub fn to_reportables(err: &FlowError) -> Vec<Reportable<'_>> {
    match err {
        FlowError::Parse {
            message,
            line,
            column,
            src,
        } => vec![Reportable::Parse(ParseAdapter::new(
            message, src, *line, *column,
        ))],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

//! Diagnostic types for semantic error reporting in the Turin compiler
//!
//! Validation never stops at the first problem it sees. Every node-specific
//! check pushes a `SemanticDiagnostic` into an `ErrorCollector` and keeps
//! going, so one pass over a batch reports everything at once.
//!
//! ## Miette Integration
//!
//! A `SemanticDiagnostic` only knows its line/column position. To render it
//! with source context it is wrapped in a `Report`, which carries the source
//! text and converts the position into a labeled byte span.

use std::cmp::Ordering;
use std::fmt;

use miette::{Diagnostic, LabeledSpan, Severity};
use thiserror::Error;

use crate::Position;

/// A recoverable semantic error found in user source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(turin_source::semantic_error))]
pub struct SemanticDiagnostic {
    /// Where the problem was found, when the node carries a position
    pub position: Option<Position>,
    /// Human readable description of the problem
    pub message: String,
}

impl SemanticDiagnostic {
    pub fn new(position: Option<Position>, message: impl Into<String>) -> Self {
        SemanticDiagnostic {
            position,
            message: message.into(),
        }
    }

    /// Orders diagnostics by position, placing the ones without a position last.
    pub fn source_order(&self, other: &Self) -> Ordering {
        match (&self.position, &other.position) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Sink for semantic errors.
///
/// Recording is a side effect and never fails: implementations are
/// append-only for the duration of a validation pass.
pub trait ErrorCollector {
    fn record_semantic_error(&mut self, position: Option<Position>, message: String);
}

/// The default, vector backed `ErrorCollector`.
///
/// One collector is used per file; collectors of independent files are
/// merged afterwards, which keeps the order within a file intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollector {
    diagnostics: Vec<SemanticDiagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn diagnostics(&self) -> &[SemanticDiagnostic] {
        &self.diagnostics
    }

    pub fn merge(&mut self, other: DiagnosticCollector) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Diagnostics sorted by source position. The sort is stable, so two
    /// diagnostics at the same position keep the order they were recorded in.
    pub fn sorted(&self) -> Vec<SemanticDiagnostic> {
        let mut diagnostics = self.diagnostics.clone();
        diagnostics.sort_by(SemanticDiagnostic::source_order);
        diagnostics
    }

    pub fn into_vec(self) -> Vec<SemanticDiagnostic> {
        self.diagnostics
    }
}

impl ErrorCollector for DiagnosticCollector {
    fn record_semantic_error(&mut self, position: Option<Position>, message: String) {
        log::trace!("semantic error at {:?}: {}", position, message);
        self.diagnostics.push(SemanticDiagnostic { position, message });
    }
}

/// A diagnostic together with the source text it refers to.
#[derive(Debug, Clone, Error)]
pub struct Report {
    /// Name of the file the diagnostic belongs to
    pub location: String,
    /// The source code text for context in error displays
    pub source_code: String,
    /// The diagnostic being reported
    pub diagnostic: SemanticDiagnostic,
    span: Option<miette::SourceSpan>,
}

impl Report {
    pub fn new(location: impl Into<String>, source: impl Into<String>, diagnostic: SemanticDiagnostic) -> Self {
        let source = source.into();
        let span = diagnostic.position.map(|p| p.to_span(&source));
        Report {
            location: location.into(),
            source_code: source,
            diagnostic,
            span,
        }
    }
}

/// Display implementation that delegates to the underlying diagnostic
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.diagnostic.fmt(f)
    }
}

/// Delegates to the wrapped diagnostic, but supplies the source code and a
/// label computed from the node position.
impl Diagnostic for Report {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.diagnostic.code()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some("here".to_string()),
            span,
        ))))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }

    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }
}

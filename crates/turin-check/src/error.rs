use miette::Diagnostic;
use thiserror::Error;
use turin_resolve::ResolutionError;
use turin_source::SemanticDiagnostic;
use turin_types::TypeError;

/// Result type for type computation
pub type CheckResult<T> = Result<T, CheckError>;

/// Why the type of an expression could not be computed.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolution(#[from] ResolutionError),
}

/// A batch that cannot be handed to code generation.
#[derive(Debug, Error, Diagnostic)]
#[error("{count} semantic error(s) found, code generation skipped")]
#[diagnostic(code(turin_check::not_ready_for_codegen))]
pub struct CompileError {
    pub count: usize,
    #[related]
    pub diagnostics: Vec<SemanticDiagnostic>,
}

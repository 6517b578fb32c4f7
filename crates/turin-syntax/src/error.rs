use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Unknown operator `{symbol}`")]
    #[diagnostic(code(turin_syntax::unknown_operator))]
    UnknownOperator { symbol: String },

    #[error("Invalid qualified name `{0}`")]
    #[diagnostic(code(turin_syntax::invalid_qualified_name))]
    InvalidQualifiedName(String),
}

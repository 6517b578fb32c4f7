use miette::Diagnostic;
use thiserror::Error;

/// Result type for type computations
pub type TypeResult<T> = Result<T, TypeError>;

/// Reasons why the type of an expression cannot be computed.
///
/// These are turned into semantic diagnostics by the validation pass, at the
/// position of the expression whose type was requested.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Array access on a value of type `{found}`, which is not an array")]
    #[diagnostic(code(turin_types::not_an_array))]
    NotAnArray { found: String },

    #[error("Array index must be an integer, found `{found}`")]
    #[diagnostic(code(turin_types::invalid_array_index))]
    InvalidArrayIndex { found: String },

    #[error("Operator `{op}` cannot be applied to `{left}` and `{right}`")]
    #[diagnostic(code(turin_types::incompatible_operands))]
    IncompatibleOperands { op: String, left: String, right: String },

    #[error("Expected a boolean {context}, found `{found}`")]
    #[diagnostic(code(turin_types::not_boolean))]
    NotBoolean { context: String, found: String },

    #[error("Value of type `{found}` cannot be invoked")]
    #[diagnostic(code(turin_types::not_invokable))]
    NotInvokable { found: String },

    #[error("Unresolved symbol `{name}`")]
    #[diagnostic(code(turin_types::unresolved_symbol), help("Check that the name is declared or imported"))]
    UnresolvedSymbol { name: String },

    #[error("`{name}` is not a type")]
    #[diagnostic(code(turin_types::not_a_type))]
    NotAType { name: String },

    #[error("Type `{ty}` has no field `{field}`")]
    #[diagnostic(code(turin_types::unknown_field))]
    UnknownField { field: String, ty: String },

    #[error("Type `{ty}` has no method `{method}`")]
    #[diagnostic(code(turin_types::unknown_method))]
    UnknownMethod { method: String, ty: String },

    #[error("Unsolved method `{name}`")]
    #[diagnostic(code(turin_types::unsolved_method))]
    UnsolvedMethod { name: String },

    #[error("`{name}` expects {expected} arguments, found {found}")]
    #[diagnostic(code(turin_types::wrong_number_of_arguments))]
    WrongNumberOfArguments { name: String, expected: usize, found: usize },

    #[error("`{name}` has type void and cannot be used as a value")]
    #[diagnostic(code(turin_types::void_value))]
    VoidValue { name: String },
}

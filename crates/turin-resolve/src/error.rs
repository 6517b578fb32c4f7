use miette::Diagnostic;
use thiserror::Error;

/// Result type for resolution operations
pub type ResolveResult<T> = Result<T, ResolutionError>;

/// Errors that can occur during name resolution.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No resolver in the chain knows a platform method for the call
    #[error("Unsolved method `{name}`")]
    #[diagnostic(code(turin_resolve::unsolved_method))]
    UnsolvedMethod { name: String },

    /// A type annotation names a type that is neither declared nor imported
    #[error("Unknown type `{name}`")]
    #[diagnostic(code(turin_resolve::unknown_type), help("Is the type declared in this batch or imported?"))]
    UnknownType { name: String },

    /// A primitive annotation with a name outside the primitive set
    #[error("Unknown primitive type `{name}`")]
    #[diagnostic(code(turin_resolve::unknown_primitive))]
    UnknownPrimitive { name: String },

    /// A property reference inside a type points to no top-level property
    #[error("Unresolved property reference `{name}`")]
    #[diagnostic(code(turin_resolve::unresolved_property))]
    UnresolvedProperty { name: String },
}

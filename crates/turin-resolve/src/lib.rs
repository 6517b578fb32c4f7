//! Name resolution for Turin.
//!
//! A resolver is built once per compilation batch from every parsed file and
//! is read-only afterwards. Lookups go through a fixed chain: the source
//! declarations of the batch first, then an optional outer resolver (a
//! library or the platform) chosen at construction time.

pub mod error;
pub mod platform;
pub mod resolver;
pub mod scope;
pub mod symbol;

pub use error::{ResolutionError, ResolveResult};
pub use platform::{
    EmptyPlatformResolver, MethodRequest, PlatformField, PlatformMethod, PlatformResolver, PlatformSymbol,
    PlatformType,
};
pub use resolver::{DuplicateDefinition, SrcSymbolResolver, SymbolResolver};
pub use scope::{resolve_annotation, NameScope};
pub use symbol::{InFile, LocalSymbol, MethodRef, Symbol, TypeDefinitionRef};

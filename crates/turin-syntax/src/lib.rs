//! The AST of the Turin language.
//!
//! The tree handed to this crate is already structurally well formed: it is
//! produced by the parse-tree to AST translation, which also attaches source
//! positions. Nodes own their children. The parent link is a `NodeId`, bound
//! exactly once by the parent's constructor and only used for "who is my
//! context" queries.

pub mod ast;
pub mod error;

pub use ast::*;
pub use error::SyntaxError;

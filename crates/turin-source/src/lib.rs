//! Source-level plumbing shared by every stage of the Turin compiler.
//!
//! This crate is responsible for:
//! - Source positions (`Point`, `Position`) attached to AST nodes
//! - Collecting semantic diagnostics without aborting a pass
//! - Rendering diagnostics with source context through miette
//! - Loading the compiler configuration (`turin.toml`)

mod config;
mod diagnostic;
mod error;
mod position;

pub use config::{CompilerConfig, PackageInfo, ResolverOptions, ValidationOptions, CONFIG_FILE_NAME};
pub use diagnostic::{DiagnosticCollector, ErrorCollector, Report, SemanticDiagnostic};
pub use error::{ConfigError, ConfigResult};
pub use position::{Point, Position};

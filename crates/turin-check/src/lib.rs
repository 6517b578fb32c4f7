//! Semantic checking for Turin.
//!
//! This crate computes the type of every expression, validates every node of
//! a batch of parsed files and decides whether the batch may be handed to
//! code generation. It never stops at the first problem: every failure is
//! recorded as a diagnostic and the walk continues.

pub mod compile;
pub mod env;
pub mod error;
pub mod typing;
pub mod validate;

pub use compile::{CheckedBatch, Compilation};
pub use env::TypeEnv;
pub use error::{CheckError, CheckResult, CompileError};
pub use typing::{calc_type, TypeContext};
pub use validate::{validate_file, Validator};

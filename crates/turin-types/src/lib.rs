//! The Turin type system.
//!
//! `TypeUsage` is "a type, as used at some point in the program". It is a
//! closed set of variants: primitives, references to declared types, arrays,
//! function references and void. Equality is structural for arrays and
//! function references and nominal for references.

pub mod error;
pub mod jvm;
pub mod primitive;
pub mod usage;

pub use error::{TypeError, TypeResult};
pub use jvm::JvmType;
pub use primitive::PrimitiveTypeUsage;
pub use usage::{FunctionReferenceTypeUsage, ReferenceTypeUsage, TypeUsage, OBJECT, STRING};

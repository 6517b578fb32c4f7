pub mod common;
pub mod expr;
pub mod items;
pub mod node;
pub mod relations;
pub mod stmt;
pub mod types;

pub use common::{qualify, NodeId, NodeMeta, QualifiedName};
pub use expr::{
    ActualParam, Expression, ExpressionKind, LogicOperator, MathOperator, RelationalOperator, TypeIdentifier,
};
pub use items::{
    FileMember, FormalParameter, FunctionDefinition, ImportDeclaration, ImportKind, MethodDefinition, Program,
    PropertyDefinition, PropertyReference, TurinFile, TypeDefinition, TypeMember,
};
pub use node::NodeRef;
pub use relations::{Cardinality, RelationDefinition, RelationFieldDefinition, RelationKind};
pub use stmt::{CatchClause, ElifClause, Statement, StatementKind};
pub use types::{TypeAnnotation, TypeAnnotationKind};

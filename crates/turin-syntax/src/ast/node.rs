//! Uniform, borrowed view over every node variant.
//!
//! Traversals (validation, pretty printing, position lookups) work on
//! `NodeRef` so that they can enumerate children without knowing the
//! concrete node type. `children()` returns the immediate children in source
//! order; diagnostics and evaluation order depend on it.

use turin_source::Position;

use super::common::{NodeId, NodeMeta};
use super::expr::{ActualParam, Expression, ExpressionKind, TypeIdentifier};
use super::items::{
    FileMember, FormalParameter, FunctionDefinition, ImportDeclaration, MethodDefinition, Program,
    PropertyDefinition, PropertyReference, TurinFile, TypeDefinition, TypeMember,
};
use super::relations::{RelationDefinition, RelationFieldDefinition};
use super::stmt::{CatchClause, ElifClause, Statement, StatementKind};
use super::types::{TypeAnnotation, TypeAnnotationKind};

#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    File(&'a TurinFile),
    Import(&'a ImportDeclaration),
    TypeDefinition(&'a TypeDefinition),
    PropertyDefinition(&'a PropertyDefinition),
    PropertyReference(&'a PropertyReference),
    FunctionDefinition(&'a FunctionDefinition),
    MethodDefinition(&'a MethodDefinition),
    Program(&'a Program),
    FormalParameter(&'a FormalParameter),
    Relation(&'a RelationDefinition),
    RelationField(&'a RelationFieldDefinition),
    Statement(&'a Statement),
    Elif(&'a ElifClause),
    Catch(&'a CatchClause),
    Expression(&'a Expression),
    ActualParam(&'a ActualParam),
    TypeIdentifier(&'a TypeIdentifier),
    TypeAnnotation(&'a TypeAnnotation),
}

impl<'a> NodeRef<'a> {
    pub fn meta(&self) -> &'a NodeMeta {
        match *self {
            NodeRef::File(n) => n.meta(),
            NodeRef::Import(n) => n.meta(),
            NodeRef::TypeDefinition(n) => n.meta(),
            NodeRef::PropertyDefinition(n) => n.meta(),
            NodeRef::PropertyReference(n) => n.meta(),
            NodeRef::FunctionDefinition(n) => n.meta(),
            NodeRef::MethodDefinition(n) => n.meta(),
            NodeRef::Program(n) => n.meta(),
            NodeRef::FormalParameter(n) => n.meta(),
            NodeRef::Relation(n) => n.meta(),
            NodeRef::RelationField(n) => n.meta(),
            NodeRef::Statement(n) => n.meta(),
            NodeRef::Elif(n) => n.meta(),
            NodeRef::Catch(n) => n.meta(),
            NodeRef::Expression(n) => n.meta(),
            NodeRef::ActualParam(n) => n.meta(),
            NodeRef::TypeIdentifier(n) => n.meta(),
            NodeRef::TypeAnnotation(n) => n.meta(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.meta().id()
    }

    pub fn position(&self) -> Option<Position> {
        self.meta().position()
    }

    /// Immediate children, in source order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match *self {
            NodeRef::File(file) => file
                .imports()
                .iter()
                .map(NodeRef::Import)
                .chain(file.members().iter().map(NodeRef::from))
                .collect(),
            NodeRef::Import(_) | NodeRef::PropertyReference(_) | NodeRef::TypeIdentifier(_) => vec![],
            NodeRef::TypeDefinition(ty) => ty.members().iter().map(NodeRef::from).collect(),
            NodeRef::PropertyDefinition(p) => vec![NodeRef::TypeAnnotation(p.type_annotation())],
            NodeRef::FunctionDefinition(f) => invokable_children(f.return_type(), f.params(), f.body()),
            NodeRef::MethodDefinition(m) => invokable_children(m.return_type(), m.params(), m.body()),
            NodeRef::Program(p) => vec![NodeRef::Statement(p.body())],
            NodeRef::FormalParameter(p) => vec![NodeRef::TypeAnnotation(p.type_annotation())],
            NodeRef::Relation(r) => r.fields().iter().map(NodeRef::RelationField).collect(),
            NodeRef::RelationField(f) => vec![NodeRef::TypeAnnotation(f.target())],
            NodeRef::Statement(s) => statement_children(s),
            NodeRef::Elif(e) => vec![NodeRef::Expression(e.condition()), NodeRef::Statement(e.body())],
            NodeRef::Catch(c) => vec![NodeRef::TypeIdentifier(c.exception_type()), NodeRef::Statement(c.body())],
            NodeRef::Expression(e) => expression_children(e),
            NodeRef::ActualParam(p) => vec![NodeRef::Expression(p.value())],
            NodeRef::TypeAnnotation(t) => match t.kind() {
                TypeAnnotationKind::Array(component) => vec![NodeRef::TypeAnnotation(component)],
                _ => vec![],
            },
        }
    }

    /// Depth-first, pre-order walk of this node and all of its descendants.
    pub fn descendants(&self) -> Vec<NodeRef<'a>> {
        let mut nodes = Vec::new();
        let mut stack = vec![*self];
        while let Some(node) = stack.pop() {
            let mut children = node.children();
            children.reverse();
            stack.extend(children);
            nodes.push(node);
        }
        nodes
    }

    /// Short name of the node variant, used in logs and debug output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeRef::File(_) => "file",
            NodeRef::Import(_) => "import",
            NodeRef::TypeDefinition(_) => "type",
            NodeRef::PropertyDefinition(_) => "property",
            NodeRef::PropertyReference(_) => "property reference",
            NodeRef::FunctionDefinition(_) => "function",
            NodeRef::MethodDefinition(_) => "method",
            NodeRef::Program(_) => "program",
            NodeRef::FormalParameter(_) => "parameter",
            NodeRef::Relation(_) => "relation",
            NodeRef::RelationField(_) => "relation field",
            NodeRef::Statement(_) => "statement",
            NodeRef::Elif(_) => "elif",
            NodeRef::Catch(_) => "catch",
            NodeRef::Expression(_) => "expression",
            NodeRef::ActualParam(_) => "argument",
            NodeRef::TypeIdentifier(_) => "type identifier",
            NodeRef::TypeAnnotation(_) => "type annotation",
        }
    }
}

fn invokable_children<'a>(
    return_type: &'a TypeAnnotation,
    params: &'a [FormalParameter],
    body: &'a Statement,
) -> Vec<NodeRef<'a>> {
    std::iter::once(NodeRef::TypeAnnotation(return_type))
        .chain(params.iter().map(NodeRef::FormalParameter))
        .chain(std::iter::once(NodeRef::Statement(body)))
        .collect()
}

fn statement_children(statement: &Statement) -> Vec<NodeRef<'_>> {
    match statement.kind() {
        StatementKind::Block(statements) => statements.iter().map(NodeRef::Statement).collect(),
        StatementKind::Expression(e) | StatementKind::Throw(e) => vec![NodeRef::Expression(e)],
        StatementKind::VariableDeclaration { value, type_annotation, .. } => type_annotation
            .iter()
            .map(NodeRef::TypeAnnotation)
            .chain(std::iter::once(NodeRef::Expression(value)))
            .collect(),
        StatementKind::If { condition, then_body, elifs, else_body } => {
            let mut children = vec![NodeRef::Expression(condition), NodeRef::Statement(then_body)];
            children.extend(elifs.iter().map(NodeRef::Elif));
            children.extend(else_body.iter().map(|s| NodeRef::Statement(s)));
            children
        }
        StatementKind::Return(value) => value.iter().map(NodeRef::Expression).collect(),
        StatementKind::TryCatch { body, catches } => std::iter::once(NodeRef::Statement(body))
            .chain(catches.iter().map(NodeRef::Catch))
            .collect(),
    }
}

fn expression_children(expression: &Expression) -> Vec<NodeRef<'_>> {
    match expression.kind() {
        ExpressionKind::IntLiteral(_)
        | ExpressionKind::DoubleLiteral(_)
        | ExpressionKind::StringLiteral(_)
        | ExpressionKind::BooleanLiteral(_)
        | ExpressionKind::ValueReference(_) => vec![],
        ExpressionKind::StringInterpolation(segments) => segments.iter().map(NodeRef::Expression).collect(),
        ExpressionKind::StaticFieldAccess { subject, .. } => vec![NodeRef::TypeIdentifier(subject)],
        ExpressionKind::InstanceFieldAccess { subject, .. } => vec![NodeRef::Expression(subject)],
        ExpressionKind::InstanceMethodInvocation { subject, args, .. } => std::iter::once(NodeRef::Expression(&**subject))
            .chain(args.iter().map(NodeRef::ActualParam))
            .collect(),
        ExpressionKind::FunctionCall { function, args } => std::iter::once(NodeRef::Expression(&**function))
            .chain(args.iter().map(NodeRef::ActualParam))
            .collect(),
        ExpressionKind::ArrayAccess { array, index } => vec![NodeRef::Expression(array), NodeRef::Expression(index)],
        ExpressionKind::Creation { args, .. } => args.iter().map(NodeRef::ActualParam).collect(),
        ExpressionKind::Not(operand) => vec![NodeRef::Expression(operand)],
        ExpressionKind::Math { left, right, .. }
        | ExpressionKind::Logic { left, right, .. }
        | ExpressionKind::Relational { left, right, .. } => vec![NodeRef::Expression(left), NodeRef::Expression(right)],
    }
}

impl<'a> From<&'a FileMember> for NodeRef<'a> {
    fn from(member: &'a FileMember) -> Self {
        match member {
            FileMember::Type(t) => NodeRef::TypeDefinition(t),
            FileMember::Property(p) => NodeRef::PropertyDefinition(p),
            FileMember::Program(p) => NodeRef::Program(p),
            FileMember::Function(f) => NodeRef::FunctionDefinition(f),
            FileMember::Relation(r) => NodeRef::Relation(r),
        }
    }
}

impl<'a> From<&'a TypeMember> for NodeRef<'a> {
    fn from(member: &'a TypeMember) -> Self {
        match member {
            TypeMember::Property(p) => NodeRef::PropertyDefinition(p),
            TypeMember::PropertyReference(p) => NodeRef::PropertyReference(p),
            TypeMember::Method(m) => NodeRef::MethodDefinition(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{MathOperator, QualifiedName};
    use expect_test::expect;

    fn kinds(nodes: &[NodeRef<'_>]) -> String {
        nodes.iter().map(|n| n.kind_name()).collect::<Vec<_>>().join(", ")
    }

    #[test]
    fn test_children_follow_source_order() {
        let function = FunctionDefinition::new(
            "add",
            TypeAnnotation::primitive("int"),
            vec![
                FormalParameter::new(TypeAnnotation::primitive("int"), "a"),
                FormalParameter::new(TypeAnnotation::primitive("int"), "b"),
            ],
            Statement::block(vec![Statement::ret(Some(Expression::math(
                MathOperator::Sum,
                Expression::value_ref("a"),
                Expression::value_ref("b"),
            )))]),
        );
        let file = TurinFile::new(
            QualifiedName::parse("math").unwrap(),
            vec![],
            vec![FileMember::Function(function)],
        );
        let root = NodeRef::File(&file);

        let function = root.children()[0];
        expect!["type annotation, parameter, parameter, statement"].assert_eq(&kinds(&function.children()));
        expect![[r#"file, function, type annotation, parameter, type annotation, parameter, type annotation, statement, statement, expression, expression, expression"#]]
            .assert_eq(&kinds(&root.descendants()));
    }

    #[test]
    fn test_every_child_points_back_to_its_parent() {
        let body = Statement::if_else(
            Expression::boolean(true),
            Statement::block(vec![Statement::throw(Expression::creation("Error", vec![]))]),
            vec![ElifClause::new(Expression::boolean(false), Statement::block(vec![]))],
            Some(Statement::block(vec![])),
        );
        let program = Program::new("Main", Statement::block(vec![body]), "args");
        let root = NodeRef::Program(&program);
        for node in root.descendants() {
            for child in node.children() {
                assert_eq!(child.meta().parent(), Some(node.id()), "{} under {}", child.kind_name(), node.kind_name());
            }
        }
    }
}

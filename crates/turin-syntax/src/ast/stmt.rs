use super::common::{impl_node, NodeId, NodeMeta};
use super::expr::Expression;
use super::types::TypeAnnotation;
use super::TypeIdentifier;

/// A statement node. Executable bodies (functions, methods, programs) are
/// rooted at a `Block`.
#[derive(Debug)]
pub struct Statement {
    meta: NodeMeta,
    kind: StatementKind,
}

#[derive(Debug)]
pub enum StatementKind {
    Block(Vec<Statement>),
    Expression(Expression),
    VariableDeclaration {
        name: String,
        value: Expression,
        type_annotation: Option<TypeAnnotation>,
    },
    If {
        condition: Expression,
        then_body: Box<Statement>,
        elifs: Vec<ElifClause>,
        else_body: Option<Box<Statement>>,
    },
    Return(Option<Expression>),
    Throw(Expression),
    TryCatch {
        body: Box<Statement>,
        catches: Vec<CatchClause>,
    },
}

impl_node!(Statement, ElifClause, CatchClause);

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        let meta = NodeMeta::new();
        bind_children(&kind, meta.id());
        Statement { meta, kind }
    }

    pub fn kind(&self) -> &StatementKind {
        &self.kind
    }

    pub fn block(statements: Vec<Statement>) -> Self {
        Self::new(StatementKind::Block(statements))
    }

    pub fn expression(expression: Expression) -> Self {
        Self::new(StatementKind::Expression(expression))
    }

    pub fn var(name: impl Into<String>, value: Expression, type_annotation: Option<TypeAnnotation>) -> Self {
        Self::new(StatementKind::VariableDeclaration {
            name: name.into(),
            value,
            type_annotation,
        })
    }

    pub fn if_else(
        condition: Expression,
        then_body: Statement,
        elifs: Vec<ElifClause>,
        else_body: Option<Statement>,
    ) -> Self {
        Self::new(StatementKind::If {
            condition,
            then_body: Box::new(then_body),
            elifs,
            else_body: else_body.map(Box::new),
        })
    }

    pub fn ret(value: Option<Expression>) -> Self {
        Self::new(StatementKind::Return(value))
    }

    pub fn throw(value: Expression) -> Self {
        Self::new(StatementKind::Throw(value))
    }

    pub fn try_catch(body: Statement, catches: Vec<CatchClause>) -> Self {
        Self::new(StatementKind::TryCatch {
            body: Box::new(body),
            catches,
        })
    }
}

fn bind_children(kind: &StatementKind, parent: NodeId) {
    match kind {
        StatementKind::Block(statements) => statements.iter().for_each(|s| s.meta.bind_parent(parent)),
        StatementKind::Expression(expression) => expression.meta().bind_parent(parent),
        StatementKind::VariableDeclaration { value, type_annotation, .. } => {
            if let Some(annotation) = type_annotation {
                annotation.meta().bind_parent(parent);
            }
            value.meta().bind_parent(parent);
        }
        StatementKind::If { condition, then_body, elifs, else_body } => {
            condition.meta().bind_parent(parent);
            then_body.meta.bind_parent(parent);
            elifs.iter().for_each(|e| e.meta.bind_parent(parent));
            if let Some(else_body) = else_body {
                else_body.meta.bind_parent(parent);
            }
        }
        StatementKind::Return(value) => {
            if let Some(value) = value {
                value.meta().bind_parent(parent);
            }
        }
        StatementKind::Throw(value) => value.meta().bind_parent(parent),
        StatementKind::TryCatch { body, catches } => {
            body.meta.bind_parent(parent);
            catches.iter().for_each(|c| c.meta.bind_parent(parent));
        }
    }
}

#[derive(Debug)]
pub struct ElifClause {
    meta: NodeMeta,
    condition: Expression,
    body: Statement,
}

impl ElifClause {
    pub fn new(condition: Expression, body: Statement) -> Self {
        let meta = NodeMeta::new();
        condition.meta().bind_parent(meta.id());
        body.meta.bind_parent(meta.id());
        ElifClause { meta, condition, body }
    }

    pub fn condition(&self) -> &Expression {
        &self.condition
    }

    pub fn body(&self) -> &Statement {
        &self.body
    }
}

/// `catch ExceptionType variable: body`
#[derive(Debug)]
pub struct CatchClause {
    meta: NodeMeta,
    exception_type: TypeIdentifier,
    variable: String,
    body: Statement,
}

impl CatchClause {
    pub fn new(exception_type: TypeIdentifier, variable: impl Into<String>, body: Statement) -> Self {
        let meta = NodeMeta::new();
        exception_type.meta().bind_parent(meta.id());
        body.meta.bind_parent(meta.id());
        CatchClause {
            meta,
            exception_type,
            variable: variable.into(),
            body,
        }
    }

    pub fn exception_type(&self) -> &TypeIdentifier {
        &self.exception_type
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn body(&self) -> &Statement {
        &self.body
    }
}

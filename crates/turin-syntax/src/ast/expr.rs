use std::fmt;

use super::common::{impl_node, NodeId, NodeMeta, QualifiedName};
use crate::SyntaxError;

/// An expression node. Build it through `Expression::new` or one of the
/// shorthand constructors so that every child gets its parent bound.
#[derive(Debug)]
pub struct Expression {
    meta: NodeMeta,
    kind: ExpressionKind,
}

#[derive(Debug)]
pub enum ExpressionKind {
    IntLiteral(i32),
    DoubleLiteral(f64),
    StringLiteral(String),
    BooleanLiteral(bool),
    /// A bare name: a local, a parameter, or a top-level declaration
    ValueReference(String),
    /// Literal and embedded expression segments, in source order
    StringInterpolation(Vec<Expression>),
    StaticFieldAccess {
        subject: TypeIdentifier,
        field: String,
    },
    InstanceFieldAccess {
        subject: Box<Expression>,
        field: String,
    },
    InstanceMethodInvocation {
        subject: Box<Expression>,
        method: String,
        args: Vec<ActualParam>,
    },
    FunctionCall {
        function: Box<Expression>,
        args: Vec<ActualParam>,
    },
    ArrayAccess {
        array: Box<Expression>,
        index: Box<Expression>,
    },
    /// Constructor call, `type_name` may be qualified
    Creation {
        type_name: String,
        args: Vec<ActualParam>,
    },
    Not(Box<Expression>),
    Math {
        op: MathOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Logic {
        op: LogicOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Relational {
        op: RelationalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl_node!(Expression, ActualParam, TypeIdentifier);

impl Expression {
    pub fn new(kind: ExpressionKind) -> Self {
        let meta = NodeMeta::new();
        bind_children(&kind, meta.id());
        Expression { meta, kind }
    }

    pub fn kind(&self) -> &ExpressionKind {
        &self.kind
    }

    pub fn int(value: i32) -> Self {
        Self::new(ExpressionKind::IntLiteral(value))
    }

    pub fn double(value: f64) -> Self {
        Self::new(ExpressionKind::DoubleLiteral(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExpressionKind::StringLiteral(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(ExpressionKind::BooleanLiteral(value))
    }

    pub fn value_ref(name: impl Into<String>) -> Self {
        Self::new(ExpressionKind::ValueReference(name.into()))
    }

    pub fn interpolation(segments: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::StringInterpolation(segments))
    }

    pub fn static_field(subject: TypeIdentifier, field: impl Into<String>) -> Self {
        Self::new(ExpressionKind::StaticFieldAccess { subject, field: field.into() })
    }

    pub fn field(subject: Expression, field: impl Into<String>) -> Self {
        Self::new(ExpressionKind::InstanceFieldAccess {
            subject: Box::new(subject),
            field: field.into(),
        })
    }

    pub fn method_call(subject: Expression, method: impl Into<String>, args: Vec<ActualParam>) -> Self {
        Self::new(ExpressionKind::InstanceMethodInvocation {
            subject: Box::new(subject),
            method: method.into(),
            args,
        })
    }

    pub fn call(function: Expression, args: Vec<ActualParam>) -> Self {
        Self::new(ExpressionKind::FunctionCall {
            function: Box::new(function),
            args,
        })
    }

    pub fn array_access(array: Expression, index: Expression) -> Self {
        Self::new(ExpressionKind::ArrayAccess {
            array: Box::new(array),
            index: Box::new(index),
        })
    }

    pub fn creation(type_name: impl Into<String>, args: Vec<ActualParam>) -> Self {
        Self::new(ExpressionKind::Creation {
            type_name: type_name.into(),
            args,
        })
    }

    pub fn not(operand: Expression) -> Self {
        Self::new(ExpressionKind::Not(Box::new(operand)))
    }

    pub fn math(op: MathOperator, left: Expression, right: Expression) -> Self {
        Self::new(ExpressionKind::Math {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn logic(op: LogicOperator, left: Expression, right: Expression) -> Self {
        Self::new(ExpressionKind::Logic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn relational(op: RelationalOperator, left: Expression, right: Expression) -> Self {
        Self::new(ExpressionKind::Relational {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Name of the referenced value when this is a plain value reference.
    pub fn as_value_reference(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::ValueReference(name) => Some(name),
            _ => None,
        }
    }
}

fn bind_children(kind: &ExpressionKind, parent: NodeId) {
    match kind {
        ExpressionKind::IntLiteral(_)
        | ExpressionKind::DoubleLiteral(_)
        | ExpressionKind::StringLiteral(_)
        | ExpressionKind::BooleanLiteral(_)
        | ExpressionKind::ValueReference(_) => {}
        ExpressionKind::StringInterpolation(segments) => {
            segments.iter().for_each(|s| s.meta.bind_parent(parent));
        }
        ExpressionKind::StaticFieldAccess { subject, .. } => subject.meta.bind_parent(parent),
        ExpressionKind::InstanceFieldAccess { subject, .. } => subject.meta.bind_parent(parent),
        ExpressionKind::InstanceMethodInvocation { subject, args, .. } => {
            subject.meta.bind_parent(parent);
            args.iter().for_each(|a| a.meta.bind_parent(parent));
        }
        ExpressionKind::FunctionCall { function, args } => {
            function.meta.bind_parent(parent);
            args.iter().for_each(|a| a.meta.bind_parent(parent));
        }
        ExpressionKind::ArrayAccess { array, index } => {
            array.meta.bind_parent(parent);
            index.meta.bind_parent(parent);
        }
        ExpressionKind::Creation { args, .. } => {
            args.iter().for_each(|a| a.meta.bind_parent(parent));
        }
        ExpressionKind::Not(operand) => operand.meta.bind_parent(parent),
        ExpressionKind::Math { left, right, .. }
        | ExpressionKind::Logic { left, right, .. }
        | ExpressionKind::Relational { left, right, .. } => {
            left.meta.bind_parent(parent);
            right.meta.bind_parent(parent);
        }
    }
}

/// An argument of a call, optionally named (`foo(name = value)`).
#[derive(Debug)]
pub struct ActualParam {
    meta: NodeMeta,
    name: Option<String>,
    value: Expression,
}

impl ActualParam {
    pub fn positional(value: Expression) -> Self {
        let meta = NodeMeta::new();
        value.meta.bind_parent(meta.id());
        ActualParam { meta, name: None, value }
    }

    pub fn named(name: impl Into<String>, value: Expression) -> Self {
        let meta = NodeMeta::new();
        value.meta.bind_parent(meta.id());
        ActualParam {
            meta,
            name: Some(name.into()),
            value,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> &Expression {
        &self.value
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }
}

/// A reference to a type in expression position, e.g. the `Math` in `Math.PI`.
#[derive(Debug)]
pub struct TypeIdentifier {
    meta: NodeMeta,
    package: Option<QualifiedName>,
    name: String,
}

impl TypeIdentifier {
    pub fn new(package: Option<QualifiedName>, name: impl Into<String>) -> Self {
        TypeIdentifier {
            meta: NodeMeta::new(),
            package,
            name: name.into(),
        }
    }

    pub fn simple(name: impl Into<String>) -> Self {
        Self::new(None, name)
    }

    pub fn package(&self) -> Option<&QualifiedName> {
        self.package.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> String {
        match &self.package {
            Some(package) => format!("{}.{}", package, self.name),
            None => self.name.clone(),
        }
    }
}

macro_rules! operators {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $symbol:literal),* $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),*
        }

        impl $name {
            pub fn from_symbol(symbol: &str) -> Result<Self, SyntaxError> {
                match symbol {
                    $($symbol => Ok($name::$variant),)*
                    _ => Err(SyntaxError::UnknownOperator { symbol: symbol.to_string() }),
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $($name::$variant => $symbol),*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.symbol())
            }
        }
    };
}

operators!(
    /// Arithmetic operators
    MathOperator {
        Sum => "+",
        Subtraction => "-",
        Multiplication => "*",
        Division => "/",
    }
);

operators!(
    /// Boolean connectives
    LogicOperator {
        And => "and",
        Or => "or",
    }
);

operators!(
    RelationalOperator {
        Equal => "==",
        Different => "!=",
        Less => "<",
        LessOrEqual => "<=",
        Greater => ">",
        GreaterOrEqual => ">=",
    }
);

impl RelationalOperator {
    /// `==` and `!=` accept any pair of comparable operands, the others
    /// need numbers.
    pub fn is_equality(&self) -> bool {
        matches!(self, RelationalOperator::Equal | RelationalOperator::Different)
    }
}

//! Type computation for expressions.
//!
//! `calc_type` is a pure function of the expression, the resolver chain and
//! the local environment. It either produces a type or says why it cannot;
//! reporting the failure is up to the caller.

use turin_resolve::{MethodRequest, NameScope, PlatformMethod, PlatformSymbol, Symbol, SymbolResolver, TypeDefinitionRef};
use turin_syntax::{
    ActualParam, Expression, ExpressionKind, LogicOperator, MathOperator, RelationalOperator, TypeIdentifier,
};
use turin_types::{PrimitiveTypeUsage, TypeError, TypeUsage, OBJECT};

use crate::{CheckResult, TypeEnv};

/// What a file-level expression can see besides its locals.
#[derive(Clone, Copy)]
pub struct TypeContext<'a, 'r> {
    pub resolver: &'r dyn SymbolResolver<'a>,
    pub scope: NameScope<'a>,
}

impl<'a, 'r> TypeContext<'a, 'r> {
    pub fn new(resolver: &'r dyn SymbolResolver<'a>, scope: NameScope<'a>) -> Self {
        TypeContext { resolver, scope }
    }

    pub fn resolve_value(&self, name: &str) -> Option<Symbol<'a>> {
        self.scope.resolve_value(name, self.resolver)
    }

    pub fn resolve_type(&self, name: &str) -> Option<TypeDefinitionRef<'a>> {
        self.scope.resolve_type(name, self.resolver)
    }

    fn resolve_type_identifier(&self, ident: &TypeIdentifier) -> CheckResult<TypeDefinitionRef<'a>> {
        let name = ident.qualified_name();
        self.resolve_type(&name)
            .ok_or_else(|| TypeError::NotAType { name }.into())
    }
}

/// The type of `expr`.
pub fn calc_type(expr: &Expression, cx: &TypeContext<'_, '_>, env: &TypeEnv) -> CheckResult<TypeUsage> {
    match expr.kind() {
        ExpressionKind::IntLiteral(_) => Ok(TypeUsage::int()),
        ExpressionKind::DoubleLiteral(_) => Ok(TypeUsage::double()),
        ExpressionKind::StringLiteral(_) => Ok(TypeUsage::string()),
        ExpressionKind::BooleanLiteral(_) => Ok(TypeUsage::boolean()),
        ExpressionKind::ValueReference(name) => value_type(name, cx, env),
        ExpressionKind::StringInterpolation(segments) => {
            for segment in segments {
                calc_type(segment, cx, env)?;
            }
            Ok(TypeUsage::string())
        }
        ExpressionKind::StaticFieldAccess { subject, field } => {
            let owner = cx.resolve_type_identifier(subject)?;
            owner.static_field_type(field).ok_or_else(|| {
                TypeError::UnknownField {
                    field: field.clone(),
                    ty: owner.qualified_name(),
                }
                .into()
            })
        }
        ExpressionKind::InstanceFieldAccess { subject, field } => {
            let subject_type = calc_type(subject, cx, env)?;
            field_type(&subject_type, field, cx)
        }
        ExpressionKind::InstanceMethodInvocation { subject, method, args } => {
            let arg_types = arg_types(args, cx, env)?;
            if let Some(owner) = static_subject(subject, cx, env) {
                return static_call(&owner, method, arg_types, cx);
            }
            let subject_type = calc_type(subject, cx, env)?;
            instance_call(&subject_type, method, arg_types, cx)
        }
        ExpressionKind::FunctionCall { function, args } => {
            let arg_types = arg_types(args, cx, env)?;
            call_type(function, arg_types, cx, env)
        }
        ExpressionKind::ArrayAccess { array, index } => {
            let array_type = calc_type(array, cx, env)?;
            let component = match array_type.as_array_component() {
                Some(component) => component.clone(),
                None => {
                    return Err(TypeError::NotAnArray {
                        found: array_type.to_string(),
                    }
                    .into())
                }
            };
            let index_type = calc_type(index, cx, env)?;
            match index_type.as_primitive() {
                Some(p) if p.can_widen_to(&PrimitiveTypeUsage::Int) => Ok(component),
                _ => Err(TypeError::InvalidArrayIndex {
                    found: index_type.to_string(),
                }
                .into()),
            }
        }
        ExpressionKind::Creation { type_name, args } => {
            arg_types(args, cx, env)?;
            cx.resolve_type(type_name)
                .map(|ty| ty.type_usage())
                .ok_or_else(|| TypeError::NotAType { name: type_name.clone() }.into())
        }
        ExpressionKind::Not(operand) => {
            let operand_type = calc_type(operand, cx, env)?;
            if operand_type.is_boolean() {
                Ok(TypeUsage::boolean())
            } else {
                Err(TypeError::NotBoolean {
                    context: "operand of `not`".to_string(),
                    found: operand_type.to_string(),
                }
                .into())
            }
        }
        ExpressionKind::Math { op, left, right } => {
            let left = calc_type(left, cx, env)?;
            let right = calc_type(right, cx, env)?;
            math_type(*op, &left, &right)
        }
        ExpressionKind::Logic { op, left, right } => {
            let left = calc_type(left, cx, env)?;
            let right = calc_type(right, cx, env)?;
            logic_type(*op, &left, &right)
        }
        ExpressionKind::Relational { op, left, right } => {
            let left = calc_type(left, cx, env)?;
            let right = calc_type(right, cx, env)?;
            relational_type(*op, &left, &right)
        }
    }
}

fn value_type(name: &str, cx: &TypeContext<'_, '_>, env: &TypeEnv) -> CheckResult<TypeUsage> {
    if let Some(local) = env.lookup(name) {
        return Ok(local.clone());
    }
    match cx.resolve_value(name) {
        Some(symbol) => Ok(symbol.type_usage(cx.resolver)?),
        None => Err(TypeError::UnresolvedSymbol { name: name.to_string() }.into()),
    }
}

fn arg_types(args: &[ActualParam], cx: &TypeContext<'_, '_>, env: &TypeEnv) -> CheckResult<Vec<TypeUsage>> {
    args.iter().map(|arg| calc_type(arg.value(), cx, env)).collect()
}

fn field_type(subject_type: &TypeUsage, field: &str, cx: &TypeContext<'_, '_>) -> CheckResult<TypeUsage> {
    let unknown = || TypeError::UnknownField {
        field: field.to_string(),
        ty: subject_type.to_string(),
    };
    match subject_type {
        TypeUsage::Reference(reference) => {
            let owner = cx
                .resolver
                .find_type_definition(&reference.qualified_name)
                .ok_or_else(|| TypeError::NotAType {
                    name: reference.qualified_name.clone(),
                })?;
            match owner.field_type(field, cx.resolver) {
                Some(found) => Ok(found?),
                None => Err(unknown().into()),
            }
        }
        TypeUsage::Array(_) if field == "length" => Ok(TypeUsage::int()),
        _ => Err(unknown().into()),
    }
}

/// A subject that names a type rather than a value: `Math.max(a, b)`.
fn static_subject<'a>(subject: &Expression, cx: &TypeContext<'a, '_>, env: &TypeEnv) -> Option<TypeDefinitionRef<'a>> {
    let name = subject.as_value_reference()?;
    if env.lookup(name).is_some() {
        return None;
    }
    match cx.resolve_value(name)? {
        Symbol::Type(ty) => Some(ty),
        _ => None,
    }
}

fn static_call(
    owner: &TypeDefinitionRef<'_>,
    method: &str,
    arg_types: Vec<TypeUsage>,
    cx: &TypeContext<'_, '_>,
) -> CheckResult<TypeUsage> {
    match owner {
        // Source types have no static methods
        TypeDefinitionRef::Source(_) => Err(TypeError::UnknownMethod {
            method: method.to_string(),
            ty: owner.qualified_name(),
        }
        .into()),
        TypeDefinitionRef::Platform(ty) => platform_call(
            MethodRequest::on_class(ty.qualified_name.clone(), method, arg_types),
            cx,
        ),
    }
}

fn instance_call(
    subject_type: &TypeUsage,
    method: &str,
    arg_types: Vec<TypeUsage>,
    cx: &TypeContext<'_, '_>,
) -> CheckResult<TypeUsage> {
    let unknown = || TypeError::UnknownMethod {
        method: method.to_string(),
        ty: subject_type.to_string(),
    };
    let reference = subject_type.as_reference().ok_or_else(unknown)?;
    let owner = cx
        .resolver
        .find_type_definition(&reference.qualified_name)
        .ok_or_else(|| TypeError::NotAType {
            name: reference.qualified_name.clone(),
        })?;
    match &owner {
        TypeDefinitionRef::Source(_) => {
            if let Some(declared) = owner.methods(method).first() {
                let signature = declared.type_usage(cx.resolver)?;
                return invoke(
                    &declared.qualified_name(),
                    &TypeUsage::FunctionReference(signature),
                    &arg_types,
                );
            }
            // Everything else is inherited from the root of the hierarchy
            let request = MethodRequest::on_instance(OBJECT, method, arg_types);
            cx.resolver
                .find_platform_method(&request)
                .map(|m| m.return_type)
                .map_err(|_| unknown().into())
        }
        TypeDefinitionRef::Platform(ty) => platform_call(
            MethodRequest::on_instance(ty.qualified_name.clone(), method, arg_types),
            cx,
        ),
    }
}

/// Calls through a plain name are, in order: constructor calls, calls of a
/// declared function or function-typed value, and platform functions.
fn call_type(
    function: &Expression,
    arg_types: Vec<TypeUsage>,
    cx: &TypeContext<'_, '_>,
    env: &TypeEnv,
) -> CheckResult<TypeUsage> {
    if let ExpressionKind::StaticFieldAccess { subject, field } = function.kind() {
        let owner = cx.resolve_type_identifier(subject)?;
        return static_call(&owner, field, arg_types, cx);
    }
    if let Some(name) = function.as_value_reference() {
        if env.lookup(name).is_none() {
            return match cx.resolve_value(name) {
                Some(Symbol::Type(ty)) => Ok(ty.type_usage()),
                Some(Symbol::Platform(PlatformSymbol::Method(method))) => {
                    platform_call(method_request(&method, arg_types), cx)
                }
                Some(symbol) => invoke(name, &symbol.type_usage(cx.resolver)?, &arg_types),
                None => platform_call(MethodRequest::function(name, arg_types), cx),
            };
        }
    }
    let callee_type = calc_type(function, cx, env)?;
    invoke(&callee_type.to_string(), &callee_type, &arg_types)
}

fn invoke(name: &str, callee_type: &TypeUsage, arg_types: &[TypeUsage]) -> CheckResult<TypeUsage> {
    let function = callee_type.as_invokable().ok_or_else(|| TypeError::NotInvokable {
        found: callee_type.to_string(),
    })?;
    if function.arity() != arg_types.len() {
        return Err(TypeError::WrongNumberOfArguments {
            name: name.to_string(),
            expected: function.arity(),
            found: arg_types.len(),
        }
        .into());
    }
    Ok(function.return_type_when_invoked_with(arg_types))
}

/// A request for the overloads sharing the name of `method`.
fn method_request(method: &PlatformMethod, arg_types: Vec<TypeUsage>) -> MethodRequest {
    if method.owner.is_empty() {
        MethodRequest::function(method.name.clone(), arg_types)
    } else {
        MethodRequest::on_class(method.owner.clone(), method.name.clone(), arg_types)
    }
}

/// Method choice among overloads belongs to the platform resolver.
fn platform_call(request: MethodRequest, cx: &TypeContext<'_, '_>) -> CheckResult<TypeUsage> {
    match cx.resolver.find_platform_method(&request) {
        Ok(method) => Ok(method.return_type),
        Err(err) => {
            log::debug!("platform call `{}` unsolved: {}", request.display_name(), err);
            Err(TypeError::UnsolvedMethod {
                name: request.display_name(),
            }
            .into())
        }
    }
}

fn incompatible(op: &str, left: &TypeUsage, right: &TypeUsage) -> TypeError {
    TypeError::IncompatibleOperands {
        op: op.to_string(),
        left: left.to_string(),
        right: right.to_string(),
    }
}

fn math_type(op: MathOperator, left: &TypeUsage, right: &TypeUsage) -> CheckResult<TypeUsage> {
    // `+` with a string on either side concatenates
    if op == MathOperator::Sum && (left.is_string() || right.is_string()) && !left.is_void() && !right.is_void() {
        return Ok(TypeUsage::string());
    }
    match (left.as_primitive(), right.as_primitive()) {
        (Some(l), Some(r)) => l
            .promote(r)
            .map(TypeUsage::Primitive)
            .ok_or_else(|| incompatible(op.symbol(), left, right).into()),
        _ => Err(incompatible(op.symbol(), left, right).into()),
    }
}

fn logic_type(op: LogicOperator, left: &TypeUsage, right: &TypeUsage) -> CheckResult<TypeUsage> {
    if left.is_boolean() && right.is_boolean() {
        Ok(TypeUsage::boolean())
    } else {
        Err(incompatible(op.symbol(), left, right).into())
    }
}

fn relational_type(op: RelationalOperator, left: &TypeUsage, right: &TypeUsage) -> CheckResult<TypeUsage> {
    let comparable = if left.is_numeric() && right.is_numeric() {
        true
    } else {
        op.is_equality() && (left.can_be_assigned_to(right) || right.can_be_assigned_to(left))
    };
    if comparable {
        Ok(TypeUsage::boolean())
    } else {
        Err(incompatible(op.symbol(), left, right).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turin_resolve::SrcSymbolResolver;
    use turin_syntax::{QualifiedName, TurinFile};

    fn with_context(check: impl FnOnce(&TypeContext<'_, '_>)) {
        let files = vec![TurinFile::new(QualifiedName::parse("t").unwrap(), vec![], vec![])];
        let resolver = SrcSymbolResolver::new(&files);
        let cx = TypeContext::new(&resolver, NameScope::of(&files[0]));
        check(&cx);
    }

    #[test]
    fn test_math_promotes_to_the_wider_operand() {
        let int_plus_double = math_type(MathOperator::Sum, &TypeUsage::int(), &TypeUsage::double());
        assert_eq!(int_plus_double, Ok(TypeUsage::double()));
        let int_times_int = math_type(MathOperator::Multiplication, &TypeUsage::int(), &TypeUsage::int());
        assert_eq!(int_times_int, Ok(TypeUsage::int()));
    }

    #[test]
    fn test_string_sum_concatenates() {
        let result = math_type(MathOperator::Sum, &TypeUsage::string(), &TypeUsage::int());
        assert_eq!(result, Ok(TypeUsage::string()));
        assert!(math_type(MathOperator::Subtraction, &TypeUsage::string(), &TypeUsage::int()).is_err());
    }

    #[test]
    fn test_math_rejects_booleans() {
        let err = math_type(MathOperator::Sum, &TypeUsage::boolean(), &TypeUsage::int()).unwrap_err();
        assert_eq!(err.to_string(), "Operator `+` cannot be applied to `boolean` and `int`");
    }

    #[test]
    fn test_equality_needs_related_operands() {
        let eq = RelationalOperator::Equal;
        assert!(relational_type(eq, &TypeUsage::string(), &TypeUsage::object()).is_ok());
        assert!(relational_type(eq, &TypeUsage::boolean(), &TypeUsage::boolean()).is_ok());
        assert!(relational_type(eq, &TypeUsage::string(), &TypeUsage::int()).is_err());
        assert!(relational_type(RelationalOperator::Less, &TypeUsage::boolean(), &TypeUsage::boolean()).is_err());
        assert!(relational_type(RelationalOperator::Less, &TypeUsage::int(), &TypeUsage::double()).is_ok());
    }

    #[test]
    fn test_locals_shadow_declarations() {
        with_context(|cx| {
            let mut env = TypeEnv::new();
            env.define("x", TypeUsage::double());
            let expr = Expression::value_ref("x");
            assert_eq!(calc_type(&expr, cx, &env), Ok(TypeUsage::double()));
        });
    }

    #[test]
    fn test_array_length_is_an_int() {
        with_context(|cx| {
            let mut env = TypeEnv::new();
            env.define("xs", TypeUsage::array(TypeUsage::double()));
            let expr = Expression::field(Expression::value_ref("xs"), "length");
            assert_eq!(calc_type(&expr, cx, &env), Ok(TypeUsage::int()));
        });
    }

    #[test]
    fn test_not_requires_a_boolean() {
        with_context(|cx| {
            let env = TypeEnv::new();
            let ok = Expression::not(Expression::boolean(true));
            assert_eq!(calc_type(&ok, cx, &env), Ok(TypeUsage::boolean()));
            let err = calc_type(&Expression::not(Expression::int(1)), cx, &env).unwrap_err();
            assert_eq!(err.to_string(), "Expected a boolean operand of `not`, found `int`");
        });
    }
}

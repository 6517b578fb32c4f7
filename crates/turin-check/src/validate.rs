//! The validation walk.
//!
//! Every node is validated by its own check followed by the validation of
//! all of its children, in source order. A failing check never stops the
//! walk: the result of a node is the conjunction of its own check and of
//! every child, and all problems end up in the collector.

use fxhash::FxHashSet;
use log::trace;
use turin_resolve::{resolve_annotation, NameScope, SymbolResolver};
use turin_source::{ErrorCollector, Position};
use turin_syntax::{
    CatchClause, Expression, ImportDeclaration, ImportKind, NodeId, NodeRef, RelationDefinition, Statement,
    StatementKind, TurinFile, TypeAnnotation, TypeAnnotationKind,
};
use turin_types::{ReferenceTypeUsage, TypeError, TypeUsage};

use crate::{calc_type, TypeContext, TypeEnv};

const THROWABLE: &str = "java.lang.Throwable";

/// Validates `file` against `resolver`, recording problems in `collector`.
/// Returns `true` when nothing was recorded.
pub fn validate_file<'a, C: ErrorCollector>(
    file: &'a TurinFile,
    resolver: &dyn SymbolResolver<'a>,
    collector: &mut C,
) -> bool {
    Validator::new(file, resolver, collector).validate(NodeRef::File(file))
}

pub struct Validator<'a, 'r, C: ErrorCollector> {
    cx: TypeContext<'a, 'r>,
    env: TypeEnv,
    /// Declared return types of the enclosing bodies, `None` when the
    /// annotation does not resolve
    returns: Vec<Option<TypeUsage>>,
    /// Qualified name of the type being walked and the member names seen so far
    members: Option<(String, FxHashSet<String>)>,
    collector: &'r mut C,
}

impl<'a, 'r, C: ErrorCollector> Validator<'a, 'r, C> {
    pub fn new(file: &'a TurinFile, resolver: &'r dyn SymbolResolver<'a>, collector: &'r mut C) -> Self {
        Validator {
            cx: TypeContext::new(resolver, NameScope::of(file)),
            env: TypeEnv::new(),
            returns: Vec::new(),
            members: None,
            collector,
        }
    }

    pub fn validate(&mut self, node: NodeRef<'a>) -> bool {
        let scoped = self.enter(node);
        let mut valid = self.check(node);
        for child in node.children() {
            let child_valid = self.validate(child);
            valid = valid && child_valid;
        }
        self.leave(node, scoped);
        valid
    }

    fn error(&mut self, position: Option<Position>, message: impl Into<String>) -> bool {
        self.collector.record_semantic_error(position, message.into());
        false
    }

    fn annotation_type(&self, annotation: &TypeAnnotation) -> Option<TypeUsage> {
        resolve_annotation(annotation, &self.cx.scope, self.cx.resolver).ok()
    }

    /// Opens the scope a node introduces. Returns whether one was opened.
    fn enter(&mut self, node: NodeRef<'a>) -> bool {
        match node {
            NodeRef::TypeDefinition(ty) => {
                self.members = Some((ty.qualified_name(), FxHashSet::default()));
                false
            }
            NodeRef::FunctionDefinition(f) => {
                self.open_body(f.params().iter().map(|p| (p.name(), p.type_annotation())), f.return_type());
                true
            }
            NodeRef::MethodDefinition(m) => {
                self.open_body(m.params().iter().map(|p| (p.name(), p.type_annotation())), m.return_type());
                true
            }
            NodeRef::Program(p) => {
                self.env.push_scope();
                self.env.define(p.param_name(), TypeUsage::array(TypeUsage::string()));
                self.returns.push(Some(TypeUsage::Void));
                true
            }
            NodeRef::Statement(s) if matches!(s.kind(), StatementKind::Block(_)) => {
                self.env.push_scope();
                true
            }
            NodeRef::Catch(c) => {
                self.env.push_scope();
                if let Some(ty) = self.cx.resolve_type(&c.exception_type().qualified_name()) {
                    self.env.define(c.variable(), ty.type_usage());
                }
                true
            }
            _ => false,
        }
    }

    fn open_body<'p>(
        &mut self,
        params: impl Iterator<Item = (&'p str, &'p TypeAnnotation)>,
        return_type: &TypeAnnotation,
    ) {
        self.env.push_scope();
        for (name, annotation) in params {
            if let Some(ty) = self.annotation_type(annotation) {
                self.env.define(name, ty);
            }
        }
        let declared = self.annotation_type(return_type);
        self.returns.push(declared);
    }

    fn leave(&mut self, node: NodeRef<'a>, scoped: bool) {
        if let NodeRef::Statement(s) = node {
            if let StatementKind::VariableDeclaration {
                name,
                value,
                type_annotation,
            } = s.kind()
            {
                // Visible from the next statement on
                let declared = type_annotation.as_ref().and_then(|a| self.annotation_type(a));
                let ty = declared.or_else(|| calc_type(value, &self.cx, &self.env).ok());
                if let Some(ty) = ty {
                    self.env.define(name.as_str(), ty);
                }
            }
        }
        if scoped {
            self.env.pop_scope();
        }
        if let NodeRef::TypeDefinition(_) = node {
            self.members = None;
        }
        if matches!(
            node,
            NodeRef::FunctionDefinition(_) | NodeRef::MethodDefinition(_) | NodeRef::Program(_)
        ) {
            self.returns.pop();
        }
    }

    /// The check specific to one node, children excluded.
    fn check(&mut self, node: NodeRef<'a>) -> bool {
        trace!("checking {} {:?}", node.kind_name(), node.id());
        match node {
            NodeRef::Import(import) => self.check_import(import),
            NodeRef::TypeDefinition(ty) => self.check_unique(&ty.qualified_name(), ty.id(), ty.position()),
            NodeRef::PropertyDefinition(p) => {
                if p.context_name() == self.cx.scope.namespace() {
                    self.check_unique(&p.qualified_name(), p.id(), p.position())
                } else {
                    self.check_member(p.name(), p.position())
                }
            }
            NodeRef::PropertyReference(reference) => {
                let member = self.check_member(reference.name(), reference.position());
                let found = match self.cx.resolver.find_property(reference) {
                    Some(_) => true,
                    None => self.error(
                        reference.position(),
                        format!("Cannot find property `{}`", reference.qualified_name()),
                    ),
                };
                member && found
            }
            NodeRef::MethodDefinition(m) => self.check_member(m.name(), m.position()),
            NodeRef::FunctionDefinition(f) => self.check_unique(&f.qualified_name(), f.id(), f.position()),
            NodeRef::Program(p) => self.check_unique(&p.qualified_name(), p.id(), p.position()),
            NodeRef::Relation(relation) => self.check_relation(relation),
            NodeRef::Statement(statement) => self.check_statement(statement),
            NodeRef::Elif(elif) => self.check_condition(elif.condition(), "elif", elif.position()),
            NodeRef::Catch(catch) => self.check_catch(catch),
            NodeRef::TypeAnnotation(annotation) => self.check_annotation(annotation),
            _ => true,
        }
    }

    fn check_import(&mut self, import: &ImportDeclaration) -> bool {
        let resolver = self.cx.resolver;
        match import.kind() {
            ImportKind::AllPackage { package } => {
                let package = package.qualified_name();
                if resolver.exists_package(&package) {
                    true
                } else {
                    self.error(import.position(), format!("Package `{}` does not exist", package))
                }
            }
            ImportKind::Type { .. } => {
                let target = import.target().unwrap_or_default();
                if resolver.find_type_definition(&target).is_some() {
                    true
                } else {
                    self.error(import.position(), format!("Cannot find type `{}`", target))
                }
            }
            ImportKind::SingleField { .. } => {
                let target = import.target().unwrap_or_default();
                if resolver.find_symbol(&target).is_some() {
                    true
                } else {
                    self.error(import.position(), format!("Cannot find `{}`", target))
                }
            }
        }
    }

    /// A qualified name belongs to the declaration generic lookup finds for
    /// it: the first of its kind, types before properties, functions and
    /// programs. Any other node declaring the name is a duplicate.
    fn check_unique(&mut self, qualified_name: &str, id: NodeId, position: Option<Position>) -> bool {
        match self.cx.resolver.find_symbol(qualified_name).and_then(|s| s.node_id()) {
            Some(first) if first != id => {
                self.error(position, format!("Duplicate definition of `{}`", qualified_name))
            }
            _ => true,
        }
    }

    /// Member names are unique within their type; later members repeating
    /// a name are reported.
    fn check_member(&mut self, name: &str, position: Option<Position>) -> bool {
        let Some((owner, seen)) = self.members.as_mut() else {
            return true;
        };
        if seen.insert(name.to_string()) {
            return true;
        }
        let message = format!("Duplicate member `{}` in type `{}`", name, owner);
        self.error(position, message)
    }

    fn check_relation(&mut self, relation: &RelationDefinition) -> bool {
        if relation.has_valid_arity() {
            true
        } else {
            self.error(relation.position(), "Each relation should have exactly 2 fields")
        }
    }

    fn check_annotation(&mut self, annotation: &TypeAnnotation) -> bool {
        // The component of an array annotation is checked on its own
        if let TypeAnnotationKind::Array(_) = annotation.kind() {
            return true;
        }
        match resolve_annotation(annotation, &self.cx.scope, self.cx.resolver) {
            Ok(_) => true,
            Err(err) => self.error(annotation.position(), err.to_string()),
        }
    }

    fn check_catch(&mut self, catch: &CatchClause) -> bool {
        let name = catch.exception_type().qualified_name();
        match self.cx.resolve_type(&name) {
            Some(ty) if is_throwable(&ty.type_usage()) => true,
            Some(ty) => self.error(
                catch.position(),
                format!("Only subtypes of {} can be caught, found `{}`", THROWABLE, ty.qualified_name()),
            ),
            None => self.error(catch.position(), format!("Unknown exception type `{}`", name)),
        }
    }

    /// Type of an expression, recording the failure if there is none.
    fn expression_type(&mut self, expression: &Expression, fallback: Option<Position>) -> Option<TypeUsage> {
        match calc_type(expression, &self.cx, &self.env) {
            Ok(ty) => Some(ty),
            Err(err) => {
                self.error(expression.position().or(fallback), err.to_string());
                None
            }
        }
    }

    fn check_condition(&mut self, condition: &Expression, keyword: &str, fallback: Option<Position>) -> bool {
        let Some(ty) = self.expression_type(condition, fallback) else {
            return false;
        };
        if ty.is_boolean() {
            return true;
        }
        let err = TypeError::NotBoolean {
            context: format!("condition for `{}`", keyword),
            found: ty.to_string(),
        };
        self.error(condition.position().or(fallback), err.to_string())
    }

    fn check_statement(&mut self, statement: &Statement) -> bool {
        let position = statement.position();
        match statement.kind() {
            StatementKind::Block(_) | StatementKind::TryCatch { .. } => true,
            StatementKind::Expression(expression) => self.expression_type(expression, position).is_some(),
            StatementKind::VariableDeclaration {
                name,
                value,
                type_annotation,
            } => {
                let Some(value_type) = self.expression_type(value, position) else {
                    return false;
                };
                if value_type.is_void() {
                    let err = TypeError::VoidValue { name: name.clone() };
                    return self.error(position, err.to_string());
                }
                // An unresolved annotation is reported by the annotation itself
                let declared = type_annotation.as_ref().and_then(|a| self.annotation_type(a));
                match declared {
                    Some(declared) if !value_type.can_be_assigned_to(&declared) => self.error(
                        position,
                        format!(
                            "Cannot assign a value of type `{}` to `{}` of type `{}`",
                            value_type, name, declared
                        ),
                    ),
                    _ => true,
                }
            }
            StatementKind::If { condition, .. } => self.check_condition(condition, "if", position),
            StatementKind::Return(value) => self.check_return(value.as_ref(), position),
            StatementKind::Throw(value) => {
                let Some(ty) = self.expression_type(value, position) else {
                    return false;
                };
                if is_throwable(&ty) {
                    true
                } else {
                    self.error(
                        position,
                        format!("Only subtypes of {} can be thrown, found `{}`", THROWABLE, ty),
                    )
                }
            }
        }
    }

    fn check_return(&mut self, value: Option<&Expression>, position: Option<Position>) -> bool {
        let expected = self.returns.last().cloned().flatten();
        match (value, expected) {
            (Some(value), expected) => {
                let Some(ty) = self.expression_type(value, position) else {
                    return false;
                };
                match expected {
                    Some(TypeUsage::Void) => self.error(position, "Cannot return a value from a body returning void"),
                    Some(expected) if !ty.can_be_assigned_to(&expected) => self.error(
                        position,
                        format!("Cannot return a value of type `{}` where `{}` is expected", ty, expected),
                    ),
                    _ => true,
                }
            }
            (None, Some(expected)) if !expected.is_void() => {
                self.error(position, format!("Missing return value of type `{}`", expected))
            }
            (None, _) => true,
        }
    }
}

fn is_throwable(ty: &TypeUsage) -> bool {
    let throwable = ReferenceTypeUsage::new(THROWABLE, vec![]);
    matches!(ty, TypeUsage::Reference(r) if r.is_subtype_of(&throwable))
}

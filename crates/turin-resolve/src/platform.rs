//! The outer end of the resolver chain: types, fields and methods that are
//! provided by the host platform rather than declared in source.
//!
//! A real compiler would back this with class files read from the class
//! path. Here the table is built in memory, which is enough to plug the
//! platform seam and to exercise delegation in tests.

use std::sync::Arc;

use fxhash::{FxHashMap, FxHashSet};
use turin_syntax::{qualify, PropertyDefinition, PropertyReference};
use turin_types::{FunctionReferenceTypeUsage, ReferenceTypeUsage, TypeUsage, OBJECT};

use crate::symbol::{InFile, Symbol, TypeDefinitionRef};
use crate::{ResolutionError, ResolveResult, SymbolResolver};

const JAVA_LANG: &str = "java.lang";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformField {
    pub name: String,
    pub type_usage: TypeUsage,
    pub is_static: bool,
}

impl PlatformField {
    pub fn instance(name: impl Into<String>, type_usage: TypeUsage) -> Self {
        PlatformField {
            name: name.into(),
            type_usage,
            is_static: false,
        }
    }

    pub fn of_class(name: impl Into<String>, type_usage: TypeUsage) -> Self {
        PlatformField {
            name: name.into(),
            type_usage,
            is_static: true,
        }
    }
}

/// A method as the platform describes it. `owner` is the qualified name of
/// the declaring type, empty for free functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformMethod {
    pub owner: String,
    pub name: String,
    pub parameter_types: Vec<TypeUsage>,
    pub return_type: TypeUsage,
    pub is_static: bool,
}

impl PlatformMethod {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        parameter_types: Vec<TypeUsage>,
        return_type: TypeUsage,
    ) -> Self {
        PlatformMethod {
            owner: owner.into(),
            name: name.into(),
            parameter_types,
            return_type,
            is_static: false,
        }
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }

    pub fn accepts(&self, arg_types: &[TypeUsage]) -> bool {
        self.arity() == arg_types.len()
            && arg_types
                .iter()
                .zip(&self.parameter_types)
                .all(|(arg, param)| arg.can_be_assigned_to(param))
    }

    pub fn type_usage(&self) -> FunctionReferenceTypeUsage {
        FunctionReferenceTypeUsage::new(self.parameter_types.clone(), self.return_type.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformType {
    pub qualified_name: String,
    pub ancestors: Vec<String>,
    pub fields: Vec<PlatformField>,
    pub methods: Vec<PlatformMethod>,
}

impl PlatformType {
    /// A type directly below `java.lang.Object`.
    pub fn new(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let ancestors = if qualified_name == OBJECT {
            vec![]
        } else {
            vec![OBJECT.to_string()]
        };
        PlatformType {
            qualified_name,
            ancestors,
            fields: vec![],
            methods: vec![],
        }
    }

    /// Supertypes from the nearest up. `java.lang.Object` is always kept last.
    pub fn extending(mut self, ancestors: &[&str]) -> Self {
        let mut all: Vec<String> = ancestors.iter().map(|a| a.to_string()).collect();
        all.extend(self.ancestors.drain(..).filter(|a| !ancestors.contains(&a.as_str())));
        self.ancestors = all;
        self
    }

    pub fn with_field(mut self, field: PlatformField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, name: &str, parameter_types: Vec<TypeUsage>, return_type: TypeUsage) -> Self {
        let method = PlatformMethod::new(self.qualified_name.clone(), name, parameter_types, return_type);
        self.methods.push(method);
        self
    }

    pub fn with_static_method(mut self, name: &str, parameter_types: Vec<TypeUsage>, return_type: TypeUsage) -> Self {
        let method = PlatformMethod::new(self.qualified_name.clone(), name, parameter_types, return_type).into_static();
        self.methods.push(method);
        self
    }

    pub fn simple_name(&self) -> &str {
        self.qualified_name.rsplit('.').next().unwrap_or(&self.qualified_name)
    }

    pub fn package(&self) -> Option<&str> {
        self.qualified_name.rsplit_once('.').map(|(package, _)| package)
    }

    pub fn type_usage(&self) -> TypeUsage {
        TypeUsage::Reference(ReferenceTypeUsage::new(self.qualified_name.clone(), self.ancestors.clone()))
    }
}

/// A member of a platform type found by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformSymbol {
    Field { owner: String, field: PlatformField },
    Method(PlatformMethod),
}

impl PlatformSymbol {
    pub fn name(&self) -> &str {
        match self {
            PlatformSymbol::Field { field, .. } => &field.name,
            PlatformSymbol::Method(method) => &method.name,
        }
    }

    pub fn qualified_name(&self) -> String {
        match self {
            PlatformSymbol::Field { owner, field } => qualify(owner, &field.name),
            PlatformSymbol::Method(method) => qualify(&method.owner, &method.name),
        }
    }

    pub fn type_usage(&self) -> TypeUsage {
        match self {
            PlatformSymbol::Field { field, .. } => field.type_usage.clone(),
            PlatformSymbol::Method(method) => TypeUsage::FunctionReference(method.type_usage()),
        }
    }
}

/// A call to be matched against platform methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRequest {
    /// Qualified name of the receiver type, `None` for a free function call.
    pub owner: Option<String>,
    pub name: String,
    pub arg_types: Vec<TypeUsage>,
    pub static_context: bool,
}

impl MethodRequest {
    pub fn function(name: impl Into<String>, arg_types: Vec<TypeUsage>) -> Self {
        MethodRequest {
            owner: None,
            name: name.into(),
            arg_types,
            static_context: true,
        }
    }

    pub fn on_instance(owner: impl Into<String>, name: impl Into<String>, arg_types: Vec<TypeUsage>) -> Self {
        MethodRequest {
            owner: Some(owner.into()),
            name: name.into(),
            arg_types,
            static_context: false,
        }
    }

    pub fn on_class(owner: impl Into<String>, name: impl Into<String>, arg_types: Vec<TypeUsage>) -> Self {
        MethodRequest {
            owner: Some(owner.into()),
            name: name.into(),
            arg_types,
            static_context: true,
        }
    }

    pub fn display_name(&self) -> String {
        match &self.owner {
            Some(owner) => qualify(owner, &self.name),
            None => self.name.clone(),
        }
    }
}

/// Platform symbol table backed by memory.
#[derive(Debug, Default)]
pub struct PlatformResolver {
    types: FxHashMap<String, Arc<PlatformType>>,
    functions: Vec<PlatformMethod>,
    packages: FxHashSet<String>,
}

impl PlatformResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `java.lang` types a Turin program can use without imports, plus
    /// `java.io.PrintStream` for `System.out`.
    pub fn java_lang() -> Self {
        let object = TypeUsage::object();
        let string = TypeUsage::string();
        let int = TypeUsage::int();
        let double = TypeUsage::double();
        let boolean = TypeUsage::boolean();
        let print_stream = TypeUsage::Reference(ReferenceTypeUsage::new("java.io.PrintStream", vec![OBJECT.into()]));

        let throwable = |name: &str, ancestors: &[&str]| {
            PlatformType::new(format!("{JAVA_LANG}.{name}"))
                .extending(ancestors)
                .with_method("getMessage", vec![], string.clone())
        };

        let mut resolver = PlatformResolver::new();
        resolver
            .add_type(
                PlatformType::new(OBJECT)
                    .with_method("toString", vec![], string.clone())
                    .with_method("hashCode", vec![], int.clone())
                    .with_method("equals", vec![object.clone()], boolean.clone()),
            )
            .add_type(
                PlatformType::new("java.lang.String")
                    .with_method("length", vec![], int.clone())
                    .with_method("isEmpty", vec![], boolean.clone())
                    .with_method("concat", vec![string.clone()], string.clone())
                    .with_method("charAt", vec![int.clone()], TypeUsage::Primitive(turin_types::PrimitiveTypeUsage::Char))
                    .with_method("toString", vec![], string.clone()),
            )
            .add_type(
                PlatformType::new("java.lang.Math")
                    .with_field(PlatformField::of_class("PI", double.clone()))
                    .with_field(PlatformField::of_class("E", double.clone()))
                    .with_static_method("abs", vec![int.clone()], int.clone())
                    .with_static_method("abs", vec![double.clone()], double.clone())
                    .with_static_method("max", vec![int.clone(), int.clone()], int.clone())
                    .with_static_method("max", vec![double.clone(), double.clone()], double.clone())
                    .with_static_method("sqrt", vec![double.clone()], double.clone()),
            )
            .add_type(
                PlatformType::new("java.lang.Integer")
                    .with_field(PlatformField::of_class("MAX_VALUE", int.clone()))
                    .with_static_method("parseInt", vec![string.clone()], int.clone()),
            )
            .add_type(PlatformType::new("java.lang.System").with_field(PlatformField::of_class("out", print_stream)))
            .add_type(
                PlatformType::new("java.io.PrintStream")
                    .with_method("println", vec![string.clone()], TypeUsage::Void)
                    .with_method("println", vec![int.clone()], TypeUsage::Void)
                    .with_method("println", vec![object.clone()], TypeUsage::Void),
            )
            .add_type(throwable("Throwable", &[]))
            .add_type(throwable("Exception", &["java.lang.Throwable"]))
            .add_type(throwable("RuntimeException", &["java.lang.Exception", "java.lang.Throwable"]))
            .add_type(throwable(
                "IllegalArgumentException",
                &["java.lang.RuntimeException", "java.lang.Exception", "java.lang.Throwable"],
            ))
            .add_type(throwable(
                "IllegalStateException",
                &["java.lang.RuntimeException", "java.lang.Exception", "java.lang.Throwable"],
            ));
        resolver
    }

    /// Registers a type and every package enclosing it.
    pub fn add_type(&mut self, ty: PlatformType) -> &mut Self {
        if let Some(package) = ty.package() {
            let mut prefix = String::new();
            for segment in package.split('.') {
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(segment);
                self.packages.insert(prefix.clone());
            }
        }
        self.types.insert(ty.qualified_name.clone(), Arc::new(ty));
        self
    }

    /// Registers a function callable without a receiver.
    pub fn add_function(&mut self, name: &str, parameter_types: Vec<TypeUsage>, return_type: TypeUsage) -> &mut Self {
        self.functions
            .push(PlatformMethod::new("", name, parameter_types, return_type).into_static());
        self
    }

    pub fn platform_type(&self, qualified_name: &str) -> Option<&Arc<PlatformType>> {
        self.types.get(qualified_name)
    }

    fn find_member(&self, name: &str) -> Option<PlatformSymbol> {
        let (owner, member) = name.rsplit_once('.')?;
        let ty = self.types.get(owner)?;
        if let Some(field) = ty.fields.iter().find(|f| f.name == member) {
            return Some(PlatformSymbol::Field {
                owner: ty.qualified_name.clone(),
                field: field.clone(),
            });
        }
        ty.methods
            .iter()
            .find(|m| m.name == member)
            .cloned()
            .map(PlatformSymbol::Method)
    }

    /// Candidates are filtered by name, arity and staticness. Among several,
    /// the first whose parameters accept the arguments wins, otherwise the
    /// first declared.
    fn select<'m>(
        candidates: impl Iterator<Item = &'m PlatformMethod>,
        request: &MethodRequest,
    ) -> ResolveResult<PlatformMethod> {
        let matching: Vec<&PlatformMethod> = candidates
            .filter(|m| m.name == request.name && m.arity() == request.arg_types.len())
            .filter(|m| !request.static_context || m.is_static)
            .collect();
        matching
            .iter()
            .find(|m| m.accepts(&request.arg_types))
            .or_else(|| matching.first())
            .map(|m| (*m).clone())
            .ok_or_else(|| ResolutionError::UnsolvedMethod {
                name: request.display_name(),
            })
    }
}

impl<'a> SymbolResolver<'a> for PlatformResolver {
    fn find_type_definition(&self, name: &str) -> Option<TypeDefinitionRef<'a>> {
        self.types.get(name).cloned().map(TypeDefinitionRef::Platform)
    }

    fn find_property(&self, _reference: &PropertyReference) -> Option<InFile<'a, PropertyDefinition>> {
        None
    }

    fn find_symbol(&self, name: &str) -> Option<Symbol<'a>> {
        if let Some(ty) = self.types.get(name) {
            return Some(Symbol::Type(TypeDefinitionRef::Platform(ty.clone())));
        }
        if let Some(function) = self.functions.iter().find(|f| f.name == name) {
            return Some(Symbol::Platform(PlatformSymbol::Method(function.clone())));
        }
        self.find_member(name).map(Symbol::Platform)
    }

    fn find_platform_method(&self, request: &MethodRequest) -> ResolveResult<PlatformMethod> {
        match &request.owner {
            None => Self::select(self.functions.iter(), request),
            Some(owner) => {
                let ty = self.types.get(owner).ok_or_else(|| ResolutionError::UnsolvedMethod {
                    name: request.display_name(),
                })?;
                // Instance calls also see the methods of every ancestor
                let inherited = ty
                    .ancestors
                    .iter()
                    .filter(|_| !request.static_context)
                    .filter_map(|a| self.types.get(a))
                    .flat_map(|a| a.methods.iter());
                Self::select(ty.methods.iter().chain(inherited), request)
            }
        }
    }

    fn exists_package(&self, name: &str) -> bool {
        self.packages.contains(name)
    }
}

/// Outer resolver that knows nothing. Every lookup misses and every method
/// request is unsolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyPlatformResolver;

impl<'a> SymbolResolver<'a> for EmptyPlatformResolver {
    fn find_type_definition(&self, _name: &str) -> Option<TypeDefinitionRef<'a>> {
        None
    }

    fn find_property(&self, _reference: &PropertyReference) -> Option<InFile<'a, PropertyDefinition>> {
        None
    }

    fn find_symbol(&self, _name: &str) -> Option<Symbol<'a>> {
        None
    }

    fn find_platform_method(&self, request: &MethodRequest) -> ResolveResult<PlatformMethod> {
        Err(ResolutionError::UnsolvedMethod {
            name: request.display_name(),
        })
    }

    fn exists_package(&self, _name: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packages_are_derived_from_type_names() {
        let platform = PlatformResolver::java_lang();
        assert!(SymbolResolver::exists_package(&platform, "java"));
        assert!(SymbolResolver::exists_package(&platform, "java.lang"));
        assert!(SymbolResolver::exists_package(&platform, "java.io"));
        assert!(!SymbolResolver::exists_package(&platform, "java.util"));
    }

    #[test]
    fn test_exception_ancestors_end_with_object() {
        let platform = PlatformResolver::java_lang();
        let ty = platform.platform_type("java.lang.RuntimeException").unwrap();
        assert_eq!(
            ty.ancestors,
            vec!["java.lang.Exception", "java.lang.Throwable", "java.lang.Object"]
        );
        assert_eq!(ty.simple_name(), "RuntimeException");
    }

    #[test]
    fn test_overloads_are_chosen_by_argument_types() {
        let platform = PlatformResolver::java_lang();
        let request = MethodRequest::on_class("java.lang.Math", "abs", vec![TypeUsage::double()]);
        let method = SymbolResolver::find_platform_method(&platform, &request).unwrap();
        assert_eq!(method.return_type, TypeUsage::double());

        let request = MethodRequest::on_class("java.lang.Math", "abs", vec![TypeUsage::int()]);
        let method = SymbolResolver::find_platform_method(&platform, &request).unwrap();
        assert_eq!(method.return_type, TypeUsage::int());
    }

    #[test]
    fn test_instance_calls_see_inherited_methods() {
        let platform = PlatformResolver::java_lang();
        let request = MethodRequest::on_instance("java.lang.IllegalStateException", "hashCode", vec![]);
        let method = SymbolResolver::find_platform_method(&platform, &request).unwrap();
        assert_eq!(method.owner, OBJECT);
    }

    #[test]
    fn test_static_context_excludes_instance_methods() {
        let platform = PlatformResolver::java_lang();
        let request = MethodRequest::on_class("java.lang.String", "length", vec![]);
        let err = SymbolResolver::find_platform_method(&platform, &request).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::UnsolvedMethod {
                name: "java.lang.String.length".into()
            }
        );
    }
}

//! Symbols: everything a name can resolve to.
//!
//! Resolution never hands out raw AST nodes. A symbol always knows its name
//! and can compute its type.

use std::sync::Arc;

use turin_syntax::{
    qualify, FunctionDefinition, NodeId, MethodDefinition, Program, PropertyDefinition, TurinFile, TypeDefinition,
};
use turin_types::{FunctionReferenceTypeUsage, ReferenceTypeUsage, TypeUsage, OBJECT};

use crate::platform::{PlatformMethod, PlatformSymbol, PlatformType};
use crate::scope::{resolve_annotation, NameScope};
use crate::{ResolutionError, ResolveResult, SymbolResolver};

/// A declaration together with the file that owns it. The file supplies the
/// namespace and imports used to resolve the declaration's own annotations.
#[derive(Debug)]
pub struct InFile<'a, T> {
    pub node: &'a T,
    pub file: &'a TurinFile,
}

impl<'a, T> Clone for InFile<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for InFile<'a, T> {}

impl<'a, T> InFile<'a, T> {
    pub fn new(node: &'a T, file: &'a TurinFile) -> Self {
        InFile { node, file }
    }

    pub fn scope(&self) -> NameScope<'a> {
        NameScope::of(self.file)
    }
}

/// A local variable, parameter or catch variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSymbol {
    pub name: String,
    pub type_usage: TypeUsage,
}

#[derive(Debug, Clone)]
pub enum Symbol<'a> {
    Type(TypeDefinitionRef<'a>),
    Property(InFile<'a, PropertyDefinition>),
    Function(InFile<'a, FunctionDefinition>),
    Program(InFile<'a, Program>),
    Platform(PlatformSymbol),
    Local(LocalSymbol),
}

impl<'a> Symbol<'a> {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Type(t) => t.name(),
            Symbol::Property(p) => p.node.name(),
            Symbol::Function(f) => f.node.name(),
            Symbol::Program(p) => p.node.name(),
            Symbol::Platform(p) => p.name(),
            Symbol::Local(l) => &l.name,
        }
    }

    pub fn qualified_name(&self) -> String {
        match self {
            Symbol::Type(t) => t.qualified_name(),
            Symbol::Property(p) => p.node.qualified_name(),
            Symbol::Function(f) => f.node.qualified_name(),
            Symbol::Program(p) => p.node.qualified_name(),
            Symbol::Platform(p) => p.qualified_name(),
            Symbol::Local(l) => l.name.clone(),
        }
    }

    /// The declaring node, for symbols declared in source.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Symbol::Type(TypeDefinitionRef::Source(t)) => Some(t.node.id()),
            Symbol::Property(p) => Some(p.node.id()),
            Symbol::Function(f) => Some(f.node.id()),
            Symbol::Program(p) => Some(p.node.id()),
            _ => None,
        }
    }

    /// The declared type of the symbol.
    pub fn type_usage(&self, resolver: &dyn SymbolResolver<'a>) -> ResolveResult<TypeUsage> {
        match self {
            Symbol::Type(t) => Ok(t.type_usage()),
            Symbol::Property(p) => resolve_annotation(p.node.type_annotation(), &p.scope(), resolver),
            Symbol::Function(f) => {
                let scope = f.scope();
                let params = f
                    .node
                    .params()
                    .iter()
                    .map(|param| resolve_annotation(param.type_annotation(), &scope, resolver))
                    .collect::<ResolveResult<Vec<_>>>()?;
                let return_type = resolve_annotation(f.node.return_type(), &scope, resolver)?;
                Ok(TypeUsage::FunctionReference(FunctionReferenceTypeUsage::new(params, return_type)))
            }
            // A program is invoked with the command line arguments
            Symbol::Program(_) => Ok(TypeUsage::FunctionReference(FunctionReferenceTypeUsage::new(
                vec![TypeUsage::array(TypeUsage::string())],
                TypeUsage::Void,
            ))),
            Symbol::Platform(p) => Ok(p.type_usage()),
            Symbol::Local(l) => Ok(l.type_usage.clone()),
        }
    }

    pub fn as_type(&self) -> Option<&TypeDefinitionRef<'a>> {
        match self {
            Symbol::Type(t) => Some(t),
            _ => None,
        }
    }
}

/// A type declaration, from source or from the platform.
#[derive(Debug, Clone)]
pub enum TypeDefinitionRef<'a> {
    Source(InFile<'a, TypeDefinition>),
    Platform(Arc<PlatformType>),
}

impl<'a> TypeDefinitionRef<'a> {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinitionRef::Source(t) => t.node.name(),
            TypeDefinitionRef::Platform(t) => t.simple_name(),
        }
    }

    pub fn qualified_name(&self) -> String {
        match self {
            TypeDefinitionRef::Source(t) => t.node.qualified_name(),
            TypeDefinitionRef::Platform(t) => t.qualified_name.clone(),
        }
    }

    pub fn type_usage(&self) -> TypeUsage {
        match self {
            TypeDefinitionRef::Source(t) => TypeUsage::Reference(ReferenceTypeUsage::new(
                t.node.qualified_name(),
                vec![OBJECT.to_string()],
            )),
            TypeDefinitionRef::Platform(t) => t.type_usage(),
        }
    }

    /// Type of the instance field `name`.
    ///
    /// For source types the fields are the properties declared in the type
    /// plus the top-level properties it references.
    pub fn field_type(&self, name: &str, resolver: &dyn SymbolResolver<'a>) -> Option<ResolveResult<TypeUsage>> {
        match self {
            TypeDefinitionRef::Source(t) => {
                let scope = t.scope();
                if let Some(property) = t.node.direct_properties().find(|p| p.name() == name) {
                    return Some(resolve_annotation(property.type_annotation(), &scope, resolver));
                }
                let reference = t.node.property_references().find(|p| p.name() == name)?;
                Some(match resolver.find_property(reference) {
                    Some(property) => Symbol::Property(property).type_usage(resolver),
                    None => Err(ResolutionError::UnresolvedProperty {
                        name: reference.qualified_name(),
                    }),
                })
            }
            TypeDefinitionRef::Platform(t) => t
                .fields
                .iter()
                .find(|f| f.name == name && !f.is_static)
                .map(|f| Ok(f.type_usage.clone())),
        }
    }

    /// Type of the static field `name`. Source types have no static fields.
    pub fn static_field_type(&self, name: &str) -> Option<TypeUsage> {
        match self {
            TypeDefinitionRef::Source(_) => None,
            TypeDefinitionRef::Platform(t) => t
                .fields
                .iter()
                .find(|f| f.name == name && f.is_static)
                .map(|f| f.type_usage.clone()),
        }
    }

    /// Methods named `name`. Source types declare at most one.
    pub fn methods(&self, name: &str) -> Vec<MethodRef<'a>> {
        match self {
            TypeDefinitionRef::Source(t) => t
                .node
                .methods()
                .filter(|m| m.name() == name)
                .map(|m| MethodRef::Source(InFile::new(m, t.file)))
                .collect(),
            TypeDefinitionRef::Platform(t) => t
                .methods
                .iter()
                .filter(|m| m.name == name)
                .cloned()
                .map(MethodRef::Platform)
                .collect(),
        }
    }
}

/// A method found on a type.
#[derive(Debug, Clone)]
pub enum MethodRef<'a> {
    Source(InFile<'a, MethodDefinition>),
    Platform(PlatformMethod),
}

impl<'a> MethodRef<'a> {
    pub fn name(&self) -> &str {
        match self {
            MethodRef::Source(m) => m.node.name(),
            MethodRef::Platform(m) => &m.name,
        }
    }

    pub fn qualified_name(&self) -> String {
        match self {
            MethodRef::Source(m) => m.node.qualified_name(),
            MethodRef::Platform(m) => qualify(&m.owner, &m.name),
        }
    }

    pub fn type_usage(&self, resolver: &dyn SymbolResolver<'a>) -> ResolveResult<FunctionReferenceTypeUsage> {
        match self {
            MethodRef::Source(m) => {
                let scope = m.scope();
                let params = m
                    .node
                    .params()
                    .iter()
                    .map(|p| resolve_annotation(p.type_annotation(), &scope, resolver))
                    .collect::<ResolveResult<Vec<_>>>()?;
                let return_type = resolve_annotation(m.node.return_type(), &scope, resolver)?;
                Ok(FunctionReferenceTypeUsage::new(params, return_type))
            }
            MethodRef::Platform(m) => Ok(m.type_usage()),
        }
    }
}

use std::fmt;

use crate::{JvmType, PrimitiveTypeUsage};

/// Qualified name of the root of the reference type hierarchy.
pub const OBJECT: &str = "java.lang.Object";
/// Qualified name of the string type.
pub const STRING: &str = "java.lang.String";

/// A type as used at some point of the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeUsage {
    Primitive(PrimitiveTypeUsage),
    Reference(ReferenceTypeUsage),
    Array(Box<TypeUsage>),
    FunctionReference(FunctionReferenceTypeUsage),
    Void,
}

impl TypeUsage {
    pub fn int() -> Self {
        TypeUsage::Primitive(PrimitiveTypeUsage::Int)
    }

    pub fn double() -> Self {
        TypeUsage::Primitive(PrimitiveTypeUsage::Double)
    }

    pub fn boolean() -> Self {
        TypeUsage::Primitive(PrimitiveTypeUsage::Boolean)
    }

    pub fn string() -> Self {
        TypeUsage::Reference(ReferenceTypeUsage::new(STRING, vec![OBJECT.to_string()]))
    }

    pub fn object() -> Self {
        TypeUsage::Reference(ReferenceTypeUsage::new(OBJECT, vec![]))
    }

    pub fn array(component: TypeUsage) -> Self {
        TypeUsage::Array(Box::new(component))
    }

    pub fn reference(qualified_name: impl Into<String>) -> Self {
        TypeUsage::Reference(ReferenceTypeUsage::new(qualified_name, vec![]))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeUsage::Primitive(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, TypeUsage::Reference(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeUsage::Array(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeUsage::Void)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeUsage::Primitive(p) if p.is_numeric())
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, TypeUsage::Primitive(p) if p.is_boolean())
    }

    pub fn is_string(&self) -> bool {
        matches!(self, TypeUsage::Reference(r) if r.qualified_name == STRING)
    }

    /// Whether a value of this type can be called with actual parameters.
    pub fn is_invokable(&self) -> bool {
        matches!(self, TypeUsage::FunctionReference(_))
    }

    pub fn as_primitive(&self) -> Option<PrimitiveTypeUsage> {
        match self {
            TypeUsage::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceTypeUsage> {
        match self {
            TypeUsage::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Component type when this is an array.
    pub fn as_array_component(&self) -> Option<&TypeUsage> {
        match self {
            TypeUsage::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_invokable(&self) -> Option<&FunctionReferenceTypeUsage> {
        match self {
            TypeUsage::FunctionReference(f) => Some(f),
            _ => None,
        }
    }

    /// Structural for arrays and function references, nominal for references.
    pub fn same_type(&self, other: &TypeUsage) -> bool {
        self == other
    }

    /// Whether a value of this type can be stored in a variable of type `target`.
    pub fn can_be_assigned_to(&self, target: &TypeUsage) -> bool {
        match self {
            TypeUsage::Primitive(p) => match target {
                TypeUsage::Primitive(q) => p.can_widen_to(q),
                _ => false,
            },
            TypeUsage::Reference(r) => match target {
                TypeUsage::Reference(t) => r.is_subtype_of(t),
                _ => false,
            },
            TypeUsage::Array(component) => match target {
                TypeUsage::Array(target_component) => component.can_be_assigned_to(target_component),
                TypeUsage::Reference(t) => t.qualified_name == OBJECT,
                _ => false,
            },
            // Function references are computed, never stored
            TypeUsage::FunctionReference(_) => false,
            TypeUsage::Void => false,
        }
    }

    /// Representation of this type in the platform type system.
    pub fn jvm_type(&self) -> JvmType {
        match self {
            TypeUsage::Primitive(p) => p.jvm_type(),
            TypeUsage::Reference(r) => JvmType::object(&r.qualified_name),
            TypeUsage::Array(component) => JvmType::array_of(&component.jvm_type()),
            TypeUsage::FunctionReference(f) => f.return_type.jvm_type(),
            TypeUsage::Void => JvmType::void(),
        }
    }
}

impl fmt::Display for TypeUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeUsage::Primitive(p) => write!(f, "{}", p),
            TypeUsage::Reference(r) => f.write_str(&r.qualified_name),
            TypeUsage::Array(component) => write!(f, "{}[]", component),
            TypeUsage::FunctionReference(function) => write!(f, "{}", function),
            TypeUsage::Void => f.write_str("void"),
        }
    }
}

/// A reference to a declared type, either from source or from the platform.
///
/// Identity is the qualified name: two usages are the same type when they
/// name the same declaration. `ancestors` lists the qualified names of the
/// supertypes known for the declaration.
#[derive(Debug, Clone, Eq)]
pub struct ReferenceTypeUsage {
    pub qualified_name: String,
    pub ancestors: Vec<String>,
}

impl ReferenceTypeUsage {
    pub fn new(qualified_name: impl Into<String>, ancestors: Vec<String>) -> Self {
        ReferenceTypeUsage {
            qualified_name: qualified_name.into(),
            ancestors,
        }
    }

    pub fn is_subtype_of(&self, other: &ReferenceTypeUsage) -> bool {
        self.qualified_name == other.qualified_name
            || other.qualified_name == OBJECT
            || self.ancestors.iter().any(|a| *a == other.qualified_name)
    }
}

impl PartialEq for ReferenceTypeUsage {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name == other.qualified_name
    }
}

/// The type of a function value: fixed arity, never overloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionReferenceTypeUsage {
    pub parameter_types: Vec<TypeUsage>,
    pub return_type: Box<TypeUsage>,
}

impl FunctionReferenceTypeUsage {
    pub fn new(parameter_types: Vec<TypeUsage>, return_type: TypeUsage) -> Self {
        FunctionReferenceTypeUsage {
            parameter_types,
            return_type: Box::new(return_type),
        }
    }

    /// The declared return type. Actual parameter types are not consulted:
    /// function references are not overloaded.
    pub fn return_type_when_invoked_with(&self, _actual_params: &[TypeUsage]) -> TypeUsage {
        (*self.return_type).clone()
    }

    pub fn is_overloaded(&self) -> bool {
        false
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

impl fmt::Display for FunctionReferenceTypeUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameter_types.iter().map(ToString::to_string).collect();
        write!(f, "({}) -> {}", params.join(", "), self.return_type)
    }
}

use std::fmt;

use super::common::{impl_node, NodeMeta};

/// A type as written in the source, before resolution.
#[derive(Debug)]
pub struct TypeAnnotation {
    meta: NodeMeta,
    kind: TypeAnnotationKind,
}

#[derive(Debug)]
pub enum TypeAnnotationKind {
    /// `int`, `double`, `boolean`, ...
    Primitive(String),
    /// A type referred to by name, qualified or not
    Reference(String),
    Array(Box<TypeAnnotation>),
    Void,
}

impl_node!(TypeAnnotation);

impl TypeAnnotation {
    pub fn new(kind: TypeAnnotationKind) -> Self {
        let meta = NodeMeta::new();
        if let TypeAnnotationKind::Array(component) = &kind {
            component.meta.bind_parent(meta.id());
        }
        TypeAnnotation { meta, kind }
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self::new(TypeAnnotationKind::Primitive(name.into()))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::new(TypeAnnotationKind::Reference(name.into()))
    }

    pub fn array(component: TypeAnnotation) -> Self {
        Self::new(TypeAnnotationKind::Array(Box::new(component)))
    }

    pub fn void() -> Self {
        Self::new(TypeAnnotationKind::Void)
    }

    pub fn kind(&self) -> &TypeAnnotationKind {
        &self.kind
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeAnnotationKind::Void)
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeAnnotationKind::Primitive(name) | TypeAnnotationKind::Reference(name) => f.write_str(name),
            TypeAnnotationKind::Array(component) => write!(f, "{}[]", component),
            TypeAnnotationKind::Void => f.write_str("void"),
        }
    }
}

use super::common::{impl_node, qualify, ContextSlot, NodeMeta, QualifiedName};
use super::relations::RelationDefinition;
use super::stmt::Statement;
use super::types::TypeAnnotation;

/// Accessors shared by named declarations. The context name is bound when the
/// declaration is attached to its file (namespace) or type (type name).
macro_rules! impl_declaration {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                pub fn name(&self) -> &str {
                    &self.name
                }

                pub fn context_name(&self) -> &str {
                    self.context.get()
                }

                pub fn qualified_name(&self) -> String {
                    $crate::ast::common::qualify(self.context_name(), &self.name)
                }
            }
        )*
    };
}
pub(crate) use impl_declaration;

/// One compilation unit: a namespace, its imports and its members.
#[derive(Debug)]
pub struct TurinFile {
    meta: NodeMeta,
    namespace: QualifiedName,
    imports: Vec<ImportDeclaration>,
    members: Vec<FileMember>,
}

#[derive(Debug)]
pub enum FileMember {
    Type(TypeDefinition),
    Property(PropertyDefinition),
    Program(Program),
    Function(FunctionDefinition),
    Relation(RelationDefinition),
}

impl FileMember {
    pub fn meta(&self) -> &NodeMeta {
        match self {
            FileMember::Type(t) => t.meta(),
            FileMember::Property(p) => p.meta(),
            FileMember::Program(p) => p.meta(),
            FileMember::Function(f) => f.meta(),
            FileMember::Relation(r) => r.meta(),
        }
    }

    fn bind_context(&self, namespace: &str) {
        match self {
            FileMember::Type(t) => t.bind_context(namespace),
            FileMember::Property(p) => p.context.bind(namespace, p.id()),
            FileMember::Program(p) => p.context.bind(namespace, p.id()),
            FileMember::Function(f) => f.context.bind(namespace, f.id()),
            FileMember::Relation(r) => r.bind_context(namespace),
        }
    }
}

impl_node!(TurinFile);

impl TurinFile {
    pub fn new(namespace: QualifiedName, imports: Vec<ImportDeclaration>, members: Vec<FileMember>) -> Self {
        let meta = NodeMeta::new();
        let context = namespace.qualified_name();
        for import in &imports {
            import.meta.bind_parent(meta.id());
        }
        for member in &members {
            member.meta().bind_parent(meta.id());
            member.bind_context(&context);
        }
        TurinFile {
            meta,
            namespace,
            imports,
            members,
        }
    }

    pub fn namespace(&self) -> &QualifiedName {
        &self.namespace
    }

    pub fn imports(&self) -> &[ImportDeclaration] {
        &self.imports
    }

    pub fn members(&self) -> &[FileMember] {
        &self.members
    }

    pub fn type_definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.members.iter().filter_map(|m| match m {
            FileMember::Type(t) => Some(t),
            _ => None,
        })
    }

    pub fn property_definitions(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.members.iter().filter_map(|m| match m {
            FileMember::Property(p) => Some(p),
            _ => None,
        })
    }

    pub fn programs(&self) -> impl Iterator<Item = &Program> {
        self.members.iter().filter_map(|m| match m {
            FileMember::Program(p) => Some(p),
            _ => None,
        })
    }

    pub fn function_definitions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.members.iter().filter_map(|m| match m {
            FileMember::Function(f) => Some(f),
            _ => None,
        })
    }

    pub fn relation_definitions(&self) -> impl Iterator<Item = &RelationDefinition> {
        self.members.iter().filter_map(|m| match m {
            FileMember::Relation(r) => Some(r),
            _ => None,
        })
    }
}

#[derive(Debug)]
pub struct ImportDeclaration {
    meta: NodeMeta,
    kind: ImportKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportKind {
    /// `import pkg.Type [as Alias]`
    Type {
        package: QualifiedName,
        type_name: String,
        alias: Option<String>,
    },
    /// `import pkg.Type.field [as alias]`
    SingleField {
        package: QualifiedName,
        type_name: String,
        field: String,
        alias: Option<String>,
    },
    /// `import pkg.*`
    AllPackage { package: QualifiedName },
}

impl_node!(ImportDeclaration);

impl ImportDeclaration {
    pub fn new(kind: ImportKind) -> Self {
        ImportDeclaration {
            meta: NodeMeta::new(),
            kind,
        }
    }

    pub fn kind(&self) -> &ImportKind {
        &self.kind
    }

    pub fn package(&self) -> &QualifiedName {
        match &self.kind {
            ImportKind::Type { package, .. }
            | ImportKind::SingleField { package, .. }
            | ImportKind::AllPackage { package } => package,
        }
    }

    /// The local name introduced by the import, `None` for wildcard imports.
    pub fn local_name(&self) -> Option<&str> {
        match &self.kind {
            ImportKind::Type { type_name, alias, .. } => Some(alias.as_deref().unwrap_or(type_name)),
            ImportKind::SingleField { field, alias, .. } => Some(alias.as_deref().unwrap_or(field)),
            ImportKind::AllPackage { .. } => None,
        }
    }

    /// Qualified name of the imported declaration, `None` for wildcard imports.
    pub fn target(&self) -> Option<String> {
        match &self.kind {
            ImportKind::Type { package, type_name, .. } => Some(qualify(&package.qualified_name(), type_name)),
            ImportKind::SingleField {
                package,
                type_name,
                field,
                ..
            } => Some(format!("{}.{}.{}", package, type_name, field)),
            ImportKind::AllPackage { .. } => None,
        }
    }
}

/// A type declared in source.
#[derive(Debug)]
pub struct TypeDefinition {
    meta: NodeMeta,
    context: ContextSlot,
    name: String,
    members: Vec<TypeMember>,
}

#[derive(Debug)]
pub enum TypeMember {
    Property(PropertyDefinition),
    PropertyReference(PropertyReference),
    Method(MethodDefinition),
}

impl TypeMember {
    pub fn meta(&self) -> &NodeMeta {
        match self {
            TypeMember::Property(p) => p.meta(),
            TypeMember::PropertyReference(p) => p.meta(),
            TypeMember::Method(m) => m.meta(),
        }
    }
}

impl_node!(TypeDefinition);
impl_declaration!(TypeDefinition);

impl TypeDefinition {
    pub fn new(name: impl Into<String>, members: Vec<TypeMember>) -> Self {
        let meta = NodeMeta::new();
        for member in &members {
            member.meta().bind_parent(meta.id());
        }
        TypeDefinition {
            meta,
            context: ContextSlot::default(),
            name: name.into(),
            members,
        }
    }

    fn bind_context(&self, namespace: &str) {
        self.context.bind(namespace, self.id());
        let own = self.qualified_name();
        for member in &self.members {
            match member {
                TypeMember::Property(p) => p.context.bind(&own, p.id()),
                // A property reference points at a top-level property of the namespace
                TypeMember::PropertyReference(p) => p.context.bind(namespace, p.id()),
                TypeMember::Method(m) => m.context.bind(&own, m.id()),
            }
        }
    }

    pub fn members(&self) -> &[TypeMember] {
        &self.members
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDefinition> {
        self.members.iter().filter_map(|m| match m {
            TypeMember::Method(m) => Some(m),
            _ => None,
        })
    }

    pub fn direct_properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.members.iter().filter_map(|m| match m {
            TypeMember::Property(p) => Some(p),
            _ => None,
        })
    }

    pub fn property_references(&self) -> impl Iterator<Item = &PropertyReference> {
        self.members.iter().filter_map(|m| match m {
            TypeMember::PropertyReference(p) => Some(p),
            _ => None,
        })
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods().find(|m| m.name() == name)
    }
}

/// `Type name` either at top level or inside a type.
#[derive(Debug)]
pub struct PropertyDefinition {
    meta: NodeMeta,
    context: ContextSlot,
    name: String,
    type_annotation: TypeAnnotation,
}

impl_node!(PropertyDefinition);
impl_declaration!(PropertyDefinition);

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, type_annotation: TypeAnnotation) -> Self {
        let meta = NodeMeta::new();
        type_annotation.meta().bind_parent(meta.id());
        PropertyDefinition {
            meta,
            context: ContextSlot::default(),
            name: name.into(),
            type_annotation,
        }
    }

    pub fn type_annotation(&self) -> &TypeAnnotation {
        &self.type_annotation
    }
}

/// `has name` inside a type: reuses a top-level property of the namespace.
#[derive(Debug)]
pub struct PropertyReference {
    meta: NodeMeta,
    context: ContextSlot,
    name: String,
}

impl_node!(PropertyReference);
impl_declaration!(PropertyReference);

impl PropertyReference {
    pub fn new(name: impl Into<String>) -> Self {
        PropertyReference {
            meta: NodeMeta::new(),
            context: ContextSlot::default(),
            name: name.into(),
        }
    }
}

#[derive(Debug)]
pub struct FormalParameter {
    meta: NodeMeta,
    type_annotation: TypeAnnotation,
    name: String,
}

impl_node!(FormalParameter);

impl FormalParameter {
    pub fn new(type_annotation: TypeAnnotation, name: impl Into<String>) -> Self {
        let meta = NodeMeta::new();
        type_annotation.meta().bind_parent(meta.id());
        FormalParameter {
            meta,
            type_annotation,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_annotation(&self) -> &TypeAnnotation {
        &self.type_annotation
    }
}

/// Shared constructor body of functions and methods.
fn bind_invokable(meta: &NodeMeta, return_type: &TypeAnnotation, params: &[FormalParameter], body: &Statement) {
    return_type.meta().bind_parent(meta.id());
    for param in params {
        param.meta().bind_parent(meta.id());
    }
    body.meta().bind_parent(meta.id());
}

#[derive(Debug)]
pub struct FunctionDefinition {
    meta: NodeMeta,
    context: ContextSlot,
    name: String,
    return_type: TypeAnnotation,
    params: Vec<FormalParameter>,
    body: Statement,
}

impl_node!(FunctionDefinition);
impl_declaration!(FunctionDefinition);

impl FunctionDefinition {
    pub fn new(
        name: impl Into<String>,
        return_type: TypeAnnotation,
        params: Vec<FormalParameter>,
        body: Statement,
    ) -> Self {
        let meta = NodeMeta::new();
        bind_invokable(&meta, &return_type, &params, &body);
        FunctionDefinition {
            meta,
            context: ContextSlot::default(),
            name: name.into(),
            return_type,
            params,
            body,
        }
    }

    pub fn return_type(&self) -> &TypeAnnotation {
        &self.return_type
    }

    pub fn params(&self) -> &[FormalParameter] {
        &self.params
    }

    pub fn body(&self) -> &Statement {
        &self.body
    }
}

#[derive(Debug)]
pub struct MethodDefinition {
    meta: NodeMeta,
    context: ContextSlot,
    name: String,
    return_type: TypeAnnotation,
    params: Vec<FormalParameter>,
    body: Statement,
}

impl_node!(MethodDefinition);
impl_declaration!(MethodDefinition);

impl MethodDefinition {
    pub fn new(
        name: impl Into<String>,
        return_type: TypeAnnotation,
        params: Vec<FormalParameter>,
        body: Statement,
    ) -> Self {
        let meta = NodeMeta::new();
        bind_invokable(&meta, &return_type, &params, &body);
        MethodDefinition {
            meta,
            context: ContextSlot::default(),
            name: name.into(),
            return_type,
            params,
            body,
        }
    }

    pub fn return_type(&self) -> &TypeAnnotation {
        &self.return_type
    }

    pub fn params(&self) -> &[FormalParameter] {
        &self.params
    }

    pub fn body(&self) -> &Statement {
        &self.body
    }
}

/// An entry point: `program Name(String[] args) { ... }`
#[derive(Debug)]
pub struct Program {
    meta: NodeMeta,
    context: ContextSlot,
    name: String,
    param_name: String,
    body: Statement,
}

impl_node!(Program);
impl_declaration!(Program);

impl Program {
    pub fn new(name: impl Into<String>, body: Statement, param_name: impl Into<String>) -> Self {
        let meta = NodeMeta::new();
        body.meta().bind_parent(meta.id());
        Program {
            meta,
            context: ContextSlot::default(),
            name: name.into(),
            param_name: param_name.into(),
            body,
        }
    }

    pub fn param_name(&self) -> &str {
        &self.param_name
    }

    pub fn body(&self) -> &Statement {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;

    fn namespace(name: &str) -> QualifiedName {
        QualifiedName::parse(name).unwrap()
    }

    #[test]
    fn test_context_names_follow_enclosing_declarations() {
        let ty = TypeDefinition::new(
            "Point",
            vec![
                TypeMember::Property(PropertyDefinition::new("x", TypeAnnotation::primitive("int"))),
                TypeMember::PropertyReference(PropertyReference::new("name")),
                TypeMember::Method(MethodDefinition::new(
                    "norm",
                    TypeAnnotation::primitive("double"),
                    vec![],
                    Statement::block(vec![Statement::ret(Some(Expression::double(0.0)))]),
                )),
            ],
        );
        let file = TurinFile::new(
            namespace("geo.shapes"),
            vec![],
            vec![
                FileMember::Type(ty),
                FileMember::Property(PropertyDefinition::new("name", TypeAnnotation::reference("String"))),
            ],
        );

        let ty = file.type_definitions().next().unwrap();
        assert_eq!(ty.qualified_name(), "geo.shapes.Point");
        assert_eq!(ty.meta().parent(), Some(file.id()));
        assert_eq!(ty.direct_properties().next().unwrap().qualified_name(), "geo.shapes.Point.x");
        assert_eq!(ty.property_references().next().unwrap().qualified_name(), "geo.shapes.name");
        assert_eq!(ty.find_method("norm").unwrap().qualified_name(), "geo.shapes.Point.norm");
        assert_eq!(file.property_definitions().next().unwrap().qualified_name(), "geo.shapes.name");
    }

    #[test]
    fn test_import_names() {
        let type_import = ImportDeclaration::new(ImportKind::Type {
            package: namespace("java.util"),
            type_name: "List".to_string(),
            alias: Some("JList".to_string()),
        });
        assert_eq!(type_import.local_name(), Some("JList"));
        assert_eq!(type_import.target().as_deref(), Some("java.util.List"));

        let field_import = ImportDeclaration::new(ImportKind::SingleField {
            package: namespace("java.lang"),
            type_name: "Math".to_string(),
            field: "PI".to_string(),
            alias: None,
        });
        assert_eq!(field_import.local_name(), Some("PI"));
        assert_eq!(field_import.target().as_deref(), Some("java.lang.Math.PI"));

        let all = ImportDeclaration::new(ImportKind::AllPackage { package: namespace("java.io") });
        assert_eq!(all.local_name(), None);
        assert_eq!(all.package().qualified_name(), "java.io");
    }
}

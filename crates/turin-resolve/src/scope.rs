//! Turning names as written in a file into qualified lookup keys.

use turin_syntax::{qualify, ImportKind, TurinFile, TypeAnnotation, TypeAnnotationKind};
use turin_types::{PrimitiveTypeUsage, TypeUsage};

use crate::symbol::{Symbol, TypeDefinitionRef};
use crate::{ResolutionError, ResolveResult, SymbolResolver};

/// Package visible in every file without an import.
const IMPLICIT_PACKAGE: &str = "java.lang";

/// The naming context of one file: its namespace and its imports.
#[derive(Debug, Clone, Copy)]
pub struct NameScope<'a> {
    file: &'a TurinFile,
}

impl<'a> NameScope<'a> {
    pub fn of(file: &'a TurinFile) -> Self {
        NameScope { file }
    }

    pub fn file(&self) -> &'a TurinFile {
        self.file
    }

    pub fn namespace(&self) -> String {
        self.file.namespace().qualified_name()
    }

    /// Qualified names `name` may stand for, most specific first.
    ///
    /// An explicit import wins over a declaration of the file's namespace,
    /// which wins over wildcard imports and the implicit package.
    pub fn candidates(&self, name: &str, types_only: bool) -> Vec<String> {
        let mut candidates = Vec::new();
        let mut push = |candidate: String| {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        };

        if name.contains('.') {
            push(name.to_string());
        }
        for import in self.file.imports() {
            let explicit = match import.kind() {
                ImportKind::Type { .. } => true,
                ImportKind::SingleField { .. } => !types_only,
                ImportKind::AllPackage { .. } => false,
            };
            if explicit && import.local_name() == Some(name) {
                if let Some(target) = import.target() {
                    push(target);
                }
            }
        }
        push(qualify(&self.namespace(), name));
        push(name.to_string());
        for import in self.file.imports() {
            if let ImportKind::AllPackage { package } = import.kind() {
                push(qualify(&package.qualified_name(), name));
            }
        }
        push(qualify(IMPLICIT_PACKAGE, name));
        candidates
    }

    pub fn resolve_type(&self, name: &str, resolver: &dyn SymbolResolver<'a>) -> Option<TypeDefinitionRef<'a>> {
        self.candidates(name, true)
            .iter()
            .find_map(|candidate| resolver.find_type_definition(candidate))
    }

    pub fn resolve_value(&self, name: &str, resolver: &dyn SymbolResolver<'a>) -> Option<Symbol<'a>> {
        self.candidates(name, false)
            .iter()
            .find_map(|candidate| resolver.find_symbol(candidate))
    }
}

/// The type denoted by an annotation, resolved in `scope`.
pub fn resolve_annotation<'a>(
    annotation: &TypeAnnotation,
    scope: &NameScope<'a>,
    resolver: &dyn SymbolResolver<'a>,
) -> ResolveResult<TypeUsage> {
    match annotation.kind() {
        TypeAnnotationKind::Primitive(name) => match PrimitiveTypeUsage::by_name(name) {
            Some(primitive) => Ok(TypeUsage::Primitive(primitive)),
            None if name == "string" => Ok(TypeUsage::string()),
            None => Err(ResolutionError::UnknownPrimitive { name: name.clone() }),
        },
        TypeAnnotationKind::Reference(name) => scope
            .resolve_type(name, resolver)
            .map(|ty| ty.type_usage())
            .ok_or_else(|| ResolutionError::UnknownType { name: name.clone() }),
        TypeAnnotationKind::Array(component) => {
            resolve_annotation(component, scope, resolver).map(TypeUsage::array)
        }
        TypeAnnotationKind::Void => Ok(TypeUsage::Void),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use turin_syntax::{ImportDeclaration, QualifiedName};

    fn file_with_imports(imports: Vec<ImportKind>) -> TurinFile {
        let imports = imports.into_iter().map(ImportDeclaration::new).collect();
        TurinFile::new(QualifiedName::parse("app.model").unwrap(), imports, vec![])
    }

    #[test]
    fn test_candidates_put_explicit_imports_first() {
        let file = file_with_imports(vec![
            ImportKind::AllPackage {
                package: QualifiedName::parse("lib.util").unwrap(),
            },
            ImportKind::Type {
                package: QualifiedName::parse("lib.shapes").unwrap(),
                type_name: "Circle".into(),
                alias: Some("Round".into()),
            },
        ]);
        let scope = NameScope::of(&file);

        expect![[r#"
            [
                "lib.shapes.Circle",
                "app.model.Round",
                "Round",
                "lib.util.Round",
                "java.lang.Round",
            ]
        "#]]
        .assert_debug_eq(&scope.candidates("Round", true));
    }

    #[test]
    fn test_field_imports_only_name_values() {
        let file = file_with_imports(vec![ImportKind::SingleField {
            package: QualifiedName::parse("java.lang").unwrap(),
            type_name: "Math".into(),
            field: "PI".into(),
            alias: None,
        }]);
        let scope = NameScope::of(&file);

        assert_eq!(scope.candidates("PI", false)[0], "java.lang.Math.PI");
        assert_eq!(scope.candidates("PI", true)[0], "app.model.PI");
    }

    #[test]
    fn test_dotted_names_are_tried_as_written() {
        let file = file_with_imports(vec![]);
        let scope = NameScope::of(&file);
        assert_eq!(
            scope.candidates("other.Point", true)[..2],
            ["other.Point".to_string(), "app.model.other.Point".to_string()]
        );
    }
}

//! The resolver chain.

use fxhash::{FxHashMap, FxHashSet};
use log::{debug, trace};
use turin_source::{Position, ResolverOptions};
use turin_syntax::{FunctionDefinition, Program, PropertyDefinition, PropertyReference, TurinFile, TypeDefinition};
use turin_types::TypeUsage;

use crate::platform::{MethodRequest, PlatformMethod};
use crate::symbol::{InFile, Symbol, TypeDefinitionRef};
use crate::{ResolutionError, ResolveResult};

/// A link of the resolver chain.
///
/// All lookups take fully qualified names. Turning a name as written in
/// source into candidates is the job of [`NameScope`](crate::NameScope).
pub trait SymbolResolver<'a>: Send + Sync {
    fn find_type_definition(&self, name: &str) -> Option<TypeDefinitionRef<'a>>;

    fn find_type_usage(&self, name: &str) -> Option<TypeUsage> {
        self.find_type_definition(name).map(|t| t.type_usage())
    }

    /// The top-level property a type member refers to.
    fn find_property(&self, reference: &PropertyReference) -> Option<InFile<'a, PropertyDefinition>>;

    fn find_symbol(&self, name: &str) -> Option<Symbol<'a>>;

    fn find_platform_method(&self, request: &MethodRequest) -> ResolveResult<PlatformMethod>;

    fn exists_package(&self, name: &str) -> bool;

    fn outer(&self) -> Option<&dyn SymbolResolver<'a>> {
        None
    }
}

/// A qualified name declared more than once by the same kind of
/// declaration in a batch. Lookups see the first declaration; later ones are
/// recorded here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDefinition {
    pub qualified_name: String,
    pub kind: &'static str,
    pub position: Option<Position>,
}

/// Symbol tables for the declarations of one compilation batch.
///
/// Built once from every file of the batch and never modified afterwards,
/// so it can be shared by reference between validation threads.
pub struct SrcSymbolResolver<'a> {
    types: FxHashMap<String, InFile<'a, TypeDefinition>>,
    properties: FxHashMap<String, InFile<'a, PropertyDefinition>>,
    functions: FxHashMap<String, InFile<'a, FunctionDefinition>>,
    programs: FxHashMap<String, InFile<'a, Program>>,
    packages: FxHashSet<String>,
    duplicates: Vec<DuplicateDefinition>,
    outer: Option<Box<dyn SymbolResolver<'a> + 'a>>,
    options: ResolverOptions,
}

/// Inserts `entry` unless `table` already holds the name. Each table is
/// checked on its own; a name shared by two kinds is not a duplicate here.
fn register<'a, T>(
    table: &mut FxHashMap<String, InFile<'a, T>>,
    duplicates: &mut Vec<DuplicateDefinition>,
    kind: &'static str,
    qualified_name: String,
    entry: InFile<'a, T>,
    position: Option<Position>,
) {
    if table.contains_key(&qualified_name) {
        debug!("duplicate {} `{}`", kind, qualified_name);
        duplicates.push(DuplicateDefinition {
            qualified_name,
            kind,
            position,
        });
    } else {
        table.insert(qualified_name, entry);
    }
}

impl<'a> SrcSymbolResolver<'a> {
    /// Resolver for `files` alone.
    pub fn new(files: &'a [TurinFile]) -> Self {
        Self::build(files, None, ResolverOptions::default())
    }

    /// Resolver for `files` that delegates misses to `outer`.
    pub fn with_outer(files: &'a [TurinFile], outer: Box<dyn SymbolResolver<'a> + 'a>, options: ResolverOptions) -> Self {
        Self::build(files, Some(outer), options)
    }

    fn build(files: &'a [TurinFile], outer: Option<Box<dyn SymbolResolver<'a> + 'a>>, options: ResolverOptions) -> Self {
        let mut types = FxHashMap::default();
        let mut properties = FxHashMap::default();
        let mut functions = FxHashMap::default();
        let mut programs = FxHashMap::default();
        let mut packages = FxHashSet::default();
        let mut duplicates = Vec::new();

        for file in files {
            let segments = file.namespace().segments();
            for end in 1..=segments.len() {
                packages.insert(segments[..end].join("."));
            }
            for ty in file.type_definitions() {
                let entry = InFile::new(ty, file);
                register(&mut types, &mut duplicates, "type", ty.qualified_name(), entry, ty.position());
            }
            for property in file.property_definitions() {
                let entry = InFile::new(property, file);
                let (name, position) = (property.qualified_name(), property.position());
                register(&mut properties, &mut duplicates, "property", name, entry, position);
            }
            for function in file.function_definitions() {
                let entry = InFile::new(function, file);
                let (name, position) = (function.qualified_name(), function.position());
                register(&mut functions, &mut duplicates, "function", name, entry, position);
            }
            for program in file.programs() {
                let entry = InFile::new(program, file);
                let (name, position) = (program.qualified_name(), program.position());
                register(&mut programs, &mut duplicates, "program", name, entry, position);
            }
        }

        debug!(
            "resolver built over {} files: {} types, {} properties, {} functions, {} programs",
            files.len(),
            types.len(),
            properties.len(),
            functions.len(),
            programs.len()
        );

        SrcSymbolResolver {
            types,
            properties,
            functions,
            programs,
            packages,
            duplicates,
            outer,
            options,
        }
    }

    pub fn duplicates(&self) -> &[DuplicateDefinition] {
        &self.duplicates
    }

    /// Types win over properties, properties over functions and functions
    /// over programs.
    fn find_local_symbol(&self, name: &str) -> Option<Symbol<'a>> {
        if let Some(ty) = self.types.get(name) {
            return Some(Symbol::Type(TypeDefinitionRef::Source(*ty)));
        }
        if let Some(property) = self.properties.get(name) {
            return Some(Symbol::Property(*property));
        }
        if let Some(function) = self.functions.get(name) {
            return Some(Symbol::Function(*function));
        }
        self.programs.get(name).map(|program| Symbol::Program(*program))
    }
}

impl<'a> SymbolResolver<'a> for SrcSymbolResolver<'a> {
    fn find_type_definition(&self, name: &str) -> Option<TypeDefinitionRef<'a>> {
        if let Some(ty) = self.types.get(name) {
            return Some(TypeDefinitionRef::Source(*ty));
        }
        let outer = self.outer.as_ref()?;
        trace!("type `{}` not declared in batch, asking outer resolver", name);
        outer.find_type_definition(name)
    }

    fn find_property(&self, reference: &PropertyReference) -> Option<InFile<'a, PropertyDefinition>> {
        if let Some(property) = self.properties.get(&reference.qualified_name()) {
            return Some(*property);
        }
        self.outer.as_ref()?.find_property(reference)
    }

    fn find_symbol(&self, name: &str) -> Option<Symbol<'a>> {
        if let Some(symbol) = self.find_local_symbol(name) {
            return Some(symbol);
        }
        let outer = self.outer.as_ref()?;
        trace!("symbol `{}` not declared in batch, asking outer resolver", name);
        outer.find_symbol(name)
    }

    /// Source declarations carry no platform methods, so only an outer
    /// resolver can answer.
    fn find_platform_method(&self, request: &MethodRequest) -> ResolveResult<PlatformMethod> {
        match &self.outer {
            Some(outer) => outer.find_platform_method(request),
            None => Err(ResolutionError::UnsolvedMethod {
                name: request.display_name(),
            }),
        }
    }

    fn exists_package(&self, name: &str) -> bool {
        if self.packages.contains(name) {
            return true;
        }
        match &self.outer {
            Some(outer) if self.options.delegate_package_lookup => {
                trace!("package `{}` not declared in batch, asking outer resolver", name);
                outer.exists_package(name)
            }
            _ => false,
        }
    }

    fn outer(&self) -> Option<&dyn SymbolResolver<'a>> {
        self.outer.as_deref()
    }
}

impl std::fmt::Debug for SrcSymbolResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SrcSymbolResolver")
            .field("types", &self.types.len())
            .field("properties", &self.properties.len())
            .field("functions", &self.functions.len())
            .field("programs", &self.programs.len())
            .field("has_outer", &self.outer.is_some())
            .finish()
    }
}

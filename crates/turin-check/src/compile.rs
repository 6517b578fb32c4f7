//! Batch driver: one resolver, every file validated, one verdict.

use std::thread;

use log::{debug, info, warn};
use turin_resolve::{SrcSymbolResolver, SymbolResolver};
use turin_source::{CompilerConfig, DiagnosticCollector, Report, SemanticDiagnostic};
use turin_syntax::TurinFile;

use crate::{validate_file, CompileError};

/// A batch of parsed files sharing one resolver chain.
pub struct Compilation<'a> {
    config: CompilerConfig,
    files: &'a [TurinFile],
    resolver: SrcSymbolResolver<'a>,
}

impl<'a> Compilation<'a> {
    /// A batch resolved against its own declarations only.
    pub fn new(config: CompilerConfig, files: &'a [TurinFile]) -> Self {
        let resolver = SrcSymbolResolver::new(files);
        Self::from_parts(config, files, resolver)
    }

    /// A batch whose unresolved names are looked up in `outer`.
    pub fn with_outer(config: CompilerConfig, files: &'a [TurinFile], outer: Box<dyn SymbolResolver<'a> + 'a>) -> Self {
        let resolver = SrcSymbolResolver::with_outer(files, outer, config.resolver);
        Self::from_parts(config, files, resolver)
    }

    fn from_parts(config: CompilerConfig, files: &'a [TurinFile], resolver: SrcSymbolResolver<'a>) -> Self {
        for duplicate in resolver.duplicates() {
            warn!("{} `{}` is declared more than once", duplicate.kind, duplicate.qualified_name);
        }
        for (library, version) in &config.libraries {
            debug!("library {} {}", library, version);
        }
        Compilation {
            config,
            files,
            resolver,
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn resolver(&self) -> &SrcSymbolResolver<'a> {
        &self.resolver
    }

    /// Validates every file of the batch. Diagnostics of each file are
    /// sorted by source position.
    pub fn check(&self) -> CheckedBatch<'a> {
        info!(
            "checking {} file(s) of package `{}`",
            self.files.len(),
            self.config.package.name
        );
        let collectors = if self.config.validation.parallel && self.files.len() > 1 {
            self.validate_parallel()
        } else {
            self.files.iter().map(|file| self.validate_one(file)).collect()
        };
        let diagnostics: Vec<Vec<SemanticDiagnostic>> = collectors.iter().map(DiagnosticCollector::sorted).collect();
        let count: usize = diagnostics.iter().map(Vec::len).sum();
        info!("check finished with {} diagnostic(s)", count);
        CheckedBatch {
            files: self.files,
            diagnostics,
        }
    }

    fn validate_one(&self, file: &'a TurinFile) -> DiagnosticCollector {
        let mut collector = DiagnosticCollector::new();
        let valid = validate_file(file, &self.resolver, &mut collector);
        debug!(
            "validated namespace `{}`: {}",
            file.namespace(),
            if valid { "ok" } else { "errors" }
        );
        collector
    }

    /// One scoped thread per file. The resolver is only read, so it is
    /// shared by reference; each thread owns its collector.
    fn validate_parallel(&self) -> Vec<DiagnosticCollector> {
        thread::scope(|scope| {
            let handles: Vec<_> = self
                .files
                .iter()
                .map(|file| scope.spawn(move || self.validate_one(file)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    }
}

/// The outcome of checking a batch.
#[derive(Debug)]
pub struct CheckedBatch<'a> {
    files: &'a [TurinFile],
    diagnostics: Vec<Vec<SemanticDiagnostic>>,
}

impl<'a> CheckedBatch<'a> {
    pub fn files(&self) -> &'a [TurinFile] {
        self.files
    }

    /// Diagnostics of the file at `index`, in source order.
    pub fn diagnostics_for(&self, index: usize) -> &[SemanticDiagnostic] {
        self.diagnostics.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All diagnostics, file by file.
    pub fn diagnostics(&self) -> impl Iterator<Item = &SemanticDiagnostic> {
        self.diagnostics.iter().flatten()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().map(Vec::len).sum()
    }

    pub fn ready_for_codegen(&self) -> bool {
        self.error_count() == 0
    }

    /// Reports for the file at `index`, ready to be rendered with source
    /// context.
    pub fn reports(&self, index: usize, location: &str, source: &str) -> Vec<Report> {
        self.diagnostics_for(index)
            .iter()
            .map(|diagnostic| Report::new(location, source, diagnostic.clone()))
            .collect()
    }

    /// The files, if and only if the batch is free of diagnostics.
    pub fn into_codegen_input(self) -> Result<&'a [TurinFile], CompileError> {
        if self.ready_for_codegen() {
            return Ok(self.files);
        }
        let diagnostics: Vec<SemanticDiagnostic> = self.diagnostics.into_iter().flatten().collect();
        Err(CompileError {
            count: diagnostics.len(),
            diagnostics,
        })
    }
}

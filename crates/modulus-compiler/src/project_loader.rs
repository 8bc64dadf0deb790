//! `SourceProjectLoader`: the "source-project" loader dispatched to by a
//! [`LoaderContainer`] (spec §4.7 steps 1-7).
//!
//! Reference-set resolution (step 4) is expressed as one walk through the
//! existing resolver: `create_graph_node` already implements the
//! project -> local (incl. framework/GAC) -> remote -> unresolved priority
//! (spec §4.3), so "prefers the cache, else asks the runtime to load the named module,
//! else falls back to a framework reference" collapses to: walk the range,
//! and only when the walk lands on a *project* candidate do we need to ask
//! the container to load (and possibly compile) that sibling; every other
//! candidate kind already carries enough information to become a
//! `ReferenceImage` directly.

use std::path::PathBuf;
use std::sync::Arc;

use modulus_core::{FrameworkProfile, LibraryRange, Project, MANIFEST_FILE_NAME};
use modulus_providers::{ProviderKind, ProviderToken};
use modulus_resolver::{create_graph_node, WalkContext};
use modulus_store::Store;
use rayon::prelude::*;

use modulus_loader::{CompiledModule, LoadRequest, Loader, LoaderContainer, LoaderError, ReferenceImage};

use crate::compiler::{reference_identity, CompileRequest, CompileTarget, Compiler, ResolvedReference};
use crate::error::CompileError;
use crate::scan::scan_source_files;
use crate::watch::FileWatchRegistrar;

/// Whether a compiled project should be loaded from a file pair on disk or
/// kept as an in-memory buffer with a symbols sidecar (spec §4.7 step 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    FilePair,
    InMemory,
}

pub const LOADER_KEY: &str = "source-project";

/// The "source-project" loader (spec §4.2 "Project-source provider" at the
/// compile-time side of C9/C10).
pub struct SourceProjectLoader {
    solution_root: PathBuf,
    source_extensions: Vec<String>,
    output_mode: OutputMode,
    compiler: Arc<dyn Compiler>,
    watch_registrar: Arc<dyn FileWatchRegistrar>,
    walk_context: Arc<WalkContext>,
    store: Store,
}

impl SourceProjectLoader {
    #[must_use]
    pub fn new(
        solution_root: impl Into<PathBuf>,
        source_extensions: Vec<String>,
        output_mode: OutputMode,
        compiler: Arc<dyn Compiler>,
        watch_registrar: Arc<dyn FileWatchRegistrar>,
        walk_context: Arc<WalkContext>,
        store: Store,
    ) -> Self {
        Self { solution_root: solution_root.into(), source_extensions, output_mode, compiler, watch_registrar, walk_context, store }
    }

    fn project_dir(&self, assembly_name: &str) -> PathBuf {
        self.solution_root.join(assembly_name)
    }

    fn target_for(&self, assembly_name: &str) -> CompileTarget {
        match self.output_mode {
            OutputMode::FilePair => CompileTarget::FilePair { out_dir: self.project_dir(assembly_name).join("bin") },
            OutputMode::InMemory => CompileTarget::InMemory { symbols_dir: self.solution_root.join(".symbols") },
        }
    }

    /// Resolves one declared dependency to a reference image by walking it
    /// through the existing graph walker (spec §4.7 step 4).
    fn resolve_reference(&self, container: &LoaderContainer, range: &LibraryRange, framework: &FrameworkProfile) -> std::result::Result<ResolvedReference, String> {
        let node = create_graph_node(&self.walk_context, range, framework).map_err(|source| format!("{}: {source}", range.name))?;

        if let Some(suggestion) = &node.suggestion {
            return Err(format!("{}: resolved only to differently-cased {suggestion:?}", range.name));
        }

        let Some(item) = node.item else {
            return Err(format!("unable to locate {} for compilation", range.name));
        };

        let image = match item.provider {
            ProviderKind::Project => {
                let ProviderToken::Project { manifest_path } = &item.token else {
                    return Err(format!("{}: project candidate carried an unexpected token", item.library_name));
                };
                let assembly_name = manifest_path
                    .parent()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| item.library_name.clone());

                let request = LoadRequest::new(assembly_name.clone(), framework.clone());
                match container.load(LOADER_KEY, &request) {
                    Ok(Some(module)) => module.reference_image.clone(),
                    Ok(None) => return Err(format!("{assembly_name}: walker matched a project candidate but its manifest has since disappeared")),
                    Err(source) => return Err(format!("{assembly_name}: {source}")),
                }
            }
            ProviderKind::Local => {
                let ProviderToken::Local(package) = &item.token else {
                    return Err(format!("{}: local candidate carried an unexpected token", item.library_name));
                };
                ReferenceImage::OnDisk { path: self.store.package_dir(&package.name, &package.version) }
            }
            ProviderKind::Framework | ProviderKind::Gac => ReferenceImage::FrameworkAssembly { name: item.library_name.clone() },
            ProviderKind::Remote => {
                return Err(format!("{}: resolved to a remote candidate at compile time; run restore first", item.library_name));
            }
            ProviderKind::Unresolved => return Err(format!("unable to locate {} for compilation", range.name)),
        };

        tracing::debug!(name = %item.library_name, image = %reference_identity(&image), "resolved reference");
        Ok(ResolvedReference { name: item.library_name, image })
    }

    fn baseline_references(&self, project: &Project, framework: &FrameworkProfile) -> Vec<ResolvedReference> {
        project
            .framework_assemblies
            .get(framework)
            .into_iter()
            .flatten()
            .map(|name| ResolvedReference { name: name.clone(), image: ReferenceImage::FrameworkAssembly { name: name.clone() } })
            .collect()
    }
}

fn failed(assembly_name: &str, message: impl std::fmt::Display) -> LoaderError {
    LoaderError::Failed { key: LOADER_KEY.to_string(), assembly_name: assembly_name.to_string(), message: message.to_string() }
}

impl Loader for SourceProjectLoader {
    fn key(&self) -> &str {
        LOADER_KEY
    }

    fn load(&self, container: &LoaderContainer, request: &LoadRequest) -> Result<Option<CompiledModule>, LoaderError> {
        let project_dir = self.project_dir(&request.assembly_name);
        let manifest_path = project_dir.join(MANIFEST_FILE_NAME);

        // Step 1: locate a manifest; absent is "no-match", not an error.
        if !manifest_path.is_file() {
            return Ok(None);
        }

        // Step 2: register file-system watches; a failure is a warning
        // only (spec §7 "File-watch registration failure: warn; continue").
        if let Err(source) = self.watch_registrar.register(&project_dir, &manifest_path) {
            tracing::warn!(assembly = %request.assembly_name, %source, "file-watch registration failed");
        }

        let project = Project::load(&manifest_path).map_err(|source| failed(&request.assembly_name, source))?;

        // Step 3: parse (hash) each source file.
        let sources = scan_source_files(&project_dir, &self.source_extensions).map_err(|source| failed(&request.assembly_name, source))?;

        // Step 4: parallel reference resolution over declared dependencies.
        let ranges: Vec<LibraryRange> = project.dependencies_for(&request.framework).into_iter().map(|dep| dep.range.clone()).collect();
        let resolved: Vec<std::result::Result<ResolvedReference, String>> =
            ranges.into_par_iter().map(|range| self.resolve_reference(container, &range, &request.framework)).collect();

        let mut references = Vec::with_capacity(resolved.len());
        let mut diagnostics = Vec::new();
        for outcome in resolved {
            match outcome {
                Ok(reference) => references.push(reference),
                Err(message) => diagnostics.push(message),
            }
        }

        if !diagnostics.is_empty() {
            return Err(failed(&request.assembly_name, CompileError::Diagnostics { assembly_name: request.assembly_name.clone(), messages: diagnostics }));
        }

        // Step 5: the framework's baseline reference set.
        references.extend(self.baseline_references(&project, &request.framework));

        // Step 6: compile.
        let compile_request = CompileRequest {
            assembly_name: request.assembly_name.clone(),
            framework: request.framework.clone(),
            sources,
            references,
            target: self.target_for(&request.assembly_name),
        };
        let output = self.compiler.compile(&compile_request).map_err(|source| failed(&request.assembly_name, source))?;

        // Step 7: caching happens in `LoaderContainer::load`; we just
        // return the module.
        Ok(Some(CompiledModule { assembly_name: request.assembly_name.clone(), reference_image: output.into_reference_image() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::SourceAggregateCompiler;
    use crate::watch::NullWatchRegistrar;
    use modulus_providers::{FrameworkReferenceProvider, GacProvider, LocalStoreProvider, ProjectProvider};
    use modulus_resolver::WarningSink;
    use std::sync::atomic::AtomicBool;

    fn context(solution_root: &std::path::Path) -> Arc<WalkContext> {
        Arc::new(WalkContext {
            project_provider: ProjectProvider::new(solution_root),
            local_provider: LocalStoreProvider::new(Store::new(solution_root.join("store"))),
            framework_provider: FrameworkReferenceProvider::default(),
            gac_provider: GacProvider::default(),
            remote_providers: Vec::new(),
            compatibility: modulus_core::CompatibilityTable::with_standard_lineage(),
            ignore_failed_sources: false,
            pinned: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            tokio_handle: tokio::runtime::Handle::try_current().unwrap_or_else(|_| {
                Box::leak(Box::new(tokio::runtime::Runtime::new().unwrap())).handle().clone()
            }),
            warnings: Arc::new(WarningSink::default()),
            memo: dashmap::DashMap::new(),
        })
    }

    fn loader(solution_root: &std::path::Path) -> SourceProjectLoader {
        SourceProjectLoader::new(
            solution_root,
            vec!["src".to_string()],
            OutputMode::InMemory,
            Arc::new(SourceAggregateCompiler),
            Arc::new(NullWatchRegistrar::default()),
            context(solution_root),
            Store::new(solution_root.join("store")),
        )
    }

    fn write_project(dir: &std::path::Path, name: &str, deps: &str) {
        let project_dir = dir.join(name);
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(project_dir.join("main.src"), format!("module {name}")).unwrap();
        std::fs::write(project_dir.join(MANIFEST_FILE_NAME), format!(r#"{{"name":"{name}","version":"0.1.0","dependencies":{{{deps}}}}}"#)).unwrap();
    }

    #[test]
    fn absent_manifest_is_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let request = LoadRequest::new("Ghost", FrameworkProfile::new("net", "8.0"));
        let container = LoaderContainer::new();
        let result = loader(dir.path()).load(&container, &request);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn compiles_a_project_with_no_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), "Solo", "");

        let container = LoaderContainer::new();
        let request = LoadRequest::new("Solo", FrameworkProfile::new("net", "8.0"));
        let module = loader(dir.path()).load(&container, &request).unwrap().unwrap();
        assert_eq!(module.assembly_name, "Solo");
        assert!(matches!(module.reference_image, ReferenceImage::InMemory { .. }));
    }

    #[test]
    fn sibling_project_dependency_is_loaded_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), "Q", "");
        write_project(dir.path(), "P", r#""Q":"2.0.0""#);

        let container = LoaderContainer::new();
        container.register_loader(modulus_loader::RegistryKind::Internal, Arc::new(loader(dir.path())));

        let framework = FrameworkProfile::new("net", "8.0");
        let module = container.load(LOADER_KEY, &LoadRequest::new("P", framework.clone())).unwrap().unwrap();
        assert_eq!(module.assembly_name, "P");
        assert!(container.cached("Q").is_some());
    }

    #[test]
    fn unresolved_dependency_is_a_diagnostic_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_project(dir.path(), "P", r#""Missing":"1.0.0""#);

        let container = LoaderContainer::new();
        let request = LoadRequest::new("P", FrameworkProfile::new("net", "8.0"));
        let err = loader(dir.path()).load(&container, &request).unwrap_err();
        assert!(matches!(err, LoaderError::Failed { .. }));
    }
}

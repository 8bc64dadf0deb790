//! Shared vocabulary between a loader and the container that dispatches to
//! it (spec §4.7 C9/C10).

use modulus_core::FrameworkProfile;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::LoaderError;

/// What a loader was asked to produce.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub assembly_name: String,
    pub framework: FrameworkProfile,
}

impl LoadRequest {
    #[must_use]
    pub fn new(assembly_name: impl Into<String>, framework: FrameworkProfile) -> Self {
        Self { assembly_name: assembly_name.into(), framework }
    }
}

/// A loaded module's consumable reference form (spec §4.7 step 4/6): either
/// something this container compiled itself, or a pointer to bytes another
/// collaborator already produced.
#[derive(Debug, Clone)]
pub enum ReferenceImage {
    /// `<out>/<name>.{dll,pdb}`, loaded by path (spec §4.7 step 6a).
    FilePair { dll: PathBuf, pdb: Option<PathBuf> },
    /// An in-memory byte buffer plus its debug-symbol sidecar path under
    /// `<solution>/.symbols/` (spec §4.7 step 6b).
    InMemory { bytes: Arc<[u8]>, symbols_path: PathBuf },
    /// Already on disk in the package store; nothing to compile (spec §4.7
    /// step 4 "uses its on-disk location").
    OnDisk { path: PathBuf },
    /// A name-based reference resolved by the framework-reference resolver
    /// (spec §4.7 step 4/5).
    FrameworkAssembly { name: String },
}

/// A module handed back to the host: its reference image plus the identity
/// under which it is cached (spec §4.7 step 7 "(module, reference-image)").
#[derive(Debug, Clone)]
pub struct CompiledModule {
    pub assembly_name: String,
    pub reference_image: ReferenceImage,
}

/// A registrant in the container's keyed registry (spec §9). A loader
/// either finds a match for the requested assembly and produces a module,
/// or returns "no-match" (`Ok(None)`) so the caller can try a fallback —
/// never an error for "not mine to handle".
///
/// `container` is handed in per call rather than stored by the loader, so a
/// loader that itself needs to load further modules (spec §4.7 step 4
/// "asks the runtime to load the named module") can recurse through it
/// without the loader and the container holding strong references to each
/// other.
pub trait Loader: Send + Sync {
    /// The key this loader is registered under, e.g. `"source-project"`.
    fn key(&self) -> &str;

    fn load(&self, container: &crate::registry::LoaderContainer, request: &LoadRequest) -> Result<Option<CompiledModule>, LoaderError>;
}

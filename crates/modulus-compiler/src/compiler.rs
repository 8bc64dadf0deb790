//! Compilation itself (spec §4.7 step 6), modeled behind a trait so the
//! stand-in implementation is swappable without touching the loader
//! orchestration around it. There is no real host VM to emit native code
//! for here; `SourceAggregateCompiler` produces a deterministic module
//! record from the sorted source hashes and resolved reference identities —
//! the loadable-module *shape* is real, the instruction encoding is a thin,
//! documented stand-in (see `SPEC_FULL.md` §4.7).

use std::path::PathBuf;
use std::sync::Arc;

use modulus_core::FrameworkProfile;
use serde::Serialize;

use crate::error::{CompileError, Result};
use crate::scan::ParsedSource;
use modulus_loader::ReferenceImage;

/// One resolved dependency, ready to feed into compilation (spec §4.7
/// steps 4-5).
#[derive(Debug, Clone)]
pub struct ResolvedReference {
    pub name: String,
    pub image: ReferenceImage,
}

/// Where compiled output should land (spec §4.7 step 6: "(a) a file pair
/// ... and loads by path, or (b) an in-memory byte buffer and a
/// debug-symbol sidecar").
#[derive(Debug, Clone)]
pub enum CompileTarget {
    FilePair { out_dir: PathBuf },
    InMemory { symbols_dir: PathBuf },
}

#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub assembly_name: String,
    pub framework: FrameworkProfile,
    pub sources: Vec<ParsedSource>,
    pub references: Vec<ResolvedReference>,
    pub target: CompileTarget,
}

/// What compilation produced; maps 1:1 onto the two `ReferenceImage`
/// variants a compiled project can resolve into.
#[derive(Debug, Clone)]
pub enum CompiledOutput {
    FilePair { dll: PathBuf, pdb: PathBuf },
    InMemory { bytes: Arc<[u8]>, symbols_path: PathBuf },
}

impl CompiledOutput {
    #[must_use]
    pub fn into_reference_image(self) -> ReferenceImage {
        match self {
            Self::FilePair { dll, pdb } => ReferenceImage::FilePair { dll, pdb: Some(pdb) },
            Self::InMemory { bytes, symbols_path } => ReferenceImage::InMemory { bytes, symbols_path },
        }
    }
}

pub trait Compiler: Send + Sync {
    fn compile(&self, request: &CompileRequest) -> Result<CompiledOutput>;
}

/// A deterministic content record for one compilation: sorted source
/// hashes and reference identities, serialized as the module's stand-in
/// bytecode. Two compilations of identical inputs produce byte-identical
/// output (spec §8 property 1).
#[derive(Serialize)]
struct ModuleRecord<'a> {
    assembly_name: &'a str,
    framework: String,
    sources: Vec<(String, String)>,
    references: Vec<&'a str>,
}

pub(crate) fn reference_identity(image: &ReferenceImage) -> String {
    match image {
        ReferenceImage::FilePair { dll, .. } => format!("file:{}", dll.display()),
        ReferenceImage::InMemory { symbols_path, .. } => format!("memory:{}", symbols_path.display()),
        ReferenceImage::OnDisk { path } => format!("disk:{}", path.display()),
        ReferenceImage::FrameworkAssembly { name } => format!("framework:{name}"),
    }
}

fn module_bytes(request: &CompileRequest) -> Result<Vec<u8>> {
    let mut sources: Vec<(String, String)> =
        request.sources.iter().map(|s| (s.path.display().to_string(), hex::encode(s.content_hash))).collect();
    sources.sort();

    let mut references: Vec<&str> = request.references.iter().map(|r| r.name.as_str()).collect();
    references.sort_unstable();

    let record = ModuleRecord {
        assembly_name: &request.assembly_name,
        framework: request.framework.to_string(),
        sources,
        references,
    };
    Ok(serde_json::to_vec_pretty(&record)?)
}

/// The shipped `Compiler`: aggregates source content and reference
/// identities into a deterministic module record (spec §4.7 "Project
/// compiler" expansion).
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceAggregateCompiler;

impl Compiler for SourceAggregateCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<CompiledOutput> {
        if request.sources.is_empty() {
            return Err(CompileError::NoSourceFiles { assembly_name: request.assembly_name.clone() });
        }

        let bytes = module_bytes(request)?;

        match &request.target {
            CompileTarget::FilePair { out_dir } => {
                std::fs::create_dir_all(out_dir).map_err(|source| CompileError::Io {
                    context: format!("creating output directory {}", out_dir.display()),
                    source,
                })?;
                let dll = out_dir.join(format!("{}.dll", request.assembly_name));
                let pdb = out_dir.join(format!("{}.pdb", request.assembly_name));
                std::fs::write(&dll, &bytes).map_err(|source| CompileError::Io { context: format!("writing {}", dll.display()), source })?;
                std::fs::write(&pdb, format!("debug symbols for {}", request.assembly_name)).map_err(|source| CompileError::Io {
                    context: format!("writing {}", pdb.display()),
                    source,
                })?;
                Ok(CompiledOutput::FilePair { dll, pdb })
            }
            CompileTarget::InMemory { symbols_dir } => {
                std::fs::create_dir_all(symbols_dir).map_err(|source| CompileError::Io {
                    context: format!("creating symbols directory {}", symbols_dir.display()),
                    source,
                })?;
                let symbols_path = symbols_dir.join(format!("{}.symbols", request.assembly_name));
                std::fs::write(&symbols_path, format!("debug symbols for {}", request.assembly_name)).map_err(|source| CompileError::Io {
                    context: format!("writing {}", symbols_path.display()),
                    source,
                })?;
                Ok(CompiledOutput::InMemory { bytes: Arc::from(bytes), symbols_path })
            }
        }
    }
}

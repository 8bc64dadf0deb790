//! Source-project compiler (spec §4.7, C9): parses a project's source
//! files, resolves its reference set through the graph walker, compiles a
//! deterministic module record, and registers as the `"source-project"`
//! loader a [`modulus_loader::LoaderContainer`] can dispatch to.

mod compiler;
mod error;
mod project_loader;
mod scan;
mod watch;

pub use compiler::{CompileRequest, CompileTarget, CompiledOutput, Compiler, ResolvedReference, SourceAggregateCompiler};
pub use error::{CompileError, Result};
pub use project_loader::{OutputMode, SourceProjectLoader, LOADER_KEY};
pub use scan::{scan_source_files, ParsedSource};
pub use watch::{FileWatchRegistrar, NotifyWatchRegistrar, NullWatchRegistrar};

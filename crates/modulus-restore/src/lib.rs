//! Restore driver (spec §4.6): discover manifests, run lifecycle hooks,
//! walk the dependency graph per framework profile, install resolved
//! packages, and write the lock file.

mod classify;
mod discover;
mod driver;
mod error;
mod hooks;

pub use classify::LockState;
pub use discover::{discover_manifests, normalise_root, synthesize_install_one};
pub use driver::{RestoreDriver, RestoreOptions, RestoreOutcome};
pub use error::{Result, RestoreError};
pub use hooks::{Hook, HookError, ProcessScriptRunner, ScriptRunner};

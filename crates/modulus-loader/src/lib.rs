//! Loader container / service registry (spec §4.7, §9, C10): a keyed
//! registry from string tag to loader or typed service, replacing open
//! trait-object inheritance with explicit registration and a
//! manifest-vs-internal flag per entry.

mod error;
mod registry;
mod types;

pub use error::{LoaderError, Result};
pub use registry::{LoaderContainer, RegistryKind};
pub use types::{CompiledModule, LoadRequest, Loader, ReferenceImage};

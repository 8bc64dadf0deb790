//! Core types shared by every modulus crate: manifest model, version
//! algebra, framework profiles, content hashing, and the workspace error
//! type.

#![warn(clippy::all)]

pub mod error;
pub mod framework;
pub mod hash;
pub mod manifest;
pub mod version;

pub use error::{Error, ErrorCode, Result};
pub use framework::{CompatibilityTable, FrameworkProfile};
pub use hash::{ContentKey, IntegrityHash};
pub use manifest::{Dependency, DependencyKind, LibraryRange, Project, MANIFEST_FILE_NAME};
pub use version::{FloatBehavior, Version, VersionRange};

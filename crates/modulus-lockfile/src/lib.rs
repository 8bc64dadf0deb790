//! The deterministic lock-file format (spec §3/§4.5, C7).

#![warn(clippy::all)]

pub mod atomic;
pub mod canonical;
pub mod error;
pub mod types;
pub mod validate;

pub use atomic::{read, write_atomic, LOCK_FILE_NAME};
pub use canonical::{from_json, to_canonical_json};
pub use error::{LockfileError, Result};
pub use types::{FrameworkKey, LibraryKey, LockFile, LockedLibrary, LOCK_VERSION};
pub use validate::{validate, DriftReason};

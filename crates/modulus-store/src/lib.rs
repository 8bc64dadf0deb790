//! The shared, content-addressed package store: on-disk layout and the
//! atomic install pipeline (spec §4.4, C4).

#![warn(clippy::all)]

pub mod error;
pub mod install;
pub mod layout;
pub mod types;

pub use error::{Result, StoreError};
pub use install::{install, recompute_sha, Extractor, Installed};
pub use layout::{Store, ARCHIVE_FILE_NAME};
pub use types::Package;

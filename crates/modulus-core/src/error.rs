//! Error types shared across the modulus workspace.
//!
//! Every error carries a stable [`ErrorCode`] so operators can grep a code
//! instead of matching fragile message text.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes, grouped by area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Manifest is missing from disk.
    E0101,
    /// Manifest JSON failed to parse.
    E0102,
    /// Manifest is missing a required field.
    E0103,
    /// A version range string could not be parsed.
    E0201,
    /// A dependency range could not be satisfied by any provider.
    E0202,
    /// A provider's library name differs from the requested range only in case.
    E0203,
    /// The lock file failed validation against the current manifest.
    E0301,
    /// A package's recorded SHA did not match its archive bytes.
    E0302,
    /// A pre/post/prepare hook exited non-zero.
    E0401,
    /// File-watch registration failed.
    E0402,
    /// Compilation produced diagnostics.
    E0501,
}

impl ErrorCode {
    /// The string form, e.g. `"E0101"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0401 => "E0401",
            Self::E0402 => "E0402",
            Self::E0501 => "E0501",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The workspace-wide error type for `modulus-core` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Manifest file does not exist at the expected path.
    #[error("[{code}] manifest not found at {path}", code = ErrorCode::E0101, path = path.display())]
    ManifestMissing {
        /// Path that was probed.
        path: PathBuf,
    },

    /// Manifest JSON is malformed.
    #[error("[{code}] failed to parse manifest {path}: {source}", code = ErrorCode::E0102, path = path.display())]
    ManifestParse {
        /// Path of the offending manifest.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Manifest is missing a field required by this operation.
    #[error("[{code}] manifest {path} is missing required field `{field}`", code = ErrorCode::E0103, path = path.display())]
    ManifestMissingField {
        /// Path of the manifest.
        path: PathBuf,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A version range string is malformed.
    #[error("[{code}] invalid version range `{raw}`", code = ErrorCode::E0201)]
    InvalidRange {
        /// The raw string that failed to parse.
        raw: String,
    },

    /// Generic I/O failure, wrapped with context.
    #[error("io error during {context}: {source}")]
    Io {
        /// What we were trying to do.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout `modulus-core`.
pub type Result<T> = std::result::Result<T, Error>;

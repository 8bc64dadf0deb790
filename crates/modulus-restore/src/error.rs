use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("no project manifests found under {root}")]
    NoManifestsFound { root: PathBuf },

    #[error("walking {root} for manifests: {source}")]
    Discovery {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Manifest(#[from] modulus_core::Error),

    #[error(transparent)]
    Resolver(#[from] modulus_resolver::ResolverError),

    #[error(transparent)]
    Provider(#[from] modulus_providers::ProviderError),

    #[error(transparent)]
    Store(#[from] modulus_store::StoreError),

    #[error(transparent)]
    Fetch(#[from] modulus_fetch::FetchError),

    #[error(transparent)]
    Lockfile(#[from] modulus_lockfile::LockfileError),

    #[error("[{code}] {0}", code = modulus_core::ErrorCode::E0401)]
    Hook(#[from] crate::hooks::HookError),

    #[error(
        "[{code}] unable to locate {name} {range}{suggestion}",
        code = modulus_core::ErrorCode::E0202,
        suggestion = .suggestion.as_deref().map(|s| format!(" (did you mean `{s}`?)")).unwrap_or_default(),
    )]
    Unresolved { name: String, range: String, suggestion: Option<String> },

    #[error("restore cancelled")]
    Cancelled,

    #[error("resolved candidate referenced feed {url}, which was not part of this walk")]
    UnknownFeed { url: String },

    #[error(
        "[{code}] {name}@{version}: locked sha {expected} does not match the locally installed package's recorded sha {actual}",
        code = modulus_core::ErrorCode::E0302,
    )]
    LockedShaMismatch { name: String, version: modulus_core::Version, expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, RestoreError>;

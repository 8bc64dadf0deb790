use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockfileError {
    #[error("reading lock file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("writing lock file {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },

    #[error("parsing lock file {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("serialising lock file: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LockfileError>;

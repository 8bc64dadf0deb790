use modulus_core::{IntegrityHash, Version};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sha mismatch installing {name} {version}: expected {expected}, got {actual}")]
    ShaMismatch {
        name: String,
        version: Version,
        expected: IntegrityHash,
        actual: IntegrityHash,
    },
    #[error("io error during {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

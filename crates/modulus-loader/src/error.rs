//! Loader container errors (spec §9 "service-registry... consumers request
//! by tag and receive or fail deterministically").

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("no loader registered under key {key:?}")]
    NoLoaderRegistered { key: String },

    #[error("no service registered under key {key:?}")]
    NoServiceRegistered { key: String },

    #[error("service registered under key {key:?} does not have the requested type")]
    ServiceTypeMismatch { key: String },

    #[error("loader {key:?} failed to produce module {assembly_name:?}: {message}")]
    Failed { key: String, assembly_name: String, message: String },
}

pub type Result<T> = std::result::Result<T, LoaderError>;

//! Compilation errors (spec §4.7 step 7, §7 "compile diagnostics non-zero:
//! fatal for that assembly; surface joined messages").

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("project {assembly_name:?} has no source files")]
    NoSourceFiles { assembly_name: String },

    #[error(
        "{assembly_name:?}: {}",
        .messages.join("; ")
    )]
    Diagnostics { assembly_name: String, messages: Vec<String> },

    #[error(transparent)]
    Resolver(#[from] modulus_resolver::ResolverError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CompileError>;

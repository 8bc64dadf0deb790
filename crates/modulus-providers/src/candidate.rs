//! A [`Candidate`] is a concrete `(name, version)` plus whatever
//! provider-specific token its originating [`crate::Provider`] needs to
//! later fetch its dependencies or materialise it (spec GLOSSARY: "a
//! concrete (name,version) with provider-specific bytes-on-demand").

use modulus_core::Version;
use std::sync::Arc;

/// Which of six provider kinds (spec GLOSSARY) produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProviderKind {
    Project,
    Local,
    Framework,
    Gac,
    Remote,
    Unresolved,
}

/// Opaque, provider-specific payload needed to resolve a candidate's
/// dependencies or materialise its bytes.
#[derive(Debug, Clone)]
pub enum ProviderToken {
    Project {
        manifest_path: std::path::PathBuf,
    },
    Local(modulus_store::Package),
    Framework {
        assembly: String,
    },
    Gac {
        assembly: String,
    },
    Remote {
        feed_url: Arc<url::Url>,
        dependencies: Vec<modulus_core::LibraryRange>,
        archive_url: url::Url,
    },
    Unresolved,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    pub version: Version,
    pub kind: ProviderKind,
    pub token: ProviderToken,
}

//! The tagged `Provider` variant (spec §9 redesign note: "replaced by a
//! tagged variant over `{project, local, framework, gac, remote,
//! unresolved}` with a shared operation table; new providers are added by
//! extending the variant, not by open inheritance").
//!
//! Remote's network calls are async; everything else is synchronous disk
//! I/O, so [`Provider::find_candidates_sync`] only covers the five
//! non-remote variants. The resolver queries [`RemoteFeedProvider`]
//! directly on its own async path (spec §4.3 step 3).

use crate::candidate::{Candidate, ProviderKind, ProviderToken};
use crate::error::Result;
use crate::framework::FrameworkReferenceProvider;
use crate::gac::GacProvider;
use crate::local::LocalStoreProvider;
use crate::project::ProjectProvider;
use crate::remote::RemoteFeedProvider;
use modulus_core::{CompatibilityTable, FrameworkProfile, LibraryRange};

/// One of six provider kinds (spec §9), as a single sum type rather than a
/// trait object.
#[derive(Debug, Clone)]
pub enum Provider {
    Project(ProjectProvider),
    Local(LocalStoreProvider),
    Framework(FrameworkReferenceProvider),
    Gac(GacProvider),
    Remote(RemoteFeedProvider),
}

impl Provider {
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Project(_) => ProviderKind::Project,
            Self::Local(_) => ProviderKind::Local,
            Self::Framework(_) => ProviderKind::Framework,
            Self::Gac(_) => ProviderKind::Gac,
            Self::Remote(_) => ProviderKind::Remote,
        }
    }

    /// Find candidates via the synchronous (non-network) providers. Callers
    /// querying a [`Self::Remote`] provider must use
    /// [`RemoteFeedProvider::find_library_range`] directly, since that path
    /// is async.
    pub fn find_candidates_sync(&self, range: &LibraryRange, framework: &FrameworkProfile, compatibility: &CompatibilityTable) -> Result<Vec<Candidate>> {
        match self {
            Self::Project(p) => p.find_library_range(range),
            Self::Local(p) => Ok(p.find_library_range(range)),
            Self::Framework(p) => Ok(p.find_library_range(range, framework, compatibility)),
            Self::Gac(p) => Ok(p.find_library_range(range)),
            Self::Remote(_) => Ok(Vec::new()),
        }
    }
}

/// Dependencies of `candidate` for `framework`, read from its token. This
/// needs no provider instance: every token already carries (or can cheaply
/// load) what it needs (spec §4.2's `get_dependencies`).
pub fn get_dependencies(
    token: &ProviderToken,
    framework: &FrameworkProfile,
    project_provider: Option<&ProjectProvider>,
    compatibility: &CompatibilityTable,
) -> Result<Vec<LibraryRange>> {
    match token {
        ProviderToken::Project { .. } => {
            let Some(provider) = project_provider else { return Ok(Vec::new()) };
            provider.get_dependencies(token, framework)
        }
        ProviderToken::Local(_) => Ok(LocalStoreProvider::get_dependencies(token, framework, compatibility)),
        ProviderToken::Framework { .. } => Ok(FrameworkReferenceProvider::get_dependencies(token)),
        ProviderToken::Gac { .. } => Ok(GacProvider::get_dependencies(token)),
        ProviderToken::Remote { .. } => Ok(RemoteFeedProvider::get_dependencies(token)),
        ProviderToken::Unresolved => Ok(Vec::new()),
    }
}

//! The unresolved sentinel (spec §4.2): always matches, but carries no
//! library — a signal to the walker that resolution failed for this range
//! rather than a candidate to install.

use crate::candidate::{Candidate, ProviderKind, ProviderToken};
use modulus_core::{LibraryRange, Version};

#[must_use]
pub fn sentinel_for(range: &LibraryRange) -> Candidate {
    Candidate {
        name: range.name.clone(),
        version: Version::new(0, 0, 0),
        kind: ProviderKind::Unresolved,
        token: ProviderToken::Unresolved,
    }
}

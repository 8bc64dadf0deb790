//! GAC provider (spec §4.2): "mirrors framework-reference but probes
//! machine-wide assembly caches" — a flat, framework-independent name set
//! rather than one keyed per framework profile.

use crate::candidate::{Candidate, ProviderKind, ProviderToken};
use modulus_core::{LibraryRange, Version};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct GacProvider {
    installed: BTreeSet<String>,
}

impl GacProvider {
    #[must_use]
    pub fn new(installed: BTreeSet<String>) -> Self {
        Self { installed }
    }

    #[must_use]
    pub fn find_library_range(&self, range: &LibraryRange) -> Vec<Candidate> {
        if !range.range.is_reference || !self.installed.contains(&range.name) {
            return Vec::new();
        }
        vec![Candidate {
            name: range.name.clone(),
            version: Version::new(0, 0, 0),
            kind: ProviderKind::Gac,
            token: ProviderToken::Gac { assembly: range.name.clone() },
        }]
    }

    #[must_use]
    pub fn get_dependencies(_token: &ProviderToken) -> Vec<LibraryRange> {
        Vec::new()
    }

    #[must_use]
    pub fn materialise(&self, _token: &ProviderToken) -> Option<Vec<u8>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_wide_set_matches_reference_ranges() {
        let provider = GacProvider::new(BTreeSet::from(["mscorlib".to_string()]));
        let range = LibraryRange::reference("mscorlib");
        assert_eq!(provider.find_library_range(&range).len(), 1);
    }
}

//! Framework-reference provider (spec §4.2): resolves against an installed
//! framework's reference-assembly set keyed by the consumer's target
//! framework, bypassing version ranges entirely.

use crate::candidate::{Candidate, ProviderKind, ProviderToken};
use modulus_core::{CompatibilityTable, FrameworkProfile, LibraryRange, Version};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct FrameworkReferenceProvider {
    assemblies: BTreeMap<FrameworkProfile, Vec<String>>,
}

impl FrameworkReferenceProvider {
    #[must_use]
    pub fn new(assemblies: BTreeMap<FrameworkProfile, Vec<String>>) -> Self {
        Self { assemblies }
    }

    /// Matches iff `range` is a framework/GAC reference and some profile
    /// compatible with `framework` (spec §3's external compatibility
    /// relation, not bare equality) names it in its baseline reference set.
    #[must_use]
    pub fn find_library_range(&self, range: &LibraryRange, framework: &FrameworkProfile, compatibility: &CompatibilityTable) -> Vec<Candidate> {
        if !range.range.is_reference {
            return Vec::new();
        }
        let found = self
            .assemblies
            .iter()
            .filter(|(declared, _)| compatibility.is_compatible(declared, framework))
            .any(|(_, names)| names.iter().any(|n| n == &range.name));
        if !found {
            return Vec::new();
        }
        vec![Candidate {
            name: range.name.clone(),
            version: Version::new(0, 0, 0),
            kind: ProviderKind::Framework,
            token: ProviderToken::Framework { assembly: range.name.clone() },
        }]
    }

    /// Reference assemblies declare no further dependencies here.
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
    use modulus_core::VersionRange;

    #[test]
    fn matches_reference_range_in_framework_set() {
        let net8 = FrameworkProfile::new("net", "8.0");
        let mut assemblies = BTreeMap::new();
        assemblies.insert(net8.clone(), vec!["System.Core".to_string()]);
        let provider = FrameworkReferenceProvider::new(assemblies);

        let range = LibraryRange::reference("System.Core");
        let compatibility = CompatibilityTable::new();
        assert_eq!(provider.find_library_range(&range, &net8, &compatibility).len(), 1);
    }

    #[test]
    fn non_reference_ranges_never_match() {
        let net8 = FrameworkProfile::new("net", "8.0");
        let provider = FrameworkReferenceProvider::default();
        let range = LibraryRange::new("System.Core", VersionRange::any());
        let compatibility = CompatibilityTable::new();
        assert!(provider.find_library_range(&range, &net8, &compatibility).is_empty());
    }

    #[test]
    fn matches_via_a_compatible_declared_profile_not_just_an_exact_one() {
        let net8 = FrameworkProfile::new("net", "8.0");
        let standard2 = FrameworkProfile::new("netstandard", "2.0");
        let mut assemblies = BTreeMap::new();
        assemblies.insert(standard2, vec!["System.Core".to_string()]);
        let provider = FrameworkReferenceProvider::new(assemblies);

        let range = LibraryRange::reference("System.Core");
        let compatibility = CompatibilityTable::with_standard_lineage();
        assert_eq!(provider.find_library_range(&range, &net8, &compatibility).len(), 1);
    }
}

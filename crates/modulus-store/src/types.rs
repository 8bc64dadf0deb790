//! The installed-package record (spec §3 `Package (installed)`).

use modulus_core::{CompatibilityTable, FrameworkProfile, IntegrityHash, LibraryRange, Version};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A package materialised on disk under `<store>/<name>/<version>/`.
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub version: Version,
    /// base64 SHA-512 over the *archive bytes*, not the extracted tree
    /// (spec §4.4).
    pub sha: IntegrityHash,
    pub files: Vec<PathBuf>,
    /// `None` key means "all frameworks" (spec §3).
    pub framework_assemblies: BTreeMap<Option<FrameworkProfile>, Vec<String>>,
    pub dependency_sets: BTreeMap<Option<FrameworkProfile>, Vec<LibraryRange>>,
    pub package_assembly_references: BTreeMap<Option<FrameworkProfile>, Vec<String>>,
}

impl Package {
    /// Dependencies that apply when installing for `framework`: the shared
    /// (`None`-keyed) set plus every framework-keyed set whose declared
    /// profile is compatible with `framework` (spec §3: "the compatibility
    /// relation is an external lookup, not recomputed"), not merely the one
    /// declared under the exact same profile.
    #[must_use]
    pub fn dependencies_for(&self, framework: &FrameworkProfile, compatibility: &CompatibilityTable) -> Vec<&LibraryRange> {
        let mut ranges: Vec<&LibraryRange> =
            self.dependency_sets.get(&None).map(|v| v.iter().collect()).unwrap_or_default();
        for (declared, set) in &self.dependency_sets {
            let Some(declared) = declared else { continue };
            if compatibility.is_compatible(declared, framework) {
                ranges.extend(set.iter());
            }
        }
        ranges
    }
}

//! Local package store provider (spec §4.2): enumerates
//! `<store>/<name>/` version directories and returns all satisfying the
//! requested range.
//!
//! Finding a satisfying candidate here requires a sidecar metadata file
//! (dependencies, framework assemblies) since the store's own [`Package`]
//! type isn't derivable from an extracted archive tree alone; this
//! provider reads `<version>/.modulus-package.json` written by the
//! restore driver at install time.

use crate::candidate::{Candidate, ProviderKind, ProviderToken};
use modulus_core::{CompatibilityTable, FrameworkProfile, LibraryRange, Version};
use modulus_store::{Package, Store};

#[derive(Debug, Clone)]
pub struct LocalStoreProvider {
    store: Store,
}

impl LocalStoreProvider {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn load_package_metadata(&self, name: &str, version: &Version) -> Option<Package> {
        let path = self.store.package_dir(name, version).join(".modulus-package.json");
        let text = std::fs::read_to_string(path).ok()?;
        crate::metadata::parse_package_metadata(name, version, &text).ok()
    }

    #[must_use]
    pub fn find_library_range(&self, range: &LibraryRange) -> Vec<Candidate> {
        self.store
            .installed_versions(&range.name)
            .into_iter()
            .filter(|v| range.range.satisfies(v))
            .filter_map(|version| {
                let package = self.load_package_metadata(&range.name, &version)?;
                Some(Candidate {
                    name: range.name.clone(),
                    version,
                    kind: ProviderKind::Local,
                    token: ProviderToken::Local(package),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn get_dependencies(token: &ProviderToken, framework: &FrameworkProfile, compatibility: &CompatibilityTable) -> Vec<LibraryRange> {
        match token {
            ProviderToken::Local(package) => {
                package.dependencies_for(framework, compatibility).into_iter().cloned().collect()
            }
            _ => Vec::new(),
        }
    }

    /// Already-installed local packages materialise to nothing further.
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
    fn no_metadata_means_no_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        std::fs::create_dir_all(store.package_dir("A", &Version::new(1, 0, 0))).unwrap();

        let provider = LocalStoreProvider::new(store);
        let range = LibraryRange::new("A", VersionRange::any());
        assert!(provider.find_library_range(&range).is_empty());
    }
}

//! Seed a [`Store`] with a locally "pre-installed" package, sidecar
//! metadata included, without going through the download/extract pipeline
//! — for tests of the local-store provider and lock-pinned restore paths.

use anyhow::{Context, Result};
use modulus_core::{IntegrityHash, LibraryRange, Version, VersionRange};
use modulus_store::{Package, Store};
use std::collections::BTreeMap;

/// Write `<store>/<name>/<version>/.modulus-package.json` declaring the
/// given dependency ranges (`"Other.Lib" -> "[1.0,2.0)"`) and sha.
pub fn seed_local_package(store: &Store, name: &str, version: &Version, deps: &[(&str, &str)], sha: &str) -> Result<()> {
    let dependencies = deps
        .iter()
        .map(|(dep_name, range)| VersionRange::parse(range).map(|r| LibraryRange::new(*dep_name, r)))
        .collect::<Result<Vec<_>, _>>()
        .context("parsing seeded dependency ranges")?;

    let package = Package {
        name: name.to_string(),
        version: version.clone(),
        sha: IntegrityHash::from_base64(sha),
        files: Vec::new(),
        framework_assemblies: BTreeMap::new(),
        dependency_sets: BTreeMap::from([(None, dependencies)]),
        package_assembly_references: BTreeMap::new(),
    };

    let dir = store.package_dir(name, version);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let metadata = modulus_providers::metadata::to_metadata(&package);
    let text = serde_json::to_string_pretty(&metadata)?;
    std::fs::write(dir.join(".modulus-package.json"), text).context("writing .modulus-package.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_package_is_discoverable_by_the_local_provider() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let version = Version::parse("1.0.0").unwrap();
        seed_local_package(&store, "A", &version, &[("B", "1.0")], "seed-sha").unwrap();

        let provider = modulus_providers::LocalStoreProvider::new(store);
        let range = LibraryRange::new("A", VersionRange::any());
        let candidates = provider.find_library_range(&range);
        assert_eq!(candidates.len(), 1);
    }
}

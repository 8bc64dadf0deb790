//! Domain-specific assertion helpers for store and lock-file state.

use anyhow::{bail, Result};
use modulus_core::Version;
use modulus_lockfile::LockFile;
use modulus_store::Store;

/// Assert that `name`@`version` is present in `store`.
pub fn assert_installed(store: &Store, name: &str, version: &Version) -> Result<()> {
    if !store.contains(name, version) {
        bail!("{name}@{version} not found under {}", store.root().display());
    }
    Ok(())
}

/// Assert that `name`@`version` is absent from `store`.
pub fn assert_not_installed(store: &Store, name: &str, version: &Version) -> Result<()> {
    if store.contains(name, version) {
        bail!("{name}@{version} unexpectedly present under {}", store.root().display());
    }
    Ok(())
}

/// Assert that a lock file's `libraries` map has exactly this many entries.
pub fn assert_lock_library_count(lock: &LockFile, expected: usize) -> Result<()> {
    let actual = lock.libraries.len();
    if actual != expected {
        bail!("expected {expected} locked libraries, found {actual}");
    }
    Ok(())
}

/// Assert that a lock file pins `name`@`version` with the given sha prefix
/// (pass an empty string to skip the hash check).
pub fn assert_lock_contains(lock: &LockFile, name: &str, version: &Version) -> Result<()> {
    let found = lock.libraries.keys().any(|key| key.name == name && &key.version == version);
    if !found {
        bail!("{name}@{version} not found in lock file");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modulus_lockfile::{FrameworkKey, LibraryKey, LockedLibrary};
    use modulus_core::IntegrityHash;
    use std::collections::BTreeMap;

    #[test]
    fn lock_contains_finds_a_pinned_entry() {
        let mut lock = LockFile::new(true);
        let version = Version::parse("1.0.0").unwrap();
        lock.libraries.insert(
            LibraryKey { name: "Acme.Core".into(), version: version.clone() },
            LockedLibrary {
                name: "Acme.Core".into(),
                version: version.clone(),
                sha: IntegrityHash::of(b"deadbeef"),
                framework_assemblies: BTreeMap::new(),
                dependency_sets: BTreeMap::new(),
                package_assembly_references: BTreeMap::new(),
            },
        );
        assert_lock_contains(&lock, "Acme.Core", &version).unwrap();
        assert_lock_library_count(&lock, 1).unwrap();
        let _ = FrameworkKey::Shared;
    }

    #[test]
    fn installed_check_fails_on_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let version = Version::parse("1.0.0").unwrap();
        assert!(assert_installed(&store, "Acme.Core", &version).is_err());
        assert_not_installed(&store, "Acme.Core", &version).unwrap();
    }
}

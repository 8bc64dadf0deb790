//! On-disk layout: `<root>/<name>/<version>/...` (spec §6 "Package store
//! layout").

use modulus_core::Version;
use std::path::{Path, PathBuf};

/// The original archive's filename under `<store>/<name>/<version>/`, kept
/// alongside the extracted tree so its sha512 can be recomputed from disk
/// (spec §3 "with the original archive present for sha recomputation").
pub const ARCHIVE_FILE_NAME: &str = ".modulus-archive";

/// A content-addressed package store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The final, extracted directory for a given package.
    #[must_use]
    pub fn package_dir(&self, name: &str, version: &Version) -> PathBuf {
        self.root.join(name).join(version.to_string())
    }

    /// Where the original archive bytes live alongside the extracted tree.
    #[must_use]
    pub fn archive_path(&self, name: &str, version: &Version) -> PathBuf {
        self.package_dir(name, version).join(ARCHIVE_FILE_NAME)
    }

    /// A unique, process-specific temp directory used while extracting, so
    /// concurrent installs of the same package never collide.
    #[must_use]
    pub fn temp_dir(&self, name: &str, version: &Version) -> PathBuf {
        self.root
            .join(name)
            .join(format!("{version}.tmp-{}", std::process::id()))
    }

    /// Whether `(name, version)` is already present.
    #[must_use]
    pub fn contains(&self, name: &str, version: &Version) -> bool {
        self.package_dir(name, version).is_dir()
    }

    /// Every version already installed for `name`, unsorted.
    #[must_use]
    pub fn installed_versions(&self, name: &str) -> Vec<Version> {
        let dir = self.root.join(name);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };
        entries
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let name = file_name.to_str()?;
                if name.contains(".tmp-") {
                    return None;
                }
                Version::parse(name).ok()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_dir_join_name_and_version() {
        let store = Store::new("/store");
        let dir = store.package_dir("Foo", &Version::new(1, 0, 0));
        assert_eq!(dir, PathBuf::from("/store/Foo/1.0.0.0"));
    }

    #[test]
    fn contains_is_false_for_missing_package() {
        let store = Store::new("/nonexistent-store-root");
        assert!(!store.contains("Foo", &Version::new(1, 0, 0)));
    }
}

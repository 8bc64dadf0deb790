//! Default on-disk locations, following each OS's conventions via
//! [`directories`] rather than hand-rolled `$HOME` concatenation.

use directories::ProjectDirs;
use std::path::PathBuf;

const QUALIFIER: &str = "host";
const ORGANIZATION: &str = "modulus";
const APPLICATION: &str = "modulus";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Default content-addressed package store directory.
#[must_use]
pub fn default_store_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().join("store"))
        .unwrap_or_else(|| PathBuf::from(".modulus/store"))
}

/// Default download/metadata cache directory.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".modulus/cache"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dirs_are_non_empty() {
        assert!(!default_store_dir().as_os_str().is_empty());
        assert!(!default_cache_dir().as_os_str().is_empty());
    }
}

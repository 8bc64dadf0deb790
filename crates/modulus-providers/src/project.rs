//! Project-source provider (spec §4.2): looks up a sibling directory with a
//! manifest matching the requested name. Version is accepted regardless of
//! range — "project references trump versions" — and materialise produces
//! no bytes, since the candidate already lives on disk.

use crate::candidate::{Candidate, ProviderKind, ProviderToken};
use crate::error::{ProviderError, Result};
use modulus_core::{FrameworkProfile, LibraryRange, Project, MANIFEST_FILE_NAME};
use std::path::PathBuf;

/// Scans the direct children of `solution_root` for project directories.
#[derive(Debug, Clone)]
pub struct ProjectProvider {
    solution_root: PathBuf,
}

impl ProjectProvider {
    #[must_use]
    pub fn new(solution_root: impl Into<PathBuf>) -> Self {
        Self { solution_root: solution_root.into() }
    }

    fn manifest_path_for(&self, name: &str) -> PathBuf {
        self.solution_root.join(name).join(MANIFEST_FILE_NAME)
    }

    /// At most one candidate: the sibling project directory named `range.name`,
    /// if it exists, regardless of what range was requested.
    pub fn find_library_range(&self, range: &LibraryRange) -> Result<Vec<Candidate>> {
        let path = self.manifest_path_for(&range.name);
        if !path.is_file() {
            return Ok(Vec::new());
        }
        let project = Project::load(&path)
            .map_err(|source| ProviderError::ProjectManifest { name: range.name.clone(), source })?;
        Ok(vec![Candidate {
            name: project.name.clone(),
            version: project.version.clone(),
            kind: ProviderKind::Project,
            token: ProviderToken::Project { manifest_path: path },
        }])
    }

    pub fn get_dependencies(&self, token: &ProviderToken, framework: &FrameworkProfile) -> Result<Vec<LibraryRange>> {
        let ProviderToken::Project { manifest_path } = token else {
            return Ok(Vec::new());
        };
        let project = Project::load(manifest_path).map_err(|source| ProviderError::ProjectManifest {
            name: manifest_path.display().to_string(),
            source,
        })?;
        Ok(project
            .dependencies_for(framework)
            .into_iter()
            .map(|dep| dep.range.clone())
            .collect())
    }

    /// Project candidates materialise to nothing: the sibling directory is
    /// already present on disk.
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
    fn finds_sibling_project_regardless_of_requested_version() {
        let dir = tempfile::tempdir().unwrap();
        let sibling = dir.path().join("Q");
        std::fs::create_dir_all(&sibling).unwrap();
        std::fs::write(sibling.join(MANIFEST_FILE_NAME), r#"{"name":"Q","version":"0.1.0"}"#).unwrap();

        let provider = ProjectProvider::new(dir.path());
        let range = LibraryRange::new("Q", VersionRange::exact("2.0.0".parse().unwrap()));
        let candidates = provider.find_library_range(&range).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].version.to_string(), "0.1.0.0");
    }

    #[test]
    fn no_sibling_yields_no_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ProjectProvider::new(dir.path());
        let range = LibraryRange::new("Ghost", VersionRange::any());
        assert!(provider.find_library_range(&range).unwrap().is_empty());
    }
}

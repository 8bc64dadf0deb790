//! Manifest discovery and path normalisation (spec §4.6 steps 1/2).

use crate::error::{Result, RestoreError};
use modulus_core::{Project, MANIFEST_FILE_NAME};
use std::path::{Path, PathBuf};

/// Normalise a user-supplied restore path: a manifest file resolves to its
/// parent directory, a nonexistent path is an error (spec §4.6 step 1).
pub fn normalise_root(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(RestoreError::PathNotFound { path: path.to_path_buf() });
    }
    if path.is_file() {
        return Ok(path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")));
    }
    Ok(path.to_path_buf())
}

/// Every project manifest under `root`, recursively (spec §4.6 step 2).
/// Does not descend into the package store or hidden directories — a
/// manifest lives one level per project directory, same shape the
/// project-source provider expects.
pub fn discover_manifests(root: &Path) -> Result<Vec<Project>> {
    let mut projects = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = entry.map_err(|source| RestoreError::Discovery {
            root: root.to_path_buf(),
            source: std::io::Error::other(source),
        })?;
        if entry.file_name() == MANIFEST_FILE_NAME {
            let project = Project::load(entry.path())?;
            projects.push(project);
        }
    }
    if projects.is_empty() {
        return Err(RestoreError::NoManifestsFound { root: root.to_path_buf() });
    }
    Ok(projects)
}

/// Synthesise a single-dependency project for install-one-package mode
/// (spec §4.6: "its 'project' is synthesised from the requested id/version
/// and it emits no lock file").
#[must_use]
pub fn synthesize_install_one(id: &str, range: modulus_core::VersionRange) -> Project {
    use modulus_core::{Dependency, DependencyKind, LibraryRange};
    use std::collections::BTreeMap;

    Project {
        name: id.to_string(),
        version: modulus_core::Version::new(0, 0, 0),
        entry_point: None,
        commands: BTreeMap::new(),
        shared_dependencies: vec![Dependency::new(LibraryRange::new(id, range), DependencyKind::Default)],
        per_framework: indexmap::IndexMap::new(),
        framework_assemblies: BTreeMap::new(),
        source_files: Vec::new(),
        shared_files: Vec::new(),
        project_file_path: PathBuf::from(format!("<install-one:{id}>")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_path_normalises_to_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE_NAME);
        std::fs::write(&manifest, "{}").unwrap();
        assert_eq!(normalise_root(&manifest).unwrap(), dir.path());
    }

    #[test]
    fn nonexistent_path_is_an_error() {
        let result = normalise_root(Path::new("/definitely/does/not/exist"));
        assert!(matches!(result, Err(RestoreError::PathNotFound { .. })));
    }

    #[test]
    fn discovers_nested_manifests() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Proj");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join(MANIFEST_FILE_NAME), r#"{"name":"Proj"}"#).unwrap();

        let projects = discover_manifests(dir.path()).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Proj");
    }

    #[test]
    fn no_manifests_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(discover_manifests(dir.path()), Err(RestoreError::NoManifestsFound { .. })));
    }
}

//! Lock-file state classification (spec §4.6 step 4).

use modulus_core::Project;
use modulus_lockfile::LockFile;
use std::path::Path;

/// The four states a restore can find its lock file in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Absent,
    PresentValidLocked,
    PresentValidUnlocked,
    PresentInvalid,
}

impl LockState {
    /// Locked ⇒ lock-pinned walk; everything else ⇒ a fresh walk per
    /// framework profile (spec §4.6 step 4).
    #[must_use]
    pub fn is_lock_pinned(self) -> bool {
        matches!(self, Self::PresentValidLocked)
    }
}

/// Read and classify the lock file at `path` against `project`.
#[must_use]
pub fn classify(path: &Path, project: &Project) -> (LockState, Option<LockFile>) {
    if !path.is_file() {
        return (LockState::Absent, None);
    }

    let lock = match modulus_lockfile::read(path) {
        Ok(lock) => lock,
        Err(source) => {
            tracing::warn!(path = %path.display(), %source, "lock file unreadable, treating as invalid");
            return (LockState::PresentInvalid, None);
        }
    };

    if modulus_lockfile::validate(&lock, project).is_err() {
        return (LockState::PresentInvalid, Some(lock));
    }

    let state = if lock.locked { LockState::PresentValidLocked } else { LockState::PresentValidUnlocked };
    (state, Some(lock))
}

#[cfg(test)]
mod tests {
    use super::*;
    use modulus_core::{Dependency, DependencyKind, LibraryRange, VersionRange};
    use std::collections::BTreeMap;

    fn project_with(shared: Vec<&str>) -> Project {
        Project {
            name: "Sample".into(),
            version: "1.0.0.0".parse().unwrap(),
            entry_point: None,
            commands: BTreeMap::new(),
            shared_dependencies: shared
                .into_iter()
                .map(|n| Dependency { range: LibraryRange::new(n, VersionRange::any()), kind: DependencyKind::Default })
                .collect(),
            per_framework: indexmap::IndexMap::new(),
            framework_assemblies: BTreeMap::new(),
            source_files: Vec::new(),
            shared_files: Vec::new(),
            project_file_path: "project.json".into(),
        }
    }

    #[test]
    fn missing_lock_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let (state, lock) = classify(&dir.path().join("modulus.lock"), &project_with(vec![]));
        assert_eq!(state, LockState::Absent);
        assert!(lock.is_none());
    }

    #[test]
    fn matching_locked_lock_is_valid_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modulus.lock");
        let mut lock = LockFile::new(true);
        lock.framework_dependencies.insert(modulus_lockfile::FrameworkKey::Shared, vec!["Acme [, ]".into()]);
        modulus_lockfile::write_atomic(&path, &lock).unwrap();

        let (state, _) = classify(&path, &project_with(vec!["Acme"]));
        assert_eq!(state, LockState::PresentValidLocked);
    }

    #[test]
    fn drifted_lock_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modulus.lock");
        let lock = LockFile::new(true);
        modulus_lockfile::write_atomic(&path, &lock).unwrap();

        let (state, _) = classify(&path, &project_with(vec!["Acme"]));
        assert_eq!(state, LockState::PresentInvalid);
    }
}

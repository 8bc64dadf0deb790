//! Manifest-vs-lock drift detection (spec §4.5 validation rules).

use crate::types::{FrameworkKey, LockFile};
use modulus_core::Project;
use std::collections::BTreeSet;

/// Why a lock file was rejected as stale. Any mismatch means "full
/// re-resolution with network allowed" per spec §4.5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriftReason {
    /// The lock's framework-dependency keys don't equal `{""} ∪ project.frameworks`.
    FrameworkKeySetMismatch { missing: Vec<String>, extra: Vec<String> },
    /// For one key, the declared-dependency strings differ between manifest and lock.
    DependencySetMismatch { framework: String, missing_from_lock: Vec<String>, extra_in_lock: Vec<String> },
}

/// Validate `lock` against `project`. `Ok(())` means the lock is current
/// and safe to walk in lock-pinned mode; `Err` lists every drift found.
pub fn validate(lock: &LockFile, project: &Project) -> Result<(), Vec<DriftReason>> {
    let mut reasons = Vec::new();

    let expected_keys: BTreeSet<FrameworkKey> = std::iter::once(FrameworkKey::Shared)
        .chain(project.frameworks().into_iter().map(FrameworkKey::Profile))
        .collect();
    let actual_keys: BTreeSet<FrameworkKey> = lock.framework_dependencies.keys().cloned().collect();

    if expected_keys != actual_keys {
        let missing: Vec<String> = expected_keys.difference(&actual_keys).map(ToString::to_string).collect();
        let extra: Vec<String> = actual_keys.difference(&expected_keys).map(ToString::to_string).collect();
        reasons.push(DriftReason::FrameworkKeySetMismatch { missing, extra });
    }

    for key in expected_keys.intersection(&actual_keys) {
        let framework = match key {
            FrameworkKey::Shared => None,
            FrameworkKey::Profile(p) => Some(p.clone()),
        };
        let manifest_set: BTreeSet<String> = match &framework {
            None => project.shared_dependencies.iter().map(|d| d.range.canonical_form()).collect(),
            Some(p) => project
                .per_framework
                .get(p)
                .into_iter()
                .flatten()
                .map(|d| d.range.canonical_form())
                .collect(),
        };
        let lock_set: BTreeSet<String> = lock.framework_dependencies.get(key).into_iter().flatten().cloned().collect();

        if manifest_set != lock_set {
            reasons.push(DriftReason::DependencySetMismatch {
                framework: key.to_string(),
                missing_from_lock: manifest_set.difference(&lock_set).cloned().collect(),
                extra_in_lock: lock_set.difference(&manifest_set).cloned().collect(),
            });
        }
    }

    if reasons.is_empty() { Ok(()) } else { Err(reasons) }
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
    fn matching_manifest_and_lock_validate_clean() {
        let project = project_with(vec!["Acme"]);
        let mut lock = LockFile::new(true);
        lock.framework_dependencies.insert(FrameworkKey::Shared, vec!["Acme [, ]".into()]);
        assert!(validate(&lock, &project).is_ok());
    }

    #[test]
    fn missing_dependency_in_lock_is_reported() {
        let project = project_with(vec!["Acme", "Widgets"]);
        let mut lock = LockFile::new(true);
        lock.framework_dependencies.insert(FrameworkKey::Shared, vec!["Acme [, ]".into()]);
        let err = validate(&lock, &project).unwrap_err();
        assert!(matches!(&err[0], DriftReason::DependencySetMismatch { missing_from_lock, .. } if !missing_from_lock.is_empty()));
    }

    #[test]
    fn missing_framework_key_is_reported() {
        let project = project_with(vec![]);
        let lock = LockFile::new(true);
        let err = validate(&lock, &project).unwrap_err();
        assert!(matches!(&err[0], DriftReason::FrameworkKeySetMismatch { missing, .. } if !missing.is_empty()));
    }
}

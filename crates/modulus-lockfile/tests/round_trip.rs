//! Spec §8 property 2 (lock round-trip) and property 3 (validation
//! idempotence), driven against a real project layout via
//! `modulus-test-utils` rather than hand-built fixtures.

use modulus_lockfile::{from_json, to_canonical_json, validate, FrameworkKey, LockFile, LockedLibrary};
use modulus_test_utils::prelude::*;

/// Mirrors the shape `modulus-restore`'s driver writes: a shared key plus
/// one key per framework the project declares, built entirely from the
/// manifest's own dependency strings so a fresh validation is clean.
fn lock_for(project: &modulus_core::Project) -> LockFile {
    let mut lock = LockFile::new(true);
    let shared: Vec<String> = project.shared_dependencies.iter().map(|d| d.range.canonical_form()).collect();
    lock.framework_dependencies.insert(FrameworkKey::Shared, shared);

    for framework in project.frameworks() {
        let strings: Vec<String> = project
            .per_framework
            .get(&framework)
            .into_iter()
            .flatten()
            .map(|d| d.range.canonical_form())
            .collect();
        lock.framework_dependencies.insert(FrameworkKey::Profile(framework), strings);
    }

    lock.libraries.insert(
        modulus_lockfile::LibraryKey { name: "Acme.Json".into(), version: "5.0.0.0".parse().unwrap() },
        LockedLibrary {
            name: "Acme.Json".into(),
            version: "5.0.0.0".parse().unwrap(),
            sha: modulus_core::IntegrityHash::of(b"archive bytes"),
            framework_assemblies: Default::default(),
            dependency_sets: Default::default(),
            package_assembly_references: Default::default(),
        },
    );
    lock
}

#[tokio::test]
async fn lock_round_trips_through_canonical_json_unchanged() {
    let project = TempProject::new("Acme.App").build().await.unwrap().load_project().await.unwrap();
    let lock = lock_for(&project);

    let rendered = to_canonical_json(&lock).unwrap();
    let back = from_json(&rendered).unwrap();
    let rendered_again = to_canonical_json(&back).unwrap();

    assert_eq!(rendered, rendered_again);
    assert_eq!(back.libraries.len(), lock.libraries.len());
    assert_eq!(back.framework_dependencies, lock.framework_dependencies);
}

#[tokio::test]
async fn freshly_written_lock_validates_clean_against_its_manifest() {
    let manifest = Fixtures::manifest_with_dependencies_json();
    let project = TempProject::new("Acme.App").with_manifest(manifest).build().await.unwrap().load_project().await.unwrap();
    let lock = lock_for(&project);

    assert!(validate(&lock, &project).is_ok());
}

#[tokio::test]
async fn mutating_a_declared_dependency_string_makes_the_lock_stale() {
    let manifest = Fixtures::manifest_with_dependencies_json();
    let project = TempProject::new("Acme.App").with_manifest(manifest).build().await.unwrap().load_project().await.unwrap();
    let mut lock = lock_for(&project);

    let shared = lock.framework_dependencies.get_mut(&FrameworkKey::Shared).unwrap();
    if let Some(first) = shared.first_mut() {
        first.push_str(".tampered");
    } else {
        shared.push("Nonexistent.Lib [1.0.0.0, 2.0.0.0)".into());
    }

    let drift = validate(&lock, &project).unwrap_err();
    assert!(!drift.is_empty());
}

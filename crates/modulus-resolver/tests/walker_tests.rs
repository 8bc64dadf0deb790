//! Spec §8 properties 6 (case sensitivity), 7 (version selection), 8
//! (provider precedence), and scenario S4 (project-source sibling
//! override), driven through real providers backed by
//! `modulus-test-utils` fixtures rather than hand-rolled candidates.

use modulus_core::{FrameworkProfile, LibraryRange, Version, VersionRange};
use modulus_providers::{FrameworkReferenceProvider, GacProvider, LocalStoreProvider, ProjectProvider};
use modulus_resolver::{create_graph_node, WalkContext, WarningSink};
use modulus_store::Store;
use modulus_test_utils::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

fn net8() -> FrameworkProfile {
    FrameworkProfile::new("net", "8.0")
}

fn context(solution_root: &std::path::Path, store: Store) -> WalkContext {
    WalkContext {
        project_provider: ProjectProvider::new(solution_root),
        local_provider: LocalStoreProvider::new(store),
        framework_provider: FrameworkReferenceProvider::default(),
        gac_provider: GacProvider::default(),
        remote_providers: Vec::new(),
        compatibility: modulus_core::CompatibilityTable::with_standard_lineage(),
        ignore_failed_sources: false,
        pinned: None,
        cancelled: Arc::new(AtomicBool::new(false)),
        tokio_handle: tokio::runtime::Handle::current(),
        warnings: Arc::new(WarningSink::default()),
        memo: dashmap::DashMap::new(),
    }
}

#[tokio::test]
async fn foo_resolved_by_a_provider_holding_foo_lowercase_is_unresolved_with_a_suggestion() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("store"));
    let version = Version::parse("1.0.0").unwrap();
    seed_local_package(&store, "foo", &version, &[], "sha-foo").unwrap();

    let ctx = context(dir.path(), store);
    let range = LibraryRange::new("Foo", VersionRange::any());
    let framework = net8();

    let node = tokio::task::block_in_place(|| create_graph_node(&ctx, &range, &framework)).unwrap();

    assert!(!node.is_resolved());
    assert_eq!(node.suggestion.as_deref(), Some("foo"));
}

#[tokio::test]
async fn half_open_range_selects_the_highest_satisfying_version() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("store"));
    for raw in ["1.0.0", "1.4.0", "1.9.0", "2.0.0", "2.1.0"] {
        let version = Version::parse(raw).unwrap();
        seed_local_package(&store, "Acme.Widgets", &version, &[], "sha").unwrap();
    }

    let ctx = context(dir.path(), store);
    let range = LibraryRange::new("Acme.Widgets", VersionRange::half_open(Version::parse("1.0.0").unwrap(), Version::parse("2.0.0").unwrap()));
    let framework = net8();

    let node = tokio::task::block_in_place(|| create_graph_node(&ctx, &range, &framework)).unwrap();

    let item = node.item.expect("range should resolve against a local candidate");
    assert_eq!(item.library_version, Version::parse("1.9.0").unwrap());
}

#[tokio::test]
async fn a_project_source_sibling_wins_over_a_same_named_local_package() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("store"));

    // A local package also named "Acme.Sibling" at a much higher version:
    // if version alone decided this, the local candidate would win.
    let local_version = Version::parse("99.0.0").unwrap();
    seed_local_package(&store, "Acme.Sibling", &local_version, &[], "sha").unwrap();

    // A sibling project directory of the same name, per the
    // `<solution-root>/<assembly-name>/project.json` convention.
    let sibling_dir = dir.path().join("Acme.Sibling");
    std::fs::create_dir_all(&sibling_dir).unwrap();
    std::fs::write(
        sibling_dir.join(modulus_core::MANIFEST_FILE_NAME),
        r#"{"name":"Acme.Sibling","version":"0.1.0"}"#,
    )
    .unwrap();

    let ctx = context(dir.path(), store);
    let range = LibraryRange::new("Acme.Sibling", VersionRange::any());
    let framework = net8();

    let node = tokio::task::block_in_place(|| create_graph_node(&ctx, &range, &framework)).unwrap();

    let item = node.item.expect("sibling project should resolve");
    assert_eq!(item.provider, modulus_providers::ProviderKind::Project);
    assert_eq!(item.library_version, Version::parse("0.1.0").unwrap());
}

//! Canonical JSON rendering (spec §4.5): `libraries` is `BTreeMap`-backed
//! and so always sorts by `(name, version)`; `framework_dependencies` is
//! `IndexMap`-backed and renders in whatever order its entries were
//! inserted, which callers are responsible for getting right (the shared
//! set first, then frameworks in declared order). Either way the default
//! `serde_json` serializer is the canonical form — no custom serializer
//! is needed.

use crate::error::Result;
use crate::types::LockFile;

/// Render `lock` as the canonical, pretty-printed JSON form written to disk.
pub fn to_canonical_json(lock: &LockFile) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(lock)?;
    rendered.push('\n');
    Ok(rendered)
}

pub fn from_json(text: &str) -> Result<LockFile> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FrameworkKey, LibraryKey, LockedLibrary};
    use modulus_core::{FrameworkProfile, IntegrityHash, Version};

    fn sample() -> LockFile {
        let mut lock = LockFile::new(true);
        lock.framework_dependencies.insert(FrameworkKey::Shared, vec!["Acme [1.0.0.0, 2.0.0.0)".into()]);
        lock.framework_dependencies.insert(FrameworkKey::Profile(FrameworkProfile::new("net", "8.0")), vec![]);
        lock.libraries.insert(
            LibraryKey { name: "Acme".into(), version: Version::parse("1.9.0.0").unwrap() },
            LockedLibrary {
                name: "Acme".into(),
                version: Version::parse("1.9.0.0").unwrap(),
                sha: IntegrityHash::of(b"archive bytes"),
                framework_assemblies: Default::default(),
                dependency_sets: Default::default(),
                package_assembly_references: Default::default(),
            },
        );
        lock
    }

    #[test]
    fn round_trips_through_canonical_json() {
        let lock = sample();
        let rendered = to_canonical_json(&lock).unwrap();
        let back = from_json(&rendered).unwrap();
        assert_eq!(back.locked, lock.locked);
        assert_eq!(back.libraries.len(), 1);
    }

    #[test]
    fn same_lock_produces_byte_identical_json_across_runs() {
        // spec §8 property 1 (Determinism), at the serialization layer.
        let a = to_canonical_json(&sample()).unwrap();
        let b = to_canonical_json(&sample()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn shared_framework_key_serialises_before_named_profiles() {
        let rendered = to_canonical_json(&sample()).unwrap();
        let shared_pos = rendered.find("\"\":").unwrap();
        let net_pos = rendered.find("\"net8.0\"").unwrap();
        assert!(shared_pos < net_pos);
    }
}

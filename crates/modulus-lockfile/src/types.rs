//! Lock-file data model (spec §3 `LockFile`/`LockedLibrary`).

use indexmap::IndexMap;
use modulus_core::{FrameworkProfile, IntegrityHash, Version};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub const LOCK_VERSION: u32 = 1;

/// A `framework_dependencies`/per-library-map key: the shared ("") set, or
/// one declared framework. Orders with the shared set first (spec §4.5
/// "with `""` first for the shared set").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrameworkKey {
    Shared,
    Profile(FrameworkProfile),
}

impl fmt::Display for FrameworkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared => write!(f, ""),
            Self::Profile(p) => write!(f, "{p}"),
        }
    }
}

impl FrameworkKey {
    #[must_use]
    pub fn from_optional(framework: Option<&FrameworkProfile>) -> Self {
        match framework {
            Some(p) => Self::Profile(p.clone()),
            None => Self::Shared,
        }
    }
}

impl Serialize for FrameworkKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FrameworkKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(Self::Shared);
        }
        Ok(Self::Profile(FrameworkProfile::parse_moniker(&raw)))
    }
}

/// The `(name, version)` key of `LockFile.libraries`, ordered by name then
/// by `Version`'s numeric ordering (not the rendered string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LibraryKey {
    pub name: String,
    pub version: Version,
}

impl fmt::Display for LibraryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

impl Serialize for LibraryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for LibraryKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let (name, version) = raw
            .rsplit_once('@')
            .ok_or_else(|| DeError::custom(format!("malformed library key: {raw:?}")))?;
        let version = version
            .parse::<Version>()
            .map_err(|e| DeError::custom(format!("malformed library key {raw:?}: {e}")))?;
        Ok(Self { name: name.to_string(), version })
    }
}

/// `LockedLibrary` mirrors `Package` minus file contents: the on-disk file
/// listing is store-local and not part of a portable, replayable lock
/// (spec §3 "LockedLibrary mirrors Package minus file contents").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockedLibrary {
    pub name: String,
    pub version: Version,
    pub sha: IntegrityHash,
    #[serde(default)]
    pub framework_assemblies: BTreeMap<FrameworkKey, Vec<String>>,
    #[serde(default)]
    pub dependency_sets: BTreeMap<FrameworkKey, Vec<String>>,
    #[serde(default)]
    pub package_assembly_references: BTreeMap<FrameworkKey, Vec<String>>,
}

/// Spec §3 `LockFile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockFile {
    pub locked: bool,
    pub version: u32,
    /// `IndexMap`, not `BTreeMap`: rendered with `""` first for the shared
    /// set, then frameworks in declared order (spec §4.5), which requires
    /// preserving insertion order rather than re-sorting by `FrameworkKey`.
    pub framework_dependencies: IndexMap<FrameworkKey, Vec<String>>,
    pub libraries: BTreeMap<LibraryKey, LockedLibrary>,
}

impl LockFile {
    #[must_use]
    pub fn new(locked: bool) -> Self {
        Self {
            locked,
            version: LOCK_VERSION,
            framework_dependencies: IndexMap::new(),
            libraries: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framework_key_shared_sorts_before_any_profile() {
        let mut keys = vec![
            FrameworkKey::Profile(FrameworkProfile::new("net", "8.0")),
            FrameworkKey::Shared,
            FrameworkKey::Profile(FrameworkProfile::new("net", "6.0")),
        ];
        keys.sort();
        assert_eq!(keys[0], FrameworkKey::Shared);
    }

    #[test]
    fn library_key_orders_by_version_numerically_not_lexically() {
        let a = LibraryKey { name: "Acme".into(), version: "2.0.0.0".parse().unwrap() };
        let b = LibraryKey { name: "Acme".into(), version: "10.0.0.0".parse().unwrap() };
        assert!(a < b);
    }

    #[test]
    fn library_key_round_trips_through_its_string_form() {
        let key = LibraryKey { name: "Acme.Widgets".into(), version: "1.2.3.0".parse().unwrap() };
        let json = serde_json::to_string(&key).unwrap();
        let back: LibraryKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }
}

//! The sidecar `.modulus-package.json` the restore driver writes alongside
//! each installed package, so a later run's local-store provider can
//! recover dependency sets without re-deriving them from raw files.

use modulus_core::{FrameworkProfile, IntegrityHash, LibraryRange, Version};
use modulus_store::Package;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub sha: String,
    #[serde(default)]
    pub shared_dependencies: Vec<String>,
    #[serde(default)]
    pub per_framework_dependencies: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub shared_framework_assemblies: Vec<String>,
    #[serde(default)]
    pub per_framework_framework_assemblies: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub shared_assembly_references: Vec<String>,
    #[serde(default)]
    pub per_framework_assembly_references: BTreeMap<String, Vec<String>>,
}

fn expand_map(shared: &[String], per_framework: &BTreeMap<String, Vec<String>>) -> BTreeMap<Option<FrameworkProfile>, Vec<String>> {
    let mut out = BTreeMap::new();
    out.insert(None, shared.to_vec());
    for (moniker, values) in per_framework {
        out.insert(Some(FrameworkProfile::parse_moniker(moniker)), values.clone());
    }
    out
}

/// Parse a sidecar metadata file into a full [`Package`] record.
pub fn parse_package_metadata(name: &str, version: &Version, text: &str) -> modulus_core::Result<Package> {
    let raw: PackageMetadata = serde_json::from_str(text).map_err(|source| modulus_core::Error::ManifestParse {
        path: std::path::PathBuf::from(format!("{name}/{version}/.modulus-package.json")),
        source,
    })?;

    let mut dependency_sets = BTreeMap::new();
    dependency_sets.insert(
        None,
        raw.shared_dependencies
            .iter()
            .filter_map(|s| LibraryRange::parse_canonical(s).ok())
            .collect::<Vec<_>>(),
    );
    for (moniker, deps) in &raw.per_framework_dependencies {
        dependency_sets.insert(
            Some(FrameworkProfile::parse_moniker(moniker)),
            deps.iter().filter_map(|s| LibraryRange::parse_canonical(s).ok()).collect(),
        );
    }

    Ok(Package {
        name: name.to_string(),
        version: version.clone(),
        sha: IntegrityHash::from_base64(raw.sha),
        files: Vec::new(),
        framework_assemblies: expand_map(&raw.shared_framework_assemblies, &raw.per_framework_framework_assemblies),
        dependency_sets,
        package_assembly_references: expand_map(&raw.shared_assembly_references, &raw.per_framework_assembly_references),
    })
}

/// Serialise a [`Package`] back into its sidecar form.
#[must_use]
pub fn to_metadata(package: &Package) -> PackageMetadata {
    let shared_dependencies = package
        .dependency_sets
        .get(&None)
        .map(|deps| deps.iter().map(LibraryRange::canonical_form).collect())
        .unwrap_or_default();
    let per_framework_dependencies = package
        .dependency_sets
        .iter()
        .filter_map(|(k, v)| k.as_ref().map(|f| (f.to_string(), v.iter().map(LibraryRange::canonical_form).collect())))
        .collect();

    PackageMetadata {
        sha: package.sha.as_str().to_string(),
        shared_dependencies,
        per_framework_dependencies,
        shared_framework_assemblies: package.framework_assemblies.get(&None).cloned().unwrap_or_default(),
        per_framework_framework_assemblies: package
            .framework_assemblies
            .iter()
            .filter_map(|(k, v)| k.as_ref().map(|f| (f.to_string(), v.clone())))
            .collect(),
        shared_assembly_references: package.package_assembly_references.get(&None).cloned().unwrap_or_default(),
        per_framework_assembly_references: package
            .package_assembly_references
            .iter()
            .filter_map(|(k, v)| k.as_ref().map(|f| (f.to_string(), v.clone())))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_metadata() {
        use modulus_core::VersionRange;
        let mut dependency_sets = BTreeMap::new();
        dependency_sets.insert(None, vec![LibraryRange::new("B", VersionRange::any())]);

        let package = Package {
            name: "A".to_string(),
            version: Version::new(1, 0, 0),
            sha: IntegrityHash::of(b"bytes"),
            files: Vec::new(),
            framework_assemblies: BTreeMap::new(),
            dependency_sets,
            package_assembly_references: BTreeMap::new(),
        };

        let meta = to_metadata(&package);
        let text = serde_json::to_string(&meta).unwrap();
        let parsed = parse_package_metadata("A", &Version::new(1, 0, 0), &text).unwrap();
        assert_eq!(parsed.dependency_sets.get(&None).unwrap().len(), 1);
    }
}

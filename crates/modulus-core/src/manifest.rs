//! Manifest model (spec §3, §6 "Manifest format (JSON)", C1).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::framework::FrameworkProfile;
use crate::version::VersionRange;

/// The manifest file name a project directory is expected to contain.
pub const MANIFEST_FILE_NAME: &str = "project.json";

/// How a dependency restricts inclusion at consumer-build time. Does not
/// change resolution (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Default,
    Build,
}

impl Default for DependencyKind {
    fn default() -> Self {
        Self::Default
    }
}

/// A dependency constraint: name + optional version range, or a
/// framework/GAC reference that bypasses version resolution (spec §3).
#[derive(Debug, Clone)]
pub struct LibraryRange {
    pub name: String,
    pub range: VersionRange,
}

impl LibraryRange {
    #[must_use]
    pub fn new(name: impl Into<String>, range: VersionRange) -> Self {
        Self { name: name.into(), range }
    }

    /// A framework/GAC reference: name only, version bypassed entirely.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: VersionRange::reference(),
        }
    }

    /// The canonical dependency string recorded in the lock file:
    /// `"<name> <canonical-range>"`.
    #[must_use]
    pub fn canonical_form(&self) -> String {
        format!("{} {}", self.name, self.range.canonical_form())
    }

    /// Inverse of [`Self::canonical_form`]: splits on the first space into
    /// name and canonical range.
    pub fn parse_canonical(raw: &str) -> Result<Self> {
        let (name, range) = raw.split_once(' ').ok_or_else(|| Error::InvalidRange { raw: raw.to_string() })?;
        Ok(Self::new(name, VersionRange::parse(range)?))
    }
}

/// A [`LibraryRange`] plus a type hint (spec §3).
#[derive(Debug, Clone)]
pub struct Dependency {
    pub range: LibraryRange,
    pub kind: DependencyKind,
}

impl Dependency {
    #[must_use]
    pub fn new(range: LibraryRange, kind: DependencyKind) -> Self {
        Self { range, kind }
    }
}

/// A parsed, immutable project manifest (spec §3).
#[derive(Debug, Clone)]
pub struct Project {
    pub name: String,
    pub version: crate::version::Version,
    pub entry_point: Option<String>,
    pub commands: BTreeMap<String, String>,
    pub shared_dependencies: Vec<Dependency>,
    /// Ordered by declaration in the manifest's `frameworks` object (spec
    /// §4.5 "frameworks in declared order"), not alphabetically.
    pub per_framework: IndexMap<FrameworkProfile, Vec<Dependency>>,
    pub framework_assemblies: BTreeMap<FrameworkProfile, Vec<String>>,
    pub source_files: Vec<PathBuf>,
    pub shared_files: Vec<PathBuf>,
    pub project_file_path: PathBuf,
}

impl Project {
    /// The effective dependency set for framework `f`: shared ∪ per-framework[f]
    /// (spec §3).
    #[must_use]
    pub fn dependencies_for(&self, framework: &FrameworkProfile) -> Vec<&Dependency> {
        let mut deps: Vec<&Dependency> = self.shared_dependencies.iter().collect();
        if let Some(extra) = self.per_framework.get(framework) {
            deps.extend(extra.iter());
        }
        deps
    }

    /// All framework profiles this project targets, in declared order.
    #[must_use]
    pub fn frameworks(&self) -> Vec<FrameworkProfile> {
        self.per_framework.keys().cloned().collect()
    }

    /// Parse a manifest file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ManifestMissing { path: path.to_path_buf() });
        }
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            context: format!("reading manifest {}", path.display()),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse manifest JSON text. `path` is used only for error context and
    /// to derive the project name when the manifest omits `"name"`.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let doc: RawManifest = serde_json::from_str(text)
            .map_err(|source| Error::ManifestParse { path: path.to_path_buf(), source })?;

        let name = doc.name.clone().unwrap_or_else(|| {
            path.parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        });

        let version = match &doc.version {
            Some(v) => crate::version::Version::parse(v)?,
            None => crate::version::Version::new(0, 0, 0),
        };

        let shared_dependencies = parse_dependency_map(&doc.dependencies);

        let mut per_framework = IndexMap::new();
        let mut framework_assemblies = BTreeMap::new();
        for (moniker, entry) in &doc.frameworks {
            let profile = FrameworkProfile::parse_moniker(moniker);
            per_framework.insert(profile.clone(), parse_dependency_map(&entry.dependencies));
            framework_assemblies.insert(profile, entry.framework_assemblies.clone());
        }

        Ok(Self {
            name,
            version,
            entry_point: doc.entry_point,
            commands: doc.commands,
            shared_dependencies,
            per_framework,
            framework_assemblies,
            source_files: Vec::new(),
            shared_files: Vec::new(),
            project_file_path: path.to_path_buf(),
        })
    }
}

fn parse_dependency_map(raw: &BTreeMap<String, RawDependencyValue>) -> Vec<Dependency> {
    raw.iter()
        .map(|(name, value)| {
            let (version_raw, kind) = match value {
                RawDependencyValue::Version(v) => (v.clone(), DependencyKind::Default),
                RawDependencyValue::Detailed { version, dep_type } => (
                    version.clone().unwrap_or_else(|| "*".to_string()),
                    match dep_type.as_deref() {
                        Some("build") => DependencyKind::Build,
                        _ => DependencyKind::Default,
                    },
                ),
            };
            let range = VersionRange::parse(&version_raw).unwrap_or_else(|_| VersionRange::any());
            Dependency::new(LibraryRange::new(name.clone(), range), kind)
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: Option<String>,
    version: Option<String>,
    #[serde(rename = "entryPoint", default)]
    entry_point: Option<String>,
    #[serde(default)]
    commands: BTreeMap<String, String>,
    #[serde(default)]
    dependencies: BTreeMap<String, RawDependencyValue>,
    /// `IndexMap`, not `BTreeMap`: `serde_json`'s `preserve_order` feature
    /// only keeps declaration order through `serde_json::Value`, never
    /// through a `BTreeMap`, which always re-sorts by key (spec §4.5
    /// "frameworks in declared order").
    #[serde(default)]
    frameworks: IndexMap<String, RawFrameworkEntry>,
    #[serde(default)]
    #[allow(dead_code)]
    compilation_options: Option<serde_json::Value>,
    #[serde(default)]
    #[allow(dead_code)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    #[allow(dead_code)]
    exclude: Option<serde_json::Value>,
    #[serde(default)]
    #[allow(dead_code)]
    preprocess: Option<serde_json::Value>,
    #[serde(default)]
    #[allow(dead_code)]
    scripts: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawFrameworkEntry {
    #[serde(default)]
    dependencies: BTreeMap<String, RawDependencyValue>,
    #[serde(rename = "frameworkAssemblies", default)]
    framework_assemblies: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDependencyValue {
    Version(String),
    Detailed {
        version: Option<String>,
        #[serde(rename = "type")]
        dep_type: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_manifest() {
        let json = r#"{"name":"MyApp","version":"1.0.0","dependencies":{"A":"1.0"},"frameworks":{"net8.0":{}}}"#;
        let project = Project::parse(json, Path::new("/tmp/MyApp/project.json")).unwrap();
        assert_eq!(project.name, "MyApp");
        assert_eq!(project.shared_dependencies.len(), 1);
        assert_eq!(project.per_framework.len(), 1);
    }

    #[test]
    fn falls_back_to_directory_name_when_name_omitted() {
        let json = r#"{"version":"1.0.0"}"#;
        let project = Project::parse(json, Path::new("/tmp/Widgets/project.json")).unwrap();
        assert_eq!(project.name, "Widgets");
    }

    #[test]
    fn effective_dependencies_combine_shared_and_per_framework() {
        let json = r#"{
            "name":"App",
            "dependencies":{"Shared":"1.0"},
            "frameworks":{"net8.0":{"dependencies":{"Net8Only":"2.0"}}}
        }"#;
        let project = Project::parse(json, Path::new("/tmp/App/project.json")).unwrap();
        let profile = FrameworkProfile::parse_moniker("net8.0");
        let deps = project.dependencies_for(&profile);
        assert_eq!(deps.len(), 2);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let json = r#"{"name":"App","totallyUnknownKey":{"nested":true}}"#;
        assert!(Project::parse(json, Path::new("/tmp/App/project.json")).is_ok());
    }

    #[test]
    fn detailed_dependency_with_build_type() {
        let json = r#"{"name":"App","dependencies":{"Tool":{"version":"1.0","type":"build"}}}"#;
        let project = Project::parse(json, Path::new("/tmp/App/project.json")).unwrap();
        assert_eq!(project.shared_dependencies[0].kind, DependencyKind::Build);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let err = Project::load(Path::new("/nonexistent/project.json"));
        assert!(matches!(err, Err(Error::ManifestMissing { .. })));
    }

    #[test]
    fn frameworks_preserve_json_declaration_order_not_alphabetical() {
        let json = r#"{
            "name":"App",
            "frameworks":{"net8.0":{}, "netstandard2.0":{}, "net462":{}}
        }"#;
        let project = Project::parse(json, Path::new("/tmp/App/project.json")).unwrap();
        let monikers: Vec<String> = project.frameworks().iter().map(ToString::to_string).collect();
        assert_eq!(monikers, vec!["net8.0", "netstandard2.0", "net462"]);
    }
}

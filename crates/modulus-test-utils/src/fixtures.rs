//! Pre-built test fixtures: manifest JSON (spec §6 "Manifest format") and
//! remote-feed index JSON (the wire format `RemoteFeedProvider` consumes).

use serde_json::{json, Value};

/// Collection of pre-built test fixtures.
#[derive(Debug)]
pub struct Fixtures;

impl Fixtures {
    /// The smallest manifest `Project::parse` accepts: a name and a single
    /// framework, no dependencies.
    #[must_use]
    pub fn minimal_manifest_json() -> Value {
        json!({
            "name": "Minimal",
            "version": "1.0.0",
            "frameworks": { "net8.0": {} }
        })
    }

    /// A manifest with shared and per-framework dependencies, an entry
    /// point, and a `commands` table exercising the §6 variable grammar.
    #[must_use]
    pub fn manifest_with_dependencies_json() -> Value {
        json!({
            "name": "Acme.Widgets",
            "version": "2.3.0",
            "entryPoint": "Acme.Widgets",
            "commands": {
                "web": "Microsoft.Host --server %env:PORT% app.dll"
            },
            "dependencies": {
                "Acme.Core": "[1.0,2.0)"
            },
            "frameworks": {
                "net8.0": {
                    "dependencies": { "Acme.Net8Extras": "1.5.0" },
                    "frameworkAssemblies": ["System.Net.Http"]
                }
            }
        })
    }

    /// A manifest targeting two frameworks, to exercise per-framework
    /// dependency-set splitting in the lock file.
    #[must_use]
    pub fn multi_framework_manifest_json() -> Value {
        json!({
            "name": "Acme.Multi",
            "version": "1.0.0",
            "dependencies": { "Acme.Shared": "1.0.0" },
            "frameworks": {
                "net8.0": { "dependencies": { "Acme.Net8Only": "1.0.0" } },
                "netstandard2.1": {}
            }
        })
    }

    /// A feed index (`GET <feed>/<name>/index.json`) with a single version
    /// and no dependencies.
    #[must_use]
    pub fn feed_index_json(versions: &[(&str, &str)]) -> Value {
        let entries: Vec<Value> = versions
            .iter()
            .map(|(version, archive)| {
                json!({
                    "version": version,
                    "dependencies": {},
                    "archive": archive,
                })
            })
            .collect();
        json!({ "versions": entries })
    }

    /// A feed index entry carrying dependencies, for resolver-graph tests.
    #[must_use]
    pub fn feed_index_with_deps_json(version: &str, archive: &str, deps: &[(&str, &str)]) -> Value {
        let dependencies: serde_json::Map<String, Value> =
            deps.iter().map(|(name, range)| ((*name).to_string(), json!(range))).collect();
        json!({
            "versions": [{
                "version": version,
                "dependencies": Value::Object(dependencies),
                "archive": archive,
            }]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_manifest_parses_as_a_project() {
        let json = Fixtures::minimal_manifest_json().to_string();
        let project = modulus_core::Project::parse(&json, std::path::Path::new("/tmp/Minimal/project.json")).unwrap();
        assert_eq!(project.name, "Minimal");
        assert_eq!(project.frameworks().len(), 1);
    }

    #[test]
    fn feed_index_round_trips_version_and_archive() {
        let index = Fixtures::feed_index_json(&[("1.0.0", "https://example/a-1.0.0.zip")]);
        assert_eq!(index["versions"][0]["version"], "1.0.0");
    }
}

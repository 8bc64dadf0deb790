//! Temporary project directories for integration tests.
//!
//! Lays a project out the way `host`/`restore` expect to find one:
//! `<solution-root>/<assembly-name>/project.json`, so the same fixture
//! works whether a test drives the CLI's path-splitting or loads the
//! manifest directly.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use tokio::fs;

/// A temporary solution directory containing a single project.
#[derive(Debug)]
pub struct TempProject {
    dir: TempDir,
    assembly_name: String,
    project_dir: PathBuf,
    manifest_path: PathBuf,
    store_dir: PathBuf,
}

impl TempProject {
    /// Start building a project named `assembly_name`.
    #[must_use]
    pub fn new(assembly_name: impl Into<String>) -> TempProjectBuilder {
        TempProjectBuilder { assembly_name: assembly_name.into(), manifest: None }
    }

    /// The solution root (the project directory's parent).
    #[must_use]
    pub fn solution_root(&self) -> &Path {
        self.dir.path()
    }

    /// The project directory itself, `<solution-root>/<assembly-name>`.
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    #[must_use]
    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// A package store directory nested inside the temp dir, separate from
    /// the project, so installs don't collide with source files.
    #[must_use]
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Overwrite the manifest with new content.
    pub async fn write_manifest(&self, content: &Value) -> Result<()> {
        let text = serde_json::to_string_pretty(content)?;
        fs::write(&self.manifest_path, text).await.context("writing project.json")
    }

    /// Parse the manifest as a [`modulus_core::Project`].
    pub async fn load_project(&self) -> Result<modulus_core::Project> {
        let text = fs::read_to_string(&self.manifest_path).await.context("reading project.json")?;
        modulus_core::Project::parse(&text, &self.manifest_path).map_err(Into::into)
    }

    /// Create a file relative to the project directory, creating parent
    /// directories as needed.
    pub async fn create_file(&self, relative_path: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;
        Ok(path)
    }

    /// Whether a path relative to the project directory exists.
    pub async fn file_exists(&self, relative_path: &str) -> bool {
        fs::metadata(self.project_dir.join(relative_path)).await.is_ok()
    }
}

/// Builder for [`TempProject`].
#[derive(Debug)]
pub struct TempProjectBuilder {
    assembly_name: String,
    manifest: Option<Value>,
}

impl TempProjectBuilder {
    #[must_use]
    pub fn with_manifest(mut self, manifest: Value) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub async fn build(self) -> Result<TempProject> {
        let dir = tempdir().context("creating temp solution root")?;
        let project_dir = dir.path().join(&self.assembly_name);
        fs::create_dir_all(&project_dir).await.context("creating project directory")?;
        let store_dir = dir.path().join(".store");
        fs::create_dir_all(&store_dir).await.context("creating store directory")?;

        let manifest_path = project_dir.join(modulus_core::MANIFEST_FILE_NAME);
        let manifest = self.manifest.unwrap_or_else(|| crate::fixtures::Fixtures::minimal_manifest_json());
        let text = serde_json::to_string_pretty(&manifest)?;
        fs::write(&manifest_path, text).await.context("writing project.json")?;

        Ok(TempProject { dir, assembly_name: self.assembly_name, project_dir, manifest_path, store_dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixtures;

    #[tokio::test]
    async fn default_manifest_is_minimal_and_loadable() {
        let project = TempProject::new("Widgets").build().await.unwrap();
        let parsed = project.load_project().await.unwrap();
        assert_eq!(parsed.name, "Minimal");
    }

    #[tokio::test]
    async fn custom_manifest_round_trips() {
        let project = TempProject::new("Acme.Widgets").with_manifest(Fixtures::manifest_with_dependencies_json()).build().await.unwrap();
        let parsed = project.load_project().await.unwrap();
        assert_eq!(parsed.name, "Acme.Widgets");
        assert_eq!(parsed.shared_dependencies.len(), 1);
    }

    #[tokio::test]
    async fn layout_matches_solution_root_join_assembly_name_convention() {
        let project = TempProject::new("Acme.Widgets").build().await.unwrap();
        assert_eq!(project.project_dir(), project.solution_root().join("Acme.Widgets"));
    }
}

//! The restore driver (spec §4.6, C8): discover -> hooks -> walk -> install
//! -> lock write -> hooks, pulled out of a CLI command handler into its own
//! library crate since it's named as a standalone core component (spec §1),
//! following an `install.rs`/`update.rs`-style orchestration shape
//! (lock-presence branch, parallel download pool, progress-free here since
//! presentation is the CLI's concern).

use crate::classify::classify;
use crate::discover::{discover_manifests, normalise_root, synthesize_install_one};
use crate::error::{Result, RestoreError};
use crate::hooks::{Hook, ScriptRunner};
use modulus_core::{FrameworkProfile, LibraryRange, Project, Version, VersionRange};
use modulus_lockfile::{FrameworkKey, LibraryKey, LockFile, LockedLibrary};
use modulus_providers::{Candidate, FrameworkReferenceProvider, GacProvider, LocalStoreProvider, ProjectProvider, ProviderKind, ProviderToken, RemoteFeedProvider};
use modulus_resolver::{create_graph_node, GraphNode, WalkContext, WarningSink};
use modulus_store::Store;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// User-facing restore knobs, mirroring the `restore` CLI surface (spec
/// §6) minus argument parsing itself.
#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    pub extra_sources: Vec<url::Url>,
    pub fallback_sources: Vec<url::Url>,
    pub no_cache: bool,
    pub ignore_failed_sources: bool,
    /// `--lock`: write the resulting lock file with `locked = true`.
    pub force_locked: bool,
    /// `--unlock`: force a fresh walk even if a valid locked lock exists.
    pub force_unlock: bool,
}

/// What a successful [`RestoreDriver::restore`] produced.
#[derive(Debug, Clone, Default)]
pub struct RestoreOutcome {
    pub lock_written: bool,
    pub installed: Vec<(String, Version)>,
    pub warnings: Vec<String>,
}

pub struct RestoreDriver {
    store: Store,
    http_client: reqwest::Client,
    script_runner: Arc<dyn ScriptRunner>,
    cancelled: Arc<AtomicBool>,
}

impl RestoreDriver {
    #[must_use]
    pub fn new(store: Store, http_client: reqwest::Client, script_runner: Arc<dyn ScriptRunner>) -> Self {
        Self { store, http_client, script_runner, cancelled: Arc::new(AtomicBool::new(false)) }
    }

    /// Share a cancellation flag with the caller (e.g. wired to `SIGINT` by
    /// `modulus-cli`); observed between phases (spec §5).
    #[must_use]
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancelled.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(RestoreError::Cancelled);
        }
        Ok(())
    }

    fn remote_providers(&self, options: &RestoreOptions) -> Vec<RemoteFeedProvider> {
        options
            .extra_sources
            .iter()
            .chain(options.fallback_sources.iter())
            .cloned()
            .map(|url| RemoteFeedProvider::new(url, self.http_client.clone(), options.no_cache, options.ignore_failed_sources))
            .collect()
    }

    fn build_context(&self, solution_root: &Path, remote_providers: Vec<RemoteFeedProvider>, pinned: Option<BTreeMap<String, Version>>) -> WalkContext {
        WalkContext {
            project_provider: ProjectProvider::new(solution_root),
            local_provider: LocalStoreProvider::new(self.store.clone()),
            framework_provider: FrameworkReferenceProvider::default(),
            gac_provider: GacProvider::default(),
            remote_providers,
            compatibility: modulus_core::CompatibilityTable::with_standard_lineage(),
            ignore_failed_sources: false,
            pinned: pinned.map(|m| m.into_iter().collect()),
            cancelled: self.cancelled.clone(),
            tokio_handle: tokio::runtime::Handle::current(),
            warnings: Arc::new(WarningSink::default()),
            memo: dashmap::DashMap::new(),
        }
    }

    /// `restore(path)` (spec §4.6), steps 1-9.
    pub async fn restore(&self, path: &Path, options: &RestoreOptions) -> Result<RestoreOutcome> {
        // Step 1: normalise path.
        let root = normalise_root(path)?;

        // Step 2: discover manifests. Install-one-package mode has its own
        // entry point (`install_one`); a plain restore always has at least
        // one manifest.
        let projects = discover_manifests(&root)?;

        let mut aggregate = RestoreOutcome::default();
        for project in &projects {
            let outcome = self.restore_one_project(&root, project, options).await?;
            aggregate.lock_written |= outcome.lock_written;
            aggregate.installed.extend(outcome.installed);
            aggregate.warnings.extend(outcome.warnings);
        }
        Ok(aggregate)
    }

    async fn restore_one_project(&self, solution_root: &Path, project: &Project, options: &RestoreOptions) -> Result<RestoreOutcome> {
        let project_dir = project.project_file_path.parent().unwrap_or(solution_root).to_path_buf();
        let lock_path = project_dir.join(modulus_lockfile::LOCK_FILE_NAME);

        // Step 3: prerestore hook.
        self.script_runner.run(Hook::PreRestore, &project.commands, &project_dir).await?;

        self.check_cancelled()?;

        // Step 4: classify the existing lock.
        let (state, existing_lock) = classify(&lock_path, project);
        let lock_pinned = state.is_lock_pinned() && !options.force_unlock;

        let pinned_versions = if lock_pinned {
            existing_lock.as_ref().map(pinned_versions_from_lock)
        } else {
            None
        };

        let remote_providers = if lock_pinned { Vec::new() } else { self.remote_providers(options) };
        let ctx = self.build_context(solution_root, remote_providers, pinned_versions);

        // Step 5: walk each framework profile, parallel (sequential
        // fallback inside `walk_all_frameworks`).
        let walked = self.walk_all_frameworks(&ctx, project).await?;

        self.check_cancelled()?;

        // Step 6: dedup graph items by (name, version); split into the
        // install set (remote origin) and everything else.
        let mut all_nodes = Vec::new();
        for nodes in walked.values() {
            all_nodes.extend(nodes.iter().flat_map(GraphNode::iter));
        }
        report_unresolved(&all_nodes)?;

        let deduped = dedup_items(&all_nodes);

        // Lock-pinned mode trusts the store's own layout for *which*
        // versions to use, but not that the bytes underneath are still
        // what was installed: a locally-resolved candidate's sidecar sha
        // must still match what the lock recorded (spec §8 property 5,
        // scenario S5).
        if lock_pinned {
            if let Some(lock) = &existing_lock {
                verify_locked_shas(&self.store, &deduped, lock)?;
            }
        }

        let to_install: Vec<_> = deduped.values().filter(|c| c.kind == ProviderKind::Remote).cloned().collect();

        // Step 7: install in parallel (sequential fallback), idempotent,
        // sha-verified.
        self.check_cancelled()?;
        let installed_shas = self.install_all(&to_install, &ctx.remote_providers).await?;
        let installed = installed_shas.iter().map(|(name, version, _)| (name.clone(), version.clone())).collect();

        let warnings = ctx.warnings.drain();

        // Step 8: write a fresh lock if the original was absent/stale and
        // resolution succeeded.
        let mut lock_written = false;
        if !lock_pinned {
            let remote_shas: BTreeMap<(String, Version), modulus_core::IntegrityHash> =
                installed_shas.into_iter().map(|(name, version, sha)| ((name, version), sha)).collect();
            let lock = build_lock_file(project, &walked, &deduped, &remote_shas, options.force_locked);
            modulus_lockfile::write_atomic(&lock_path, &lock)?;
            lock_written = true;
        }

        // Step 9: postrestore then prepare hooks.
        self.script_runner.run(Hook::PostRestore, &project.commands, &project_dir).await?;
        self.script_runner.run(Hook::Prepare, &project.commands, &project_dir).await?;

        Ok(RestoreOutcome { lock_written, installed, warnings })
    }

    async fn walk_all_frameworks(&self, ctx: &WalkContext, project: &Project) -> Result<BTreeMap<FrameworkProfile, Vec<GraphNode>>> {
        let frameworks = project.frameworks();
        if frameworks.is_empty() {
            return Ok(BTreeMap::new());
        }

        // `create_graph_node` must run from a blocking context (it bridges
        // to async remote calls via `Handle::block_on`); `block_in_place`
        // hands the current tokio worker thread over to blocking work
        // in place, so `ctx`/`project` can stay borrowed rather than
        // needing to be moved into a `'static` task.
        tokio::task::block_in_place(|| {
            let parallel_safe = modulus_platform::Capabilities::current().parallel_restore_safe();
            let work = |framework: FrameworkProfile| -> Result<(FrameworkProfile, Vec<GraphNode>)> {
                let deps = project.dependencies_for(&framework);
                let ranges: Vec<LibraryRange> = deps.into_iter().map(|d| d.range.clone()).collect();
                let nodes: Result<Vec<GraphNode>> = if parallel_safe {
                    ranges.into_par_iter().map(|range| Ok(create_graph_node(ctx, &range, &framework)?)).collect()
                } else {
                    ranges.into_iter().map(|range| Ok(create_graph_node(ctx, &range, &framework)?)).collect()
                };
                Ok((framework, nodes?))
            };

            let results: Vec<Result<(FrameworkProfile, Vec<GraphNode>)>> = if parallel_safe {
                frameworks.into_par_iter().map(work).collect()
            } else {
                frameworks.into_iter().map(work).collect()
            };

            let mut out = BTreeMap::new();
            for result in results {
                let (framework, nodes) = result?;
                out.insert(framework, nodes);
            }
            Ok(out)
        })
    }

    async fn install_all(&self, candidates: &[Candidate], remote_providers: &[RemoteFeedProvider]) -> Result<Vec<(String, Version, modulus_core::IntegrityHash)>> {
        let mut installed = Vec::new();
        // Sequential by provider-feed affinity is fine here: spec §4.4 only
        // requires "in parallel (sequential fallback)", and a download is
        // already internally async/concurrent via the shared http client;
        // this loop drives `N` concurrent installs via `futures`-less
        // sequential awaiting only when the capability flag forbids
        // concurrency, matching `walk`'s own fallback switch.
        let parallel_safe = modulus_platform::Capabilities::current().parallel_restore_safe();

        if parallel_safe {
            let tasks: Vec<_> = candidates
                .iter()
                .map(|candidate| self.install_one_candidate(candidate, remote_providers))
                .collect();
            let results = futures_util::future::join_all(tasks).await;
            for result in results {
                if let Some(entry) = result? {
                    installed.push(entry);
                }
            }
        } else {
            for candidate in candidates {
                if let Some(entry) = self.install_one_candidate(candidate, remote_providers).await? {
                    installed.push(entry);
                }
            }
        }
        Ok(installed)
    }

    async fn install_one_candidate(&self, candidate: &Candidate, remote_providers: &[RemoteFeedProvider]) -> Result<Option<(String, Version, modulus_core::IntegrityHash)>> {
        let ProviderToken::Remote { feed_url, .. } = &candidate.token else {
            return Ok(None);
        };
        let provider = remote_providers
            .iter()
            .find(|p| p.feed_url() == feed_url.as_ref())
            .ok_or_else(|| RestoreError::UnknownFeed { url: feed_url.to_string() })?;

        let downloaded = provider.materialise(&candidate.token).await?;
        let extractor = modulus_fetch::ArchiveExtractor;
        let installed = modulus_store::install(&self.store, &candidate.name, &candidate.version, &downloaded.bytes, &extractor, Some(&downloaded.sha))?;

        if installed.newly_installed {
            self.write_sidecar_metadata(&candidate.name, &candidate.version, &downloaded.sha, &candidate.token)?;
        }

        Ok(Some((candidate.name.clone(), candidate.version.clone(), installed.sha)))
    }

    fn write_sidecar_metadata(&self, name: &str, version: &Version, sha: &modulus_core::IntegrityHash, token: &ProviderToken) -> Result<()> {
        let ProviderToken::Remote { dependencies, .. } = token else { return Ok(()) };

        let package = modulus_store::Package {
            name: name.to_string(),
            version: version.clone(),
            sha: sha.clone(),
            files: Vec::new(),
            framework_assemblies: BTreeMap::new(),
            dependency_sets: BTreeMap::from([(None, dependencies.clone())]),
            package_assembly_references: BTreeMap::new(),
        };
        let metadata = modulus_providers::metadata::to_metadata(&package);
        let path = self.store.package_dir(name, version).join(".modulus-package.json");
        let text = serde_json::to_string_pretty(&metadata).map_err(|source| RestoreError::Lockfile(modulus_lockfile::LockfileError::Serialize(source)))?;
        std::fs::write(&path, text).map_err(|source| RestoreError::Store(modulus_store::StoreError::Io { context: format!("writing {}", path.display()), source }))?;
        Ok(())
    }

    /// Install-one-package mode (spec §4.6): synthesises a single-
    /// dependency project, shares the walk/install pipeline, never writes
    /// a lock, and returns the installed root path.
    pub async fn install_one(&self, id: &str, range: VersionRange, options: &RestoreOptions) -> Result<PathBuf> {
        let project = synthesize_install_one(id, range);
        let framework = FrameworkProfile::new("any", "0.0");
        let mut with_framework = project.clone();
        with_framework.per_framework.insert(framework.clone(), Vec::new());

        let remote_providers = self.remote_providers(options);
        let solution_root = std::env::temp_dir();
        let ctx = self.build_context(&solution_root, remote_providers, None);

        let walked = self.walk_all_frameworks(&ctx, &with_framework).await?;
        let all_nodes: Vec<&GraphNode> = walked.values().flat_map(|nodes| nodes.iter().flat_map(GraphNode::iter)).collect();
        report_unresolved(&all_nodes)?;

        let deduped = dedup_items(&all_nodes);
        let to_install: Vec<_> = deduped.values().filter(|c| c.kind == ProviderKind::Remote).cloned().collect();
        self.install_all(&to_install, &ctx.remote_providers).await?;

        let (name, version) = deduped
            .keys()
            .find(|(name, _)| name == id)
            .cloned()
            .ok_or_else(|| RestoreError::Unresolved { name: id.to_string(), range: String::new(), suggestion: None })?;
        Ok(self.store.package_dir(&name, &version))
    }
}

/// The locked version of every named dependency in `lock`, used to pin the
/// walker in lock-pinned mode (spec §4.3 "Lock-file mode").
fn pinned_versions_from_lock(lock: &LockFile) -> BTreeMap<String, Version> {
    lock.libraries.keys().map(|key| (key.name.clone(), key.version.clone())).collect()
}

fn report_unresolved(nodes: &[&GraphNode]) -> Result<()> {
    for node in nodes {
        if node.item.is_none() {
            return Err(RestoreError::Unresolved {
                name: node.range.name.clone(),
                range: node.range.canonical_form(),
                suggestion: node.suggestion.clone(),
            });
        }
    }
    Ok(())
}

/// Dedup resolved graph items by `(name, version)` (spec §4.6 step 6);
/// first writer wins, matching the package store's own install semantics.
fn dedup_items(nodes: &[&GraphNode]) -> BTreeMap<(String, Version), Candidate> {
    let mut out: BTreeMap<(String, Version), Candidate> = BTreeMap::new();
    for node in nodes {
        let Some(item) = &node.item else { continue };
        let key = (item.library_name.clone(), item.library_version.clone());
        out.entry(key).or_insert_with(|| Candidate {
            name: item.library_name.clone(),
            version: item.library_version.clone(),
            kind: item.provider,
            token: item.token.clone(),
        });
    }
    out
}

/// Locked-mode integrity check (spec §8 property 5, scenario S5): every
/// locally-resolved candidate's sha is recomputed from the archive bytes
/// still sitting on disk (spec §3 data model) and compared against what the
/// lock recorded, rather than trusting the sidecar's own recorded sha
/// string — a tampered archive whose sidecar was edited in lockstep, or
/// corruption of the archive bytes themselves, is still caught this way.
/// Candidates from any other provider kind carry no archive to recompute
/// from, so only `ProviderKind::Local` is checked.
fn verify_locked_shas(store: &modulus_store::Store, deduped: &BTreeMap<(String, Version), Candidate>, lock: &LockFile) -> Result<()> {
    for ((name, version), candidate) in deduped {
        if candidate.kind != ProviderKind::Local {
            continue;
        }
        let key = LibraryKey { name: name.clone(), version: version.clone() };
        let Some(locked) = lock.libraries.get(&key) else { continue };
        let actual = modulus_store::recompute_sha(store, name, version)?;
        if locked.sha != actual {
            return Err(RestoreError::LockedShaMismatch {
                name: name.clone(),
                version: version.clone(),
                expected: locked.sha.as_str().to_string(),
                actual: actual.as_str().to_string(),
            });
        }
    }
    Ok(())
}

/// Build the lock file written after a fresh (non-pinned) walk (spec
/// §4.5): `framework_dependencies` mirrors the manifest's own declared
/// strings (so a later `validate()` against the same manifest is clean by
/// construction); `libraries` covers every distinct `(name, version)`
/// reached by any framework's walk.
fn build_lock_file(
    project: &Project,
    walked: &BTreeMap<FrameworkProfile, Vec<GraphNode>>,
    deduped: &BTreeMap<(String, Version), Candidate>,
    remote_shas: &BTreeMap<(String, Version), modulus_core::IntegrityHash>,
    force_locked: bool,
) -> LockFile {
    let mut lock = LockFile::new(force_locked);

    lock.framework_dependencies.insert(
        FrameworkKey::Shared,
        project.shared_dependencies.iter().map(|d| d.range.canonical_form()).collect(),
    );
    for framework in project.frameworks() {
        let strings = project
            .per_framework
            .get(&framework)
            .into_iter()
            .flatten()
            .map(|d| d.range.canonical_form())
            .collect();
        lock.framework_dependencies.insert(FrameworkKey::Profile(framework), strings);
    }

    for (name, version) in deduped.keys() {
        let key = LibraryKey { name: name.clone(), version: version.clone() };
        let sha = remote_shas
            .get(&(name.clone(), version.clone()))
            .cloned()
            .unwrap_or_else(|| modulus_core::IntegrityHash::from_base64(String::new()));
        lock.libraries.entry(key).or_insert_with(|| LockedLibrary {
            name: name.clone(),
            version: version.clone(),
            sha,
            framework_assemblies: BTreeMap::new(),
            dependency_sets: BTreeMap::new(),
            package_assembly_references: BTreeMap::new(),
        });
    }

    for (framework, nodes) in walked {
        for node in nodes.iter().flat_map(GraphNode::iter) {
            let Some(item) = &node.item else { continue };
            let key = LibraryKey { name: item.library_name.clone(), version: item.library_version.clone() };
            let Some(entry) = lock.libraries.get_mut(&key) else { continue };

            if let ProviderToken::Local(package) = &item.token {
                entry.sha = package.sha.clone();
            }

            entry
                .dependency_sets
                .entry(FrameworkKey::Profile(framework.clone()))
                .or_insert_with(|| item.dependencies.iter().map(LibraryRange::canonical_form).collect());
        }
    }

    lock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_versions_read_name_and_version_from_lock_keys() {
        let mut lock = LockFile::new(true);
        lock.libraries.insert(
            LibraryKey { name: "Acme".into(), version: Version::new(1, 0, 0) },
            LockedLibrary {
                name: "Acme".into(),
                version: Version::new(1, 0, 0),
                sha: modulus_core::IntegrityHash::from_base64(String::new()),
                framework_assemblies: BTreeMap::new(),
                dependency_sets: BTreeMap::new(),
                package_assembly_references: BTreeMap::new(),
            },
        );
        let pinned = pinned_versions_from_lock(&lock);
        assert_eq!(pinned.get("Acme"), Some(&Version::new(1, 0, 0)));
    }
}

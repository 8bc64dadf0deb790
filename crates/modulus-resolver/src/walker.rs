//! The graph walker (spec §4.3, C6): multi-source, parallel, version-
//! constrained graph construction with tie-break rules and no version
//! unification across transitive edges.

use crate::context::{Group, WalkContext};
use crate::error::{ResolverError, Result};
use crate::types::{GraphItem, GraphNode};
use modulus_core::{FrameworkProfile, LibraryRange, VersionRange};
use modulus_providers::{Candidate, ProviderToken};
use rayon::prelude::*;

fn case_mismatch(requested: &str, found: &str) -> bool {
    requested != found && requested.eq_ignore_ascii_case(found)
}

/// Runs `f` over `items`, in parallel via rayon unless the host's
/// capability flag says parallel restore is unsafe here (spec §4.3, §5
/// "known hazard... falls back to sequential").
fn map_maybe_parallel<T, R, F>(items: Vec<T>, parallel_safe: bool, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    if parallel_safe {
        items.into_par_iter().map(f).collect()
    } else {
        items.into_iter().map(f).collect()
    }
}

/// Highest version amongst candidates, per spec's "choose the highest
/// satisfying version" tie-break (§4.3 steps 2/3, §8 property 7).
fn highest(mut candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.sort_by(|a, b| a.version.cmp(&b.version));
    candidates.pop()
}

/// The effective range to query local/remote providers with: pinned to
/// `[version, version]` when resolving under a locked lock file (spec §4.3
/// "Lock-file mode").
fn effective_range(ctx: &WalkContext, range: &LibraryRange) -> LibraryRange {
    match ctx.pinned.as_ref().and_then(|p| p.get(&range.name)) {
        Some(locked_version) => LibraryRange::new(range.name.clone(), VersionRange::exact(locked_version.clone())),
        None => range.clone(),
    }
}

/// `create_graph_node` from spec §4.3: project -> local -> (conditionally)
/// remote -> unresolved, then recurse over the winning candidate's
/// dependencies.
pub fn create_graph_node(ctx: &WalkContext, range: &LibraryRange, framework: &FrameworkProfile) -> Result<GraphNode> {
    if ctx.is_cancelled() {
        return Err(ResolverError::Cancelled);
    }

    let canonical = range.canonical_form();

    // Step 1: project providers (at most one candidate by name).
    let project_hit = ctx.memo_get_or_insert_with(Group::Project, canonical.clone(), framework.clone(), || {
        ctx.project_provider.find_library_range(range).ok().and_then(|mut v| v.pop())
    });

    let chosen = if let Some(candidate) = project_hit {
        Some(candidate)
    } else {
        // Step 2: local-store + framework-reference + GAC, combined as the
        // spec's single "local" group.
        let local_range = effective_range(ctx, range);
        let local_hit = ctx.memo_get_or_insert_with(Group::Local, canonical.clone(), framework.clone(), || {
            let mut all = ctx.local_provider.find_library_range(&local_range);
            all.extend(ctx.framework_provider.find_library_range(range, framework, &ctx.compatibility));
            all.extend(ctx.gac_provider.find_library_range(range));
            highest(all)
        });

        if let Some(candidate) = local_hit {
            Some(candidate)
        } else if ctx.accept_remote() && !ctx.remote_providers.is_empty() {
            // Step 3: remote feeds, queried in declared order; errors are
            // warnings under --ignore-failed-sources, fatal otherwise.
            let remote_key = (Group::Remote, canonical.clone(), framework.clone());
            if let Some(cached) = ctx.memo.get(&remote_key) {
                cached.clone()
            } else {
                let remote_range = effective_range(ctx, range);
                let mut found = Vec::new();
                for provider in &ctx.remote_providers {
                    match ctx.tokio_handle.block_on(provider.find_library_range(&remote_range)) {
                        Ok(candidates) => found.extend(candidates),
                        Err(source) if ctx.ignore_failed_sources => {
                            ctx.warnings.push(format!("feed {} failed: {source}", provider.feed_url()));
                        }
                        Err(source) => {
                            return Err(ResolverError::FeedFailure { url: provider.feed_url().to_string(), source });
                        }
                    }
                }
                let winner = highest(found);
                ctx.memo.insert(remote_key, winner.clone());
                winner
            }
        } else {
            None
        }
    };

    let Some(candidate) = chosen else {
        return Ok(GraphNode { range: range.clone(), item: None, deps: Vec::new(), suggestion: None });
    };

    if case_mismatch(&range.name, &candidate.name) {
        return Ok(GraphNode {
            range: range.clone(),
            item: None,
            deps: Vec::new(),
            suggestion: Some(candidate.name.clone()),
        });
    }

    let dependencies = modulus_providers::get_dependencies(&candidate.token, framework, Some(&ctx.project_provider), &ctx.compatibility)?;

    let parallel_safe = modulus_platform::Capabilities::current().parallel_restore_safe();
    let child_results: Vec<Result<GraphNode>> = map_maybe_parallel(dependencies.clone(), parallel_safe, |child_range| create_graph_node(ctx, &child_range, framework));
    let mut deps = Vec::with_capacity(child_results.len());
    for child in child_results {
        deps.push(child?);
    }

    let item = GraphItem {
        library_name: candidate.name.clone(),
        library_version: candidate.version.clone(),
        provider: candidate.kind,
        token: candidate.token,
        dependencies,
    };

    Ok(GraphNode { range: range.clone(), item: Some(item), deps, suggestion: None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use modulus_providers::{GacProvider, LocalStoreProvider, ProjectProvider};
    use modulus_store::Store;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    fn empty_context(tmp_root: &std::path::Path) -> WalkContext {
        WalkContext {
            project_provider: ProjectProvider::new(tmp_root),
            local_provider: LocalStoreProvider::new(Store::new(tmp_root.join("store"))),
            framework_provider: modulus_providers::FrameworkReferenceProvider::default(),
            gac_provider: GacProvider::default(),
            remote_providers: Vec::new(),
            compatibility: modulus_core::CompatibilityTable::with_standard_lineage(),
            ignore_failed_sources: false,
            pinned: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            tokio_handle: tokio::runtime::Handle::try_current().unwrap_or_else(|_| {
                Box::leak(Box::new(tokio::runtime::Runtime::new().unwrap())).handle().clone()
            }),
            warnings: Arc::new(crate::context::WarningSink::default()),
            memo: dashmap::DashMap::new(),
        }
    }

    #[test]
    fn unresolved_range_produces_item_none() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = empty_context(dir.path());
        let framework = FrameworkProfile::new("net", "8.0");
        let range = LibraryRange::new("Ghost", VersionRange::any());

        let node = create_graph_node(&ctx, &range, &framework).unwrap();
        assert!(!node.is_resolved());
        assert!(node.suggestion.is_none());
    }
}

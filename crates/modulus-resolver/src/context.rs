//! Everything a walk needs: the provider groups, the framework being
//! resolved for, the accept-remote predicate, and a per-run memoisation
//! cache (spec §4.3).

use dashmap::DashMap;
use modulus_core::{CompatibilityTable, FrameworkProfile, Version};
use modulus_providers::{Candidate, FrameworkReferenceProvider, GacProvider, LocalStoreProvider, ProjectProvider, RemoteFeedProvider};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Which of the three ordered provider groups (spec §4.3) a memoised
/// decision belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Project,
    Local,
    Remote,
}

/// Collects warnings surfaced during a walk (e.g. a demoted feed failure,
/// spec §5 "ignore-failed-sources") without aborting it.
#[derive(Debug, Default)]
pub struct WarningSink(Mutex<Vec<String>>);

impl WarningSink {
    pub fn push(&self, message: String) {
        tracing::warn!("{message}");
        self.0.lock().push(message);
    }

    #[must_use]
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut self.0.lock())
    }
}

/// Per-run walk context: provider groups, remote-accept policy, lock
/// pinning, and the worker-pool/cancellation knobs from spec §5.
pub struct WalkContext {
    pub project_provider: ProjectProvider,
    pub local_provider: LocalStoreProvider,
    pub framework_provider: FrameworkReferenceProvider,
    pub gac_provider: GacProvider,
    pub remote_providers: Vec<RemoteFeedProvider>,
    /// The framework compatibility relation (spec §3) used to match a
    /// dependency's declared framework against the consumer's framework,
    /// rather than requiring bare equality.
    pub compatibility: CompatibilityTable,
    pub ignore_failed_sources: bool,
    /// When `Some`, the walker is in lock-pinned mode: `accept_predicate`
    /// is always false and each range is pinned to the locked version
    /// (spec §4.3 "Lock-file mode").
    pub pinned: Option<HashMap<String, Version>>,
    pub cancelled: Arc<AtomicBool>,
    pub tokio_handle: tokio::runtime::Handle,
    pub warnings: Arc<WarningSink>,
    pub memo: DashMap<(Group, String, FrameworkProfile), Option<Candidate>>,
}

impl WalkContext {
    /// Whether network providers should be consulted at all in this run:
    /// false unconditionally in lock-pinned mode (spec §4.3).
    #[must_use]
    pub fn accept_remote(&self) -> bool {
        self.pinned.is_none()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Read-through memo cache, keyed by `(provider-group, range-canonical-
    /// form, framework)` so identical sub-ranges are walked once (spec
    /// §4.3).
    pub fn memo_get_or_insert_with<F>(&self, group: Group, range_canonical_form: String, framework: FrameworkProfile, f: F) -> Option<Candidate>
    where
        F: FnOnce() -> Option<Candidate>,
    {
        let key = (group, range_canonical_form, framework);
        if let Some(existing) = self.memo.get(&key) {
            return existing.clone();
        }
        let computed = f();
        self.memo.insert(key, computed.clone());
        computed
    }
}

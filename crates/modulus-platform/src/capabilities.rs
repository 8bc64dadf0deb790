//! Capability flags the rest of the workspace consults instead of
//! sprinkling `cfg(target_os = ...)` through business logic (spec §4.3, §5:
//! "falls back to sequential on a platform capability flag").

use once_cell::sync::Lazy;

/// Runtime capability snapshot, computed once per process.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    parallel_restore_safe: bool,
    logical_cpus: usize,
}

static CAPABILITIES: Lazy<Capabilities> = Lazy::new(Capabilities::detect);

impl Capabilities {
    fn detect() -> Self {
        let logical_cpus = num_cpus::get();
        // Some sandboxed / containerised environments report a CPU count
        // but cripple concurrent file I/O badly enough that a bounded
        // worker pool is actively worse than a sequential walk. We key
        // this off an explicit escape hatch rather than guessing from
        // `cfg(target_os)`, since the failure mode is about the host
        // environment, not the OS.
        let parallel_restore_safe = std::env::var_os("MODULUS_FORCE_SEQUENTIAL").is_none();
        Self { parallel_restore_safe, logical_cpus }
    }

    /// Global capability snapshot for this process.
    #[must_use]
    pub fn current() -> Self {
        *CAPABILITIES
    }

    /// Whether the graph walker and restore driver may use a bounded
    /// worker pool. When `false`, callers must fall back to a sequential
    /// walk (spec §4.3, §5).
    #[must_use]
    pub fn parallel_restore_safe(self) -> bool {
        self.parallel_restore_safe
    }

    /// Suggested worker pool size: logical CPU count, at least 1.
    #[must_use]
    pub fn worker_count(self) -> usize {
        self.logical_cpus.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_count_is_never_zero() {
        assert!(Capabilities::current().worker_count() >= 1);
    }
}

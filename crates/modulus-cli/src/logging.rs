//! Logger bootstrap (spec §6 "`TRACE` environment variable", §9 "the
//! logger's verbosity is process-wide but read-only after the first
//! access"). `TRACE=0` (or unset) is warnings-only, `1` is info, `2` or
//! higher is debug; `RUST_LOG` still overrides per-module if set.

use std::sync::OnceLock;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INITIALISED: OnceLock<()> = OnceLock::new();

fn trace_level() -> Level {
    match std::env::var("TRACE").ok().and_then(|raw| raw.trim().parse::<u8>().ok()).unwrap_or(0) {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Initialise the global subscriber exactly once; later calls are no-ops,
/// matching the "read-only after first access" invariant.
pub fn init() {
    INITIALISED.get_or_init(|| {
        let filter = EnvFilter::builder().with_default_directive(trace_level().into()).from_env_lossy();
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    });
}

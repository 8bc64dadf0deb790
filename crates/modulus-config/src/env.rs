//! Environment-variable overlay, applied after `--configfile` and before
//! CLI flags (spec §6).

/// Environment variables recognised directly by the config layer. Others
/// named in spec §6 (`TRACE`, `COMPILATION_SERVER_PORT`, `K_AUTHOR`) are
/// read where they're used (logging setup, compiler, restore hooks) rather
/// than threaded through here.
#[derive(Debug, Clone, Default)]
pub struct EnvOverlay {
    pub sources: Option<Vec<String>>,
    pub cache_dir: Option<std::path::PathBuf>,
    pub store_dir: Option<std::path::PathBuf>,
}

impl EnvOverlay {
    #[must_use]
    pub fn from_process_env() -> Self {
        Self {
            sources: std::env::var("MODULUS_SOURCES")
                .ok()
                .map(|raw| raw.split(',').map(str::trim).map(str::to_string).collect()),
            cache_dir: std::env::var_os("MODULUS_CACHE_DIR").map(std::path::PathBuf::from),
            store_dir: std::env::var_os("MODULUS_STORE_DIR").map(std::path::PathBuf::from),
        }
    }
}

//! Resolved configuration model (spec §6 "(added) `modulus-config`").

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single feed source URL, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Source(pub url::Url);

/// The `--configfile` JSON document shape: `{ sources, fallback-sources,
/// cache-dir, store-dir }`. Every field is optional; absent fields fall
/// through to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(rename = "fallback-sources", default)]
    pub fallback_sources: Vec<String>,
    #[serde(rename = "cache-dir", default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(rename = "store-dir", default)]
    pub store_dir: Option<PathBuf>,
}

/// The fully merged, effective configuration used by the rest of the
/// workspace. Produced by [`crate::loader::ConfigLoader::resolve`].
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub sources: Vec<String>,
    pub fallback_sources: Vec<String>,
    pub cache_dir: PathBuf,
    pub store_dir: PathBuf,
}

impl ResolvedConfig {
    /// Built-in defaults before any layer is merged in.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            sources: Vec::new(),
            fallback_sources: Vec::new(),
            cache_dir: modulus_platform::dirs::default_cache_dir(),
            store_dir: modulus_platform::dirs::default_store_dir(),
        }
    }
}

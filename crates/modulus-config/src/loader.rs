//! Layered configuration loader: defaults -> `--configfile` -> environment
//! -> CLI overrides (later layers win), per spec §6.

use crate::env::EnvOverlay;
use crate::error::{ConfigError, Result};
use crate::model::{ConfigFile, ResolvedConfig};
use std::path::Path;

/// Explicit CLI-supplied overrides (the final, highest-priority layer).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub extra_sources: Vec<String>,
    pub extra_fallback_sources: Vec<String>,
    pub cache_dir: Option<std::path::PathBuf>,
    pub store_dir: Option<std::path::PathBuf>,
}

/// Builds a [`ResolvedConfig`] by merging layers in priority order.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    configfile: Option<ConfigFile>,
    env: EnvOverlay,
    cli: CliOverrides,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            configfile: None,
            env: EnvOverlay::from_process_env(),
            cli: CliOverrides::default(),
        }
    }

    /// Load and merge a `--configfile FILE` document.
    pub fn with_configfile(mut self, path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let parsed: ConfigFile = serde_json::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        self.configfile = Some(parsed);
        Ok(self)
    }

    #[must_use]
    pub fn with_cli_overrides(mut self, cli: CliOverrides) -> Self {
        self.cli = cli;
        self
    }

    /// Merge every layer: built-in defaults < `--configfile` < environment <
    /// CLI flags.
    #[must_use]
    pub fn resolve(self) -> ResolvedConfig {
        let mut config = ResolvedConfig::defaults();

        if let Some(file) = &self.configfile {
            if !file.sources.is_empty() {
                config.sources = file.sources.clone();
            }
            if !file.fallback_sources.is_empty() {
                config.fallback_sources = file.fallback_sources.clone();
            }
            if let Some(dir) = &file.cache_dir {
                config.cache_dir = dir.clone();
            }
            if let Some(dir) = &file.store_dir {
                config.store_dir = dir.clone();
            }
        }

        if let Some(sources) = &self.env.sources {
            config.sources = sources.clone();
        }
        if let Some(dir) = &self.env.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(dir) = &self.env.store_dir {
            config.store_dir = dir.clone();
        }

        config.sources.extend(self.cli.extra_sources.iter().cloned());
        config.fallback_sources.extend(self.cli.extra_fallback_sources.iter().cloned());
        if let Some(dir) = self.cli.cache_dir {
            config.cache_dir = dir;
        }
        if let Some(dir) = self.cli.store_dir {
            config.store_dir = dir;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_survive_with_no_layers() {
        let config = ConfigLoader::new().resolve();
        assert!(config.sources.is_empty());
    }

    #[test]
    fn configfile_layer_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modulus.config.json");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, r#"{{"sources":["https://feed.example/v1"]}}"#).unwrap();

        let config = ConfigLoader::new().with_configfile(&path).unwrap().resolve();
        assert_eq!(config.sources, vec!["https://feed.example/v1".to_string()]);
    }

    #[test]
    fn cli_overrides_win_over_configfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modulus.config.json");
        std::fs::write(&path, r#"{"cache-dir":"/from-file"}"#).unwrap();

        let cli = CliOverrides {
            cache_dir: Some("/from-cli".into()),
            ..Default::default()
        };
        let config = ConfigLoader::new()
            .with_configfile(&path)
            .unwrap()
            .with_cli_overrides(cli)
            .resolve();
        assert_eq!(config.cache_dir, std::path::PathBuf::from("/from-cli"));
    }
}

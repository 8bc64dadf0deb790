//! `restore` subcommand (spec §6, §4.6): resolves CLI flags into a
//! [`modulus_restore::RestoreOptions`], wires `SIGINT` into the driver's
//! cancellation flag (spec §5 "(added)"), and dispatches either a normal
//! project restore or install-one-package mode.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use modulus_config::{CliOverrides, ConfigLoader};
use modulus_core::VersionRange;
use modulus_restore::{ProcessScriptRunner, RestoreDriver, RestoreOptions};
use modulus_store::Store;
use url::Url;

use crate::commands::RestoreArgs;

fn spawn_sigint_watcher() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let watched = flag.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("received SIGINT, cancelling after the current phase");
            watched.store(true, Ordering::SeqCst);
        }
    });
    flag
}

pub async fn run(args: RestoreArgs) -> anyhow::Result<()> {
    let path = args.path.clone().unwrap_or_else(|| PathBuf::from("."));

    let mut loader = ConfigLoader::new();
    if let Some(configfile) = &args.configfile {
        loader = loader.with_configfile(configfile).with_context(|| format!("reading {}", configfile.display()))?;
    }
    let config = loader
        .with_cli_overrides(CliOverrides {
            extra_sources: args.source.iter().map(Url::to_string).collect(),
            extra_fallback_sources: args.fallback_source.iter().map(Url::to_string).collect(),
            cache_dir: None,
            store_dir: args.packages.clone(),
        })
        .resolve();

    let extra_sources = parse_urls(&config.sources)?;
    let fallback_sources = parse_urls(&config.fallback_sources)?;

    let store = Store::new(config.store_dir.clone());
    let http_client = reqwest::Client::new();
    let script_runner = Arc::new(ProcessScriptRunner);
    let cancelled = spawn_sigint_watcher();

    let driver = RestoreDriver::new(store, http_client, script_runner).with_cancellation(cancelled);

    let options = RestoreOptions {
        extra_sources,
        fallback_sources,
        no_cache: args.no_cache,
        ignore_failed_sources: args.ignore_failed_sources,
        force_locked: args.lock,
        force_unlock: args.unlock,
    };

    if let Some(id) = &args.package {
        let range = VersionRange::parse(&args.package_version).with_context(|| format!("parsing --package-version {:?}", args.package_version))?;
        let installed_path = driver.install_one(id, range, &options).await?;
        println!("installed {id} at {}", installed_path.display());
        return Ok(());
    }

    let outcome = driver.restore(&path, &options).await?;
    println!(
        "restore complete: {} package(s) installed, lock {}written",
        outcome.installed.len(),
        if outcome.lock_written { "" } else { "not " }
    );
    for warning in &outcome.warnings {
        tracing::warn!("{warning}");
    }
    Ok(())
}

fn parse_urls(raw: &[String]) -> anyhow::Result<Vec<Url>> {
    raw.iter().map(|s| Url::parse(s).with_context(|| format!("parsing source URL {s:?}"))).collect()
}

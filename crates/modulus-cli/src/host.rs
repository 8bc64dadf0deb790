//! `host` subcommand (spec §6, §4.7): loads a source project through the
//! same loader/compiler machinery C9/C10 expose, resolves the requested
//! command or application name via the command-variable grammar, and hands
//! the result off — actually launching the application is the external
//! host launcher's job (spec §1 Non-goals), so this prints what would be
//! handed to it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use modulus_compiler::{NotifyWatchRegistrar, OutputMode, SourceAggregateCompiler, SourceProjectLoader, LOADER_KEY};
use modulus_core::{Project, MANIFEST_FILE_NAME};
use modulus_loader::{LoadRequest, LoaderContainer, RegistryKind};
use modulus_providers::{FrameworkReferenceProvider, GacProvider, LocalStoreProvider, ProjectProvider};
use modulus_resolver::{WalkContext, WarningSink};
use modulus_store::Store;

use crate::commands::HostArgs;
use crate::vars::expand_and_tokenize;

fn split_solution(path: &Path) -> anyhow::Result<(PathBuf, String)> {
    let absolute = std::fs::canonicalize(path).with_context(|| format!("resolving {}", path.display()))?;
    let solution_root = absolute.parent().ok_or_else(|| anyhow!("{} has no parent directory to use as a solution root", absolute.display()))?.to_path_buf();
    let assembly_name = absolute
        .file_name()
        .ok_or_else(|| anyhow!("{} has no directory name", absolute.display()))?
        .to_string_lossy()
        .into_owned();
    Ok((solution_root, assembly_name))
}

pub async fn run(args: HostArgs) -> anyhow::Result<()> {
    let path = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let (solution_root, assembly_name) = split_solution(&path)?;

    let manifest_path = solution_root.join(&assembly_name).join(MANIFEST_FILE_NAME);
    let project = Project::load(&manifest_path).with_context(|| format!("loading {}", manifest_path.display()))?;
    let framework = project.frameworks().into_iter().next().ok_or_else(|| anyhow!("{}: no framework profiles declared", project.name))?;

    let store_dir = args.packages.clone().unwrap_or_else(modulus_platform::dirs::default_store_dir);
    let store = Store::new(store_dir);

    let walk_context = Arc::new(WalkContext {
        project_provider: ProjectProvider::new(&solution_root),
        local_provider: LocalStoreProvider::new(store.clone()),
        framework_provider: FrameworkReferenceProvider::default(),
        gac_provider: GacProvider::default(),
        // Compile-time reference resolution never reaches the network;
        // acquisition is `restore`'s job (spec §1 Non-goals boundary).
        remote_providers: Vec::new(),
        compatibility: modulus_core::CompatibilityTable::with_standard_lineage(),
        ignore_failed_sources: false,
        pinned: None,
        cancelled: Arc::new(AtomicBool::new(false)),
        tokio_handle: tokio::runtime::Handle::current(),
        warnings: Arc::new(WarningSink::default()),
        memo: dashmap::DashMap::new(),
    });

    let loader = SourceProjectLoader::new(
        solution_root,
        args.source_ext.clone(),
        OutputMode::InMemory,
        Arc::new(SourceAggregateCompiler),
        Arc::new(NotifyWatchRegistrar),
        walk_context,
        store,
    );

    let container = LoaderContainer::new();
    container.register_loader(RegistryKind::Internal, Arc::new(loader));

    let request = LoadRequest::new(assembly_name.clone(), framework);
    let module = container
        .load(LOADER_KEY, &request)?
        .ok_or_else(|| anyhow!("{assembly_name}: no project manifest found"))?;

    let port = args.port.or_else(|| std::env::var("COMPILATION_SERVER_PORT").ok().and_then(|raw| raw.parse().ok()));
    tracing::debug!(?port, configuration = ?args.configuration, "host configuration knobs (no in-process compilation server consumes them)");

    let (app, mut launch_args) = resolve_command(&project, args.command_or_app.as_deref())?;
    launch_args.extend(args.args.clone());

    println!("loaded {assembly_name} -> {:?}", module.reference_image);
    println!("application: {app}");
    println!("arguments: {launch_args:?}");

    if args.watch {
        tracing::info!("watching; press Ctrl-C to stop");
        tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
    }

    Ok(())
}

/// Resolve the requested `<command|app>` token to an application name plus
/// its leading argument list (spec §6 "matched commands are expanded ...
/// the first token becomes the application name, the rest prepended to
/// user args"). `None` uses the manifest's entry point, falling back to the
/// project name (spec §6 "`run` with no further args").
fn resolve_command(project: &Project, requested: Option<&str>) -> anyhow::Result<(String, Vec<String>)> {
    let Some(key) = requested else {
        return Ok((project.entry_point.clone().unwrap_or_else(|| project.name.clone()), Vec::new()));
    };

    let Some(template) = project.commands.get(key) else {
        return Ok((key.to_string(), Vec::new()));
    };

    let vars: BTreeMap<String, String> = BTreeMap::new();
    let mut tokens = expand_and_tokenize(template, &vars);
    if tokens.is_empty() {
        bail!("{key}: command expanded to no tokens");
    }
    let app = tokens.remove(0);
    Ok((app, tokens))
}

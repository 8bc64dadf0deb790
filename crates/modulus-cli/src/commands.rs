//! CLI surface (spec §6): `restore` and `host`, following a `clap`-derive
//! shape (one top-level `Cli` with a `Commands` enum, one struct of flags
//! per subcommand).
//!
//! Spec §6 names the id/version pair as trailing positionals on `restore`
//! itself (`restore [<path>] ... [<id> [<version>]]`), but that collides
//! with the leading `<path>` positional once both are optional strings —
//! clap cannot tell "restore Foo 1.2.3" apart from "restore <path-named-Foo>
//! <id-named-1.2.3>". Install-one-package mode is exposed instead as
//! `--package <ID> [--package-version <VERSION>]`, an explicit switch
//! rather than positional guesswork (recorded as a resolved open question
//! in the design ledger).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "modulus", about = "Dependency resolution, restore, and source-project host", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve, acquire, and lock a project's dependency graph.
    Restore(RestoreArgs),
    /// Compile and run (or watch) a source project.
    Host(HostArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RestoreArgs {
    /// Project or solution directory; defaults to the current directory.
    pub path: Option<PathBuf>,

    #[arg(long = "packages")]
    pub packages: Option<PathBuf>,

    #[arg(long = "source")]
    pub source: Vec<Url>,

    #[arg(long = "fallback-source")]
    pub fallback_source: Vec<Url>,

    #[arg(long = "no-cache")]
    pub no_cache: bool,

    #[arg(long = "ignore-failed-sources")]
    pub ignore_failed_sources: bool,

    /// Write the resulting lock with `locked = true`.
    #[arg(long)]
    pub lock: bool,

    /// Force a fresh walk even if a pinned lock is present.
    #[arg(long)]
    pub unlock: bool,

    #[arg(long)]
    pub configfile: Option<PathBuf>,

    /// Install-one-package mode: resolve and install a single id/version
    /// pair, writing no lock and reading no project manifest.
    #[arg(long)]
    pub package: Option<String>,

    #[arg(long = "package-version", requires = "package", default_value = "*")]
    pub package_version: String,
}

#[derive(Debug, Clone, Args)]
pub struct HostArgs {
    /// Project or solution directory; defaults to the current directory.
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Re-register file watches and keep the process alive after the first
    /// load (spec §4.7 step 2; the watches themselves are inert — nothing
    /// in this workspace reacts to the events).
    #[arg(long)]
    pub watch: bool,

    #[arg(long = "packages")]
    pub packages: Option<PathBuf>,

    #[arg(long)]
    pub configuration: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Source file extensions the compiler should scan for (e.g.
    /// `--source-ext cs`); the host's own source language is an external
    /// concern (spec §1 Non-goals), so nothing is assumed by default.
    #[arg(long = "source-ext")]
    pub source_ext: Vec<String>,

    /// A manifest `commands` key, or an assembly name to load directly.
    /// Absent: loads the manifest's `entryPoint`, or the project name.
    pub command_or_app: Option<String>,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

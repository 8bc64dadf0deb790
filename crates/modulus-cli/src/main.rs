//! Entry point: parses the CLI surface (spec §6), then dispatches to
//! `restore` or `host`. Uses a manual-runtime `main()` shape (parse, init
//! logging, build a `tokio` runtime, block on an async command dispatcher)
//! rather than `#[tokio::main]`, so `ExitCode` can be threaded out cleanly
//! on error.

mod commands;
mod host;
mod logging;
mod restore;
mod vars;

use std::process::ExitCode;

use clap::Parser;
use commands::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(source) => {
            tracing::error!("{source:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Restore(args) => restore::run(args).await,
        Command::Host(args) => host::run(args).await,
    }
}

//! Lifecycle hooks (spec §4.6 steps 3/9, §7 "Hook non-zero exit: fatal;
//! surface hook's error output"). The post-restore script runner itself is
//! named as an external collaborator (spec §1); this module is the
//! interface contract plus a default process-based implementation
//! (shell-invoked child process, captured output) driven off the
//! manifest's own `commands` map.

use std::path::Path;
use thiserror::Error;

/// One of the three lifecycle points the restore driver fires (spec §4.6
/// steps 3 and 9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    PreRestore,
    PostRestore,
    Prepare,
}

impl Hook {
    /// The manifest `commands` key a project uses to declare this hook,
    /// following the same naming npm's lifecycle scripts use.
    #[must_use]
    pub fn command_key(self) -> &'static str {
        match self {
            Self::PreRestore => "prerestore",
            Self::PostRestore => "postrestore",
            Self::Prepare => "prepare",
        }
    }
}

#[derive(Debug, Error)]
#[error("{hook} hook exited non-zero: {stderr}")]
pub struct HookError {
    pub hook: &'static str,
    pub stderr: String,
}

/// The externally supplied script runner (spec §1 Non-goals: "the
/// post-restore script runner"). Implementations decide how a hook command
/// string is actually executed; the driver only needs pass/fail plus
/// stderr on failure.
#[async_trait::async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run `hook` if `commands` declares a command under its
    /// [`Hook::command_key`]; a project with no such command is a no-op
    /// success, not an error.
    async fn run(&self, hook: Hook, commands: &std::collections::BTreeMap<String, String>, working_dir: &Path) -> Result<(), HookError>;
}

/// Runs a hook's command string as a child process via the platform shell,
/// inheriting the driver's stdout but capturing stderr so it can be
/// surfaced verbatim on failure (spec §7).
#[derive(Debug, Clone, Default)]
pub struct ProcessScriptRunner;

#[cfg(unix)]
const SHELL: &str = "/bin/sh";
#[cfg(unix)]
const SHELL_ARG: &str = "-c";
#[cfg(windows)]
const SHELL: &str = "cmd";
#[cfg(windows)]
const SHELL_ARG: &str = "/C";

#[async_trait::async_trait]
impl ScriptRunner for ProcessScriptRunner {
    async fn run(&self, hook: Hook, commands: &std::collections::BTreeMap<String, String>, working_dir: &Path) -> Result<(), HookError> {
        let Some(command) = commands.get(hook.command_key()) else {
            return Ok(());
        };

        tracing::debug!(hook = hook.command_key(), %command, "running lifecycle hook");

        let output = tokio::process::Command::new(SHELL)
            .arg(SHELL_ARG)
            .arg(command)
            .current_dir(working_dir)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::inherit())
            .stderr(std::process::Stdio::piped())
            .output()
            .await
            .map_err(|source| HookError { hook: hook.command_key(), stderr: source.to_string() })?;

        if !output.status.success() {
            return Err(HookError {
                hook: hook.command_key(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn absent_hook_command_is_a_no_op() {
        let runner = ProcessScriptRunner;
        let commands = BTreeMap::new();
        let dir = tempfile::tempdir().unwrap();
        runner.run(Hook::PreRestore, &commands, dir.path()).await.unwrap();
    }

    #[tokio::test]
    async fn failing_hook_surfaces_stderr() {
        let runner = ProcessScriptRunner;
        let mut commands = BTreeMap::new();
        commands.insert("prerestore".to_string(), "echo boom 1>&2; exit 3".to_string());
        let dir = tempfile::tempdir().unwrap();
        let err = runner.run(Hook::PreRestore, &commands, dir.path()).await.unwrap_err();
        assert!(err.stderr.contains("boom"));
    }

    #[tokio::test]
    async fn successful_hook_returns_ok() {
        let runner = ProcessScriptRunner;
        let mut commands = BTreeMap::new();
        commands.insert("postrestore".to_string(), "true".to_string());
        let dir = tempfile::tempdir().unwrap();
        runner.run(Hook::PostRestore, &commands, dir.path()).await.unwrap();
    }
}

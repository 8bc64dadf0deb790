//! File-watch registration (spec §4.7 step 2, §9 "file watches drive
//! eventual invalidation via an external file-watcher collaborator; the
//! compiler itself does not react, it only registers interest"). A
//! registration failure is a warning, never fatal (spec §7).

use std::path::Path;
use std::sync::Mutex;

use notify::{recommended_watcher, RecursiveMode, Watcher};

/// Registers filesystem interest in a project directory and its manifest.
/// The compiler never inspects the resulting events itself — invalidation
/// is someone else's job — so the trait has nothing to say about what
/// happens after registration.
pub trait FileWatchRegistrar: Send + Sync {
    fn register(&self, project_dir: &Path, manifest_path: &Path) -> Result<(), notify::Error>;
}

/// Registers one recursive `notify` watch on the project directory and one
/// non-recursive watch on the manifest file, then leaks the watcher handle
/// for the process lifetime — there is no invalidation consumer in this
/// workspace to hand it to, and dropping it would cancel the watch.
#[derive(Default)]
pub struct NotifyWatchRegistrar;

impl FileWatchRegistrar for NotifyWatchRegistrar {
    fn register(&self, project_dir: &Path, manifest_path: &Path) -> Result<(), notify::Error> {
        let mut watcher = recommended_watcher(|_event| {})?;
        watcher.watch(project_dir, RecursiveMode::Recursive)?;
        watcher.watch(manifest_path, RecursiveMode::NonRecursive)?;
        // Leaked: nothing in this workspace consumes watch events, and
        // dropping `watcher` here would immediately tear the watch down.
        std::mem::forget(watcher);
        Ok(())
    }
}

/// Never actually watches anything; used in tests and anywhere registering
/// real OS watches is undesirable.
#[derive(Default)]
pub struct NullWatchRegistrar {
    pub calls: Mutex<Vec<std::path::PathBuf>>,
}

impl FileWatchRegistrar for NullWatchRegistrar {
    fn register(&self, project_dir: &Path, _manifest_path: &Path) -> Result<(), notify::Error> {
        self.calls.lock().unwrap().push(project_dir.to_path_buf());
        Ok(())
    }
}

//! Advisory, cross-process file locking for the package store (spec §4.4:
//! install is atomic across concurrent invocations on the same machine).

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// A held advisory lock on a file; released on drop.
#[derive(Debug)]
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Acquire an exclusive lock on `path`, creating it if necessary. Blocks
    /// until the lock is available.
    pub fn acquire_exclusive(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).write(true).truncate(false).open(path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquires_and_releases_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.lock");
        {
            let _lock = FileLock::acquire_exclusive(&path).unwrap();
        }
        let _lock2 = FileLock::acquire_exclusive(&path).unwrap();
    }
}

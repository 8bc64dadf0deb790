//! Atomic lock-file persistence (spec §3 Lifecycle: "replaced atomically on
//! successful non-locked restore"): a tempfile+rename write, trimmed of any
//! backup/transaction machinery since there is exactly one lock file per
//! project, not a multi-file transaction.

use crate::canonical::to_canonical_json;
use crate::error::{LockfileError, Result};
use crate::types::LockFile;
use std::fs;
use std::path::Path;

pub const LOCK_FILE_NAME: &str = "modulus.lock";

/// Read and parse a lock file from `path`.
pub fn read(path: &Path) -> Result<LockFile> {
    let text = fs::read_to_string(path).map_err(|source| LockfileError::Read { path: path.to_path_buf(), source })?;
    serde_json::from_str(&text).map_err(|source| LockfileError::Parse { path: path.to_path_buf(), source })
}

/// Write `lock` to `path` via tempfile + rename so readers never observe a
/// partially written file.
pub fn write_atomic(path: &Path, lock: &LockFile) -> Result<()> {
    let rendered = to_canonical_json(lock)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| LockfileError::Write { path: path.to_path_buf(), source })?;
    }
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|source| LockfileError::Write { path: path.to_path_buf(), source })?;
    use std::io::Write;
    temp.write_all(rendered.as_bytes()).map_err(|source| LockfileError::Write { path: path.to_path_buf(), source })?;
    temp.as_file().sync_all().map_err(|source| LockfileError::Write { path: path.to_path_buf(), source })?;
    temp.persist(path).map_err(|e| LockfileError::Write { path: path.to_path_buf(), source: e.error })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LockFile;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);
        let lock = LockFile::new(true);
        write_atomic(&path, &lock).unwrap();
        let back = read(&path).unwrap();
        assert_eq!(back.locked, lock.locked);
        assert_eq!(back.version, lock.version);
    }

    #[test]
    fn write_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);
        write_atomic(&path, &LockFile::new(false)).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(entries, vec![std::ffi::OsString::from(LOCK_FILE_NAME)]);
    }
}

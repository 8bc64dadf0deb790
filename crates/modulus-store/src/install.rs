//! Atomic install pipeline (spec §4.4): write bytes to a tempdir, extract,
//! rename into place. Concurrent installs of the same `(name, version)`
//! coordinate by "first writer wins" — losers observe the completed
//! directory and skip.

use crate::error::{Result, StoreError};
use crate::layout::{Store, ARCHIVE_FILE_NAME};
use modulus_core::{IntegrityHash, Version};
use std::path::{Path, PathBuf};

/// Extracts archive bytes into a destination directory, returning the
/// files written. The archive format itself is an external collaborator
/// (spec §1 Non-goals: "the archive (zip) reader"); this crate only needs
/// *a* implementation, supplied by the caller (see `modulus-fetch`).
pub trait Extractor {
    fn extract(&self, archive_bytes: &[u8], dest: &Path) -> std::io::Result<Vec<PathBuf>>;
}

/// Outcome of [`install`].
#[derive(Debug, Clone)]
pub struct Installed {
    pub dir: PathBuf,
    pub sha: IntegrityHash,
    pub files: Vec<PathBuf>,
    /// False when another writer (this run or a concurrent process) had
    /// already completed the install; the caller skipped work.
    pub newly_installed: bool,
}

/// Install `archive_bytes` as `(name, version)`. If `expected_sha` is
/// given, it must match the SHA-512 computed over the archive bytes before
/// any bytes are written (spec §4.4, §8 property 5).
pub fn install(
    store: &Store,
    name: &str,
    version: &Version,
    archive_bytes: &[u8],
    extractor: &dyn Extractor,
    expected_sha: Option<&IntegrityHash>,
) -> Result<Installed> {
    let sha = IntegrityHash::of(archive_bytes);
    if let Some(expected) = expected_sha {
        if expected != &sha {
            return Err(StoreError::ShaMismatch {
                name: name.to_string(),
                version: version.clone(),
                expected: expected.clone(),
                actual: sha,
            });
        }
    }

    let final_dir = store.package_dir(name, version);
    if final_dir.is_dir() {
        tracing::debug!(name, %version, "package already installed, skipping");
        return Ok(Installed {
            files: list_files(&final_dir)?,
            dir: final_dir,
            sha,
            newly_installed: false,
        });
    }

    let tmp_dir = store.temp_dir(name, version);
    std::fs::create_dir_all(&tmp_dir).map_err(|source| StoreError::Io {
        context: format!("creating temp dir {}", tmp_dir.display()),
        source,
    })?;

    extractor.extract(archive_bytes, &tmp_dir).map_err(|source| StoreError::Io {
        context: format!("extracting archive for {name} {version}"),
        source,
    })?;

    // Keep the original archive bytes alongside the extracted tree (spec §3
    // data model) so the sha can be recomputed from disk later, not just
    // trusted from a previously-recorded string (spec §8 property 5).
    std::fs::write(tmp_dir.join(ARCHIVE_FILE_NAME), archive_bytes).map_err(|source| StoreError::Io {
        context: format!("writing archive bytes for {name} {version}"),
        source,
    })?;

    if let Some(parent) = final_dir.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            context: format!("creating {}", parent.display()),
            source,
        })?;
    }

    match std::fs::rename(&tmp_dir, &final_dir) {
        Ok(()) => Ok(Installed {
            files: list_files(&final_dir)?,
            dir: final_dir,
            sha,
            newly_installed: true,
        }),
        Err(_) if final_dir.is_dir() => {
            // Another writer won the race; discard our tempdir and report
            // their result (spec §4.4 "first writer wins").
            let _ = std::fs::remove_dir_all(&tmp_dir);
            Ok(Installed {
                files: list_files(&final_dir)?,
                dir: final_dir,
                sha,
                newly_installed: false,
            })
        }
        Err(source) => Err(StoreError::Io {
            context: format!("renaming {} to {}", tmp_dir.display(), final_dir.display()),
            source,
        }),
    }
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).into_iter() {
        let entry = entry.map_err(|e| StoreError::Io {
            context: format!("walking {}", dir.display()),
            source: e.into(),
        })?;
        if entry.file_type().is_file() && entry.file_name() != ARCHIVE_FILE_NAME {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

/// Recompute the sha512 over an installed package's archive bytes read back
/// from disk (spec §8 property 5), rather than trusting a previously
/// recorded sha string. Fails if the package (or its archive sidecar) isn't
/// present.
pub fn recompute_sha(store: &Store, name: &str, version: &Version) -> Result<IntegrityHash> {
    let path = store.archive_path(name, version);
    let bytes = std::fs::read(&path).map_err(|source| StoreError::Io {
        context: format!("reading archive {}", path.display()),
        source,
    })?;
    Ok(IntegrityHash::of(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PlainFileExtractor;
    impl Extractor for PlainFileExtractor {
        fn extract(&self, archive_bytes: &[u8], dest: &Path) -> std::io::Result<Vec<PathBuf>> {
            let path = dest.join("payload.bin");
            std::fs::write(&path, archive_bytes)?;
            Ok(vec![path])
        }
    }

    #[test]
    fn installs_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let version = Version::new(1, 0, 0);
        let bytes = b"hello".to_vec();

        let first = install(&store, "Foo", &version, &bytes, &PlainFileExtractor, None).unwrap();
        assert!(first.newly_installed);
        assert_eq!(first.files.len(), 1);

        let second = install(&store, "Foo", &version, &bytes, &PlainFileExtractor, None).unwrap();
        assert!(!second.newly_installed);
        assert_eq!(second.dir, first.dir);
    }

    #[test]
    fn rejects_mismatched_sha() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let version = Version::new(1, 0, 0);
        let bytes = b"hello".to_vec();
        let wrong = IntegrityHash::of(b"not hello");

        let result = install(&store, "Foo", &version, &bytes, &PlainFileExtractor, Some(&wrong));
        assert!(matches!(result, Err(StoreError::ShaMismatch { .. })));
    }
}

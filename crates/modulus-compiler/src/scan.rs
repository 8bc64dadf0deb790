//! Parallel source-file discovery (spec §4.7 step 3 "parses each source
//! file"). Parsing a real host-language AST is out of scope (§1 Non-goals
//! exclude a general build system); a file's "parse" result here
//! is its path plus a content hash, sufficient for the deterministic
//! in-memory module record `SourceAggregateCompiler` builds from it.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{CompileError, Result};

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub path: PathBuf,
    pub content_hash: [u8; 32],
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.') && name != ".")
}

fn has_source_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
}

/// Walks `project_dir` recursively, collecting every file whose extension
/// is in `extensions`, and hashes each in parallel via `rayon`. Returns
/// paths sorted for determinism (spec §8 property 1).
pub fn scan_source_files(project_dir: &Path, extensions: &[String]) -> Result<Vec<ParsedSource>> {
    let mut paths: Vec<PathBuf> = WalkDir::new(project_dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && has_source_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();

    paths
        .into_par_iter()
        .map(|path| {
            let bytes = std::fs::read(&path).map_err(|source| CompileError::Io {
                context: format!("reading source file {}", path.display()),
                source,
            })?;
            Ok(ParsedSource { content_hash: *blake3::hash(&bytes).as_bytes(), path })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        vec!["src".to_string()]
    }

    #[test]
    fn finds_matching_files_sorted_and_hashed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.src"), b"fn b() {}").unwrap();
        std::fs::write(dir.path().join("a.src"), b"fn a() {}").unwrap();
        std::fs::write(dir.path().join("ignore.txt"), b"not a source file").unwrap();

        let found = scan_source_files(dir.path(), &exts()).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].path.ends_with("a.src"));
        assert!(found[1].path.ends_with("b.src"));
    }

    #[test]
    fn hidden_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".symbols")).unwrap();
        std::fs::write(dir.path().join(".symbols/x.src"), b"stale").unwrap();
        std::fs::write(dir.path().join("keep.src"), b"kept").unwrap();

        let found = scan_source_files(dir.path(), &exts()).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].path.ends_with("keep.src"));
    }

    #[test]
    fn no_matches_is_an_empty_vec_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_source_files(dir.path(), &exts()).unwrap().is_empty());
    }
}

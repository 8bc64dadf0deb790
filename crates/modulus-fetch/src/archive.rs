//! Archive extraction (spec §1 names "the archive (zip) reader" as an
//! external collaborator; this module is that collaborator, covering the
//! formats `modulus-store`'s [`Extractor`] trait needs).

use crate::error::{FetchError, Result};
use modulus_store::Extractor;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Sniffs a handful of common archive formats and extracts to `dest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    fn extract_zip(bytes: &[u8], dest: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut files = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            let Some(relative) = entry.enclosed_name() else { continue };
            let out_path = dest.join(relative);
            if entry.is_dir() {
                std::fs::create_dir_all(&out_path)?;
                continue;
            }
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut out_file = std::fs::File::create(&out_path)?;
            std::io::copy(&mut entry, &mut out_file)?;
            files.push(out_path);
        }
        Ok(files)
    }

    fn extract_tar(reader: impl std::io::Read, dest: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut archive = tar::Archive::new(reader);
        let mut files = Vec::new();
        for entry in archive.entries()? {
            let mut entry = entry?;
            let relative = entry.path()?.to_path_buf();
            let out_path = dest.join(&relative);
            entry.unpack(&out_path)?;
            if entry.header().entry_type().is_file() {
                files.push(out_path);
            }
        }
        Ok(files)
    }
}

impl Extractor for ArchiveExtractor {
    fn extract(&self, archive_bytes: &[u8], dest: &Path) -> std::io::Result<Vec<PathBuf>> {
        if archive_bytes.starts_with(b"PK\x03\x04") {
            return Self::extract_zip(archive_bytes, dest);
        }
        if archive_bytes.starts_with(&[0x1f, 0x8b]) {
            let decoder = flate2::read::GzDecoder::new(Cursor::new(archive_bytes));
            return Self::extract_tar(decoder, dest);
        }
        if archive_bytes.starts_with(&[0xfd, b'7', b'z', b'X', b'Z']) {
            let decoder = xz2::read::XzDecoder::new(Cursor::new(archive_bytes));
            return Self::extract_tar(decoder, dest);
        }
        if archive_bytes.starts_with(b"BZh") {
            let decoder = bzip2::read::BzDecoder::new(Cursor::new(archive_bytes));
            return Self::extract_tar(decoder, dest);
        }
        Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            FetchError::UnknownArchiveFormat { name: dest.display().to_string() },
        ))
    }
}

/// Extract on a blocking-pool thread (spec §4.4: "archive extraction is
/// synchronous ... run via `tokio::task::spawn_blocking`").
pub async fn extract_blocking(bytes: Vec<u8>, dest: PathBuf) -> Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || ArchiveExtractor.extract(&bytes, &dest))
        .await
        .map_err(|e| FetchError::Io {
            context: "archive extraction task panicked".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e),
        })?
        .map_err(|source| FetchError::Io { context: "extracting archive".to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognised_bytes_produce_unknown_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ArchiveExtractor.extract(b"not an archive", dir.path());
        assert!(err.is_err());
    }

    #[test]
    fn extracts_a_tar_gz() {
        use std::io::Write;
        let mut builder = tar::Builder::new(Vec::new());
        let content = b"hello";
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_cksum();
        builder.append_data(&mut header, "payload.txt", &content[..]).unwrap();
        let tar_bytes = builder.into_inner().unwrap();

        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&tar_bytes).unwrap();
        let gz_bytes = encoder.finish().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let files = ArchiveExtractor.extract(&gz_bytes, dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(std::fs::read(&files[0]).unwrap(), content);
    }
}

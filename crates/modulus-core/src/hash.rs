//! Content hashing (spec §3 `Package.content_hash`, §4.4 store integrity).
//!
//! Two distinct digests are used deliberately: [`blake3`] for fast
//! content-addressing keys inside the local store (not exposed to the
//! network), and SHA-512 for the integrity value recorded in the lock file
//! and compared against what a remote feed advertises.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fmt;
use std::io::Read;

/// A content-addressing key derived from archive bytes via BLAKE3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey([u8; 32]);

impl ContentKey {
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Hex form, used as the directory name in the on-disk store.
    #[must_use]
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The base64 SHA-512 integrity value recorded in lock files (spec §3, §8
/// property "hash integrity").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrityHash(String);

impl IntegrityHash {
    /// Compute the integrity value for a full in-memory archive.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha512::digest(bytes);
        Self(BASE64.encode(digest))
    }

    /// Compute the integrity value by streaming a reader, avoiding loading
    /// the whole archive into memory.
    pub fn of_reader(mut reader: impl Read) -> std::io::Result<Self> {
        let mut hasher = Sha512::new();
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(Self(BASE64.encode(hasher.finalize())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn from_base64(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for IntegrityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_key_is_stable() {
        let a = ContentKey::of(b"hello world");
        let b = ContentKey::of(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn content_key_differs_for_different_bytes() {
        assert_ne!(ContentKey::of(b"a"), ContentKey::of(b"b"));
    }

    #[test]
    fn integrity_hash_matches_between_full_and_streamed() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(100);
        let whole = IntegrityHash::of(&data);
        let streamed = IntegrityHash::of_reader(std::io::Cursor::new(&data)).unwrap();
        assert_eq!(whole, streamed);
    }
}

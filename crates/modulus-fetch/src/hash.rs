//! Integrity verification helpers layered over [`modulus_core::IntegrityHash`].

use modulus_core::IntegrityHash;

/// Whether `actual` matches `expected`. A thin named wrapper so call sites
/// read as an integrity check rather than a bare equality comparison.
#[must_use]
pub fn matches(expected: &IntegrityHash, actual: &IntegrityHash) -> bool {
    expected == actual
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_produce_matching_hashes() {
        let a = IntegrityHash::of(b"payload");
        let b = IntegrityHash::of(b"payload");
        assert!(matches(&a, &b));
    }

    #[test]
    fn differing_bytes_do_not_match() {
        let a = IntegrityHash::of(b"payload-a");
        let b = IntegrityHash::of(b"payload-b");
        assert!(!matches(&a, &b));
    }
}

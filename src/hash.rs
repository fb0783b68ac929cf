//! Deterministic content fingerprinting.

use sha2::{Digest, Sha256};

/// Returns a stable hex fingerprint of `payload`.
///
/// Identical input always yields identical output, including across process
/// restarts; this is required by the persistence layer's `hash` index and by
/// idempotency checks that compare fingerprints computed in different runs.
pub fn strhash(payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_hash() {
        let a = strhash(b"hello world");
        let b = strhash(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_input_different_hash() {
        let a = strhash(b"hello world");
        let b = strhash(b"hello world!");
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_lowercase_hex() {
        let h = strhash(b"payload");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn empty_payload_is_stable() {
        assert_eq!(strhash(b""), strhash(b""));
    }
}

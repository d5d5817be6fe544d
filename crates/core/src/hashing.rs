//! SHA-256 digests for content-addressed object keys.

use sha2::{Digest, Sha256};

/// Number of hex characters kept for cache-busting variant keys.
pub const CONTENT_HASH_LEN: usize = 8;

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Short content hash embedded in variant object keys so a re-encoded
/// variant never collides with a cached copy of the previous bytes.
pub fn content_hash(data: &[u8]) -> String {
    let mut hex = sha256_hex(data);
    hex.truncate(CONTENT_HASH_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_known_hash() {
        let hash = sha256_hex(b"");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn content_hash_is_prefix_of_full_digest() {
        let data = b"hello world";
        let short = content_hash(data);
        assert_eq!(short.len(), CONTENT_HASH_LEN);
        assert!(sha256_hex(data).starts_with(&short));
    }

    #[test]
    fn different_bytes_produce_different_hashes() {
        assert_ne!(content_hash(b"variant-a"), content_hash(b"variant-b"));
    }
}

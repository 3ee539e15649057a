// Path: crates/crypto/src/hash.rs
//! SHA-256 digests.

use sha2::{Digest, Sha256};

/// Hashes `message` with SHA-256.
pub fn sha256(message: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(message);
    digest.into()
}

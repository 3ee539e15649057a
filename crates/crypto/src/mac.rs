// Path: crates/crypto/src/mac.rs
//! HMAC-SHA256 and the relabeling key sources.

use attest_api::sign::HmacKeySource;
use attest_types::error::CryptoError;
use attest_types::keys::{HmacKey, HMAC_KEY_LEN};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Computes HMAC-SHA256 of `message` under `key`.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<[u8; 32], CryptoError> {
    // HMAC-SHA256 accepts keys of any length, so this only fails if the
    // hmac crate's invariants change underneath us.
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| CryptoError::InvalidKey(format!("HMAC key rejected: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().into())
}

/// Draws relabeling keys from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsHmacKeySource;

impl OsHmacKeySource {
    /// A fresh source.
    pub fn new() -> Self {
        Self
    }
}

impl HmacKeySource for OsHmacKeySource {
    fn generate(&self) -> Result<HmacKey, CryptoError> {
        let mut key = Zeroizing::new([0u8; HMAC_KEY_LEN]);
        OsRng
            .try_fill_bytes(&mut *key)
            .map_err(|e| CryptoError::OperationFailed(format!("OS RNG failure: {e}")))?;
        Ok(key)
    }
}

/// Always returns the same key; for deterministic relabelings in tests and
/// test-vector validation.
#[derive(Debug, Clone, Copy)]
pub struct FixedHmacKeySource {
    key: [u8; HMAC_KEY_LEN],
}

impl FixedHmacKeySource {
    /// A source that always yields `key`.
    pub fn new(key: [u8; HMAC_KEY_LEN]) -> Self {
        Self { key }
    }
}

impl HmacKeySource for FixedHmacKeySource {
    fn generate(&self) -> Result<HmacKey, CryptoError> {
        Ok(Zeroizing::new(self.key))
    }
}

// Path: crates/api/src/sign.rs
//! Algorithm-tagged signing seams and the HMAC key source.
//!
//! The engines never touch a curve directly: they look these traits up in
//! the crypto function registry by [`SignatureAlgorithm`] tag.

use attest_types::error::CryptoError;
use attest_types::keys::{HmacKey, PrivateKey, PublicKey, SignatureAlgorithm};

/// Signs raw bytes under one algorithm.
pub trait SignatureSigner: Send + Sync {
    /// The algorithm this signer implements.
    fn algorithm(&self) -> SignatureAlgorithm;

    /// Signs `message` with `key`, returning the raw signature bytes.
    ///
    /// The key must carry the signer's algorithm tag; mismatched or
    /// malformed key material is an [`CryptoError::InvalidKey`].
    fn sign(&self, key: &PrivateKey, message: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// Verifies raw signatures under one algorithm.
pub trait SignatureVerifier: Send + Sync {
    /// The algorithm this verifier implements.
    fn algorithm(&self) -> SignatureAlgorithm;

    /// Verifies `signature` over `message` under `key`.
    ///
    /// Returns `Ok(false)` for signatures that are malformed or fail the
    /// check; `Err` is reserved for unusable key material.
    fn verify(
        &self,
        key: &PublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError>;
}

/// Produces the 32-byte HMAC keys used for blank-node relabeling.
///
/// Production sources draw from a CSPRNG; tests substitute a fixed key to
/// obtain deterministic relabelings.
pub trait HmacKeySource: Send + Sync {
    /// Returns a fresh relabeling key.
    fn generate(&self) -> Result<HmacKey, CryptoError>;
}

// Path: crates/types/src/keys.rs
//! Opaque key handles tagged with a signature algorithm.
//!
//! Key material arrives from outside the library; the only key this
//! workspace ever creates is the per-proof ephemeral P-256 key of the
//! selective-disclosure suite. Private bytes live in a zeroizing buffer so
//! that dropping a handle scrubs the material.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

/// Length in bytes of the HMAC-SHA256 key used for blank-node relabeling.
pub const HMAC_KEY_LEN: usize = 32;

/// A relabeling key; zeroized on drop.
pub type HmacKey = Zeroizing<[u8; HMAC_KEY_LEN]>;

/// Signature algorithms understood by the crypto function registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    /// EdDSA over edwards25519 (RFC 8032).
    Ed25519,
    /// ECDSA over NIST P-256 with SHA-256, IEEE P1363 fixed-size signatures.
    EcdsaP256Sha256,
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => f.write_str("Ed25519"),
            Self::EcdsaP256Sha256 => f.write_str("ECDSA-P256-SHA256"),
        }
    }
}

/// An opaque public key handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    algorithm: SignatureAlgorithm,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Wraps raw public key bytes under an algorithm tag.
    pub fn new(algorithm: SignatureAlgorithm, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    /// The algorithm this key is valid for.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// An opaque private key handle; the byte buffer zeroizes on drop.
#[derive(Clone)]
pub struct PrivateKey {
    algorithm: SignatureAlgorithm,
    bytes: Zeroizing<Vec<u8>>,
}

impl PrivateKey {
    /// Wraps raw private key bytes under an algorithm tag.
    pub fn new(algorithm: SignatureAlgorithm, bytes: Vec<u8>) -> Self {
        Self {
            algorithm,
            bytes: Zeroizing::new(bytes),
        }
    }

    /// The algorithm this key is valid for.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Exposes the raw key bytes to a signing backend.
    pub fn expose_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

/// A public/private key pair under one algorithm tag.
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// The public half.
    pub public: PublicKey,
    /// The private half; zeroized on drop.
    pub secret: PrivateKey,
}

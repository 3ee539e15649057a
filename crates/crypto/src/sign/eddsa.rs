// Path: crates/crypto/src/sign/eddsa.rs
//! Ed25519 signing and verification via `ed25519-dalek`.

use attest_api::sign::{SignatureSigner, SignatureVerifier};
use attest_types::error::CryptoError;
use attest_types::keys::{KeyPair, PrivateKey, PublicKey, SignatureAlgorithm};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

const SEED_LEN: usize = 32;

fn signing_key(key: &PrivateKey) -> Result<SigningKey, CryptoError> {
    if key.algorithm() != SignatureAlgorithm::Ed25519 {
        return Err(CryptoError::InvalidKey(format!(
            "expected an Ed25519 key, got {}",
            key.algorithm()
        )));
    }
    let seed: [u8; SEED_LEN] = key.expose_bytes().try_into().map_err(|_| {
        CryptoError::InvalidKey(format!(
            "Ed25519 private key must be {SEED_LEN} bytes, got {}",
            key.expose_bytes().len()
        ))
    })?;
    Ok(SigningKey::from_bytes(&seed))
}

fn verifying_key(key: &PublicKey) -> Result<VerifyingKey, CryptoError> {
    if key.algorithm() != SignatureAlgorithm::Ed25519 {
        return Err(CryptoError::InvalidKey(format!(
            "expected an Ed25519 key, got {}",
            key.algorithm()
        )));
    }
    let bytes: [u8; SEED_LEN] = key.as_bytes().try_into().map_err(|_| {
        CryptoError::InvalidKey(format!(
            "Ed25519 public key must be {SEED_LEN} bytes, got {}",
            key.as_bytes().len()
        ))
    })?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| CryptoError::InvalidKey(format!("unusable Ed25519 public key: {e}")))
}

/// Derives the key pair of a 32-byte Ed25519 seed.
pub fn keypair_from_seed(seed: &[u8; SEED_LEN]) -> KeyPair {
    let signing = SigningKey::from_bytes(seed);
    KeyPair {
        public: PublicKey::new(
            SignatureAlgorithm::Ed25519,
            signing.verifying_key().to_bytes().to_vec(),
        ),
        secret: PrivateKey::new(SignatureAlgorithm::Ed25519, seed.to_vec()),
    }
}

/// RFC 8032 Ed25519 signer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signer;

impl SignatureSigner for Ed25519Signer {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Ed25519
    }

    fn sign(&self, key: &PrivateKey, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let signing = signing_key(key)?;
        Ok(signing.sign(message).to_bytes().to_vec())
    }
}

/// RFC 8032 Ed25519 verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::Ed25519
    }

    fn verify(
        &self,
        key: &PublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        let verifying = verifying_key(key)?;
        let Ok(signature) = Signature::from_slice(signature) else {
            return Ok(false);
        };
        Ok(verifying.verify(message, &signature).is_ok())
    }
}

// Path: crates/crypto/src/sign/ecdsa.rs
//! ECDSA P-256 signing and verification via the `p256` crate.
//!
//! Signatures are the fixed-size 64-byte IEEE P1363 form (`r || s`).
//! Public keys are SEC1 encoded; the compressed 33-byte form is what the
//! selective-disclosure suite embeds in proof values.

use attest_api::sign::{SignatureSigner, SignatureVerifier};
use attest_types::error::CryptoError;
use attest_types::keys::{KeyPair, PrivateKey, PublicKey, SignatureAlgorithm};
use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;

/// Length of a SEC1 compressed P-256 public key.
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;

fn signing_key(key: &PrivateKey) -> Result<SigningKey, CryptoError> {
    if key.algorithm() != SignatureAlgorithm::EcdsaP256Sha256 {
        return Err(CryptoError::InvalidKey(format!(
            "expected a P-256 key, got {}",
            key.algorithm()
        )));
    }
    SigningKey::from_slice(key.expose_bytes())
        .map_err(|e| CryptoError::InvalidKey(format!("unusable P-256 private key: {e}")))
}

fn verifying_key(key: &PublicKey) -> Result<VerifyingKey, CryptoError> {
    if key.algorithm() != SignatureAlgorithm::EcdsaP256Sha256 {
        return Err(CryptoError::InvalidKey(format!(
            "expected a P-256 key, got {}",
            key.algorithm()
        )));
    }
    VerifyingKey::from_sec1_bytes(key.as_bytes())
        .map_err(|e| CryptoError::InvalidKey(format!("unusable P-256 public key: {e}")))
}

/// Derives the key pair of a 32-byte P-256 secret scalar; the public half
/// is SEC1 compressed.
pub fn keypair_from_secret(secret: &[u8]) -> Result<KeyPair, CryptoError> {
    let signing = SigningKey::from_slice(secret)
        .map_err(|e| CryptoError::InvalidKey(format!("unusable P-256 private key: {e}")))?;
    let public = signing.verifying_key().to_encoded_point(true);
    Ok(KeyPair {
        public: PublicKey::new(
            SignatureAlgorithm::EcdsaP256Sha256,
            public.as_bytes().to_vec(),
        ),
        secret: PrivateKey::new(SignatureAlgorithm::EcdsaP256Sha256, secret.to_vec()),
    })
}

/// Generates a fresh P-256 key pair for use as an ephemeral proof key.
pub fn generate_ephemeral_keypair() -> Result<KeyPair, CryptoError> {
    let signing = SigningKey::random(&mut OsRng);
    keypair_from_secret(signing.to_bytes().as_slice())
}

/// ECDSA P-256 / SHA-256 signer (deterministic per RFC 6979).
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaP256Signer;

impl SignatureSigner for EcdsaP256Signer {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::EcdsaP256Sha256
    }

    fn sign(&self, key: &PrivateKey, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let signing = signing_key(key)?;
        let signature: Signature = signing.sign(message);
        Ok(signature.to_bytes().to_vec())
    }
}

/// ECDSA P-256 / SHA-256 verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaP256Verifier;

impl SignatureVerifier for EcdsaP256Verifier {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::EcdsaP256Sha256
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

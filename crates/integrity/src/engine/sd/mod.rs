// Path: crates/integrity/src/engine/sd/mod.rs
//! The `ecdsa-sd-2023` selective-disclosure engine.
//!
//! Three parties, three modules: the issuer creates a *base proof* over
//! every statement ([`base`]), the holder reduces the credential and emits
//! a *derived proof* disclosing a subset ([`derive`]), and the verifier
//! checks the derived proof against the reduced credential ([`verify`]).
//! A derived credential cannot be derived again: the ephemeral private key
//! is destroyed at issuance and never travels.

pub mod base;
pub mod derive;
pub mod labels;
pub mod verify;

use crate::codec::framing::EPHEMERAL_KEY_LEN;
use attest_types::error::{CodecError, DataIntegrityError};
use attest_types::keys::{PublicKey, SignatureAlgorithm};

/// Multicodec header of a compressed P-256 public key.
pub const P256_PUBLIC_KEY_MULTICODEC: [u8; 2] = [0x80, 0x24];

/// Prefixes the compressed ephemeral public key with its multicodec header.
pub(crate) fn ephemeral_key_with_header(key: &PublicKey) -> Result<Vec<u8>, DataIntegrityError> {
    if key.algorithm() != SignatureAlgorithm::EcdsaP256Sha256 {
        return Err(DataIntegrityError::InvalidArgument(format!(
            "ephemeral proof key must be P-256, got {}",
            key.algorithm()
        )));
    }
    let bytes = key.as_bytes();
    let compressed_len = EPHEMERAL_KEY_LEN - P256_PUBLIC_KEY_MULTICODEC.len();
    let valid_prefix = matches!(bytes.first(), Some(0x02) | Some(0x03));
    if bytes.len() != compressed_len || !valid_prefix {
        return Err(DataIntegrityError::InvalidArgument(
            "ephemeral proof key must be a SEC1 compressed P-256 point".to_string(),
        ));
    }
    let mut out = P256_PUBLIC_KEY_MULTICODEC.to_vec();
    out.extend_from_slice(bytes);
    Ok(out)
}

/// Strips the multicodec header off an embedded ephemeral public key.
pub(crate) fn ephemeral_key_from_header(bytes: &[u8]) -> Result<PublicKey, CodecError> {
    let (header, compressed) = bytes.split_at(bytes.len().min(P256_PUBLIC_KEY_MULTICODEC.len()));
    if header != P256_PUBLIC_KEY_MULTICODEC.as_slice() || compressed.is_empty() {
        return Err(CodecError::MalformedProofValue(
            "ephemeral public key does not carry the P-256 multicodec header".to_string(),
        ));
    }
    Ok(PublicKey::new(
        SignatureAlgorithm::EcdsaP256Sha256,
        compressed.to_vec(),
    ))
}

/// The byte string the issuer signs: `H(options) || ephemeralKey || H(mandatory)`.
pub(crate) fn signed_base_tuple(
    options_hash: &[u8; 32],
    ephemeral_key_with_header: &[u8],
    mandatory_hash: &[u8; 32],
) -> Vec<u8> {
    let mut data =
        Vec::with_capacity(options_hash.len() + ephemeral_key_with_header.len() + mandatory_hash.len());
    data.extend_from_slice(options_hash);
    data.extend_from_slice(ephemeral_key_with_header);
    data.extend_from_slice(mandatory_hash);
    data
}

/// Concatenates the mandatory statements (ascending index order, no
/// separator) for hashing.
pub(crate) fn concat_mandatory(
    sorted_statements: &[String],
    mandatory_indexes: &[usize],
) -> Result<Vec<u8>, DataIntegrityError> {
    let mut out = Vec::new();
    for &index in mandatory_indexes {
        let statement = sorted_statements.get(index).ok_or_else(|| {
            DataIntegrityError::InvalidArgument(format!(
                "mandatory index {index} is out of range for {} statements",
                sorted_statements.len()
            ))
        })?;
        out.extend_from_slice(statement.as_bytes());
    }
    Ok(out)
}

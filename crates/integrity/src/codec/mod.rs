// Path: crates/integrity/src/codec/mod.rs
//! Proof-value codecs.
//!
//! Signatures travel multibase-encoded with no multicodec header: base58btc
//! (`z`) for the full-disclosure suites, base64url-no-pad (`u`) for the
//! selective-disclosure proof values. The CBOR framing of the latter lives
//! in [`framing`].

pub mod framing;

use attest_types::error::CodecError;
use multibase::Base;

/// Encodes raw bytes as base58btc with the `z` multibase prefix.
pub fn encode_base58btc(bytes: &[u8]) -> String {
    multibase::encode(Base::Base58Btc, bytes)
}

/// Encodes raw bytes as base64url-no-pad with the `u` multibase prefix.
pub fn encode_base64url(bytes: &[u8]) -> String {
    multibase::encode(Base::Base64Url, bytes)
}

/// Decodes a multibase string, accepting only the two proof-value bases.
pub fn decode(text: &str) -> Result<(Base, Vec<u8>), CodecError> {
    if text.is_empty() {
        return Err(CodecError::MalformedProofValue(
            "empty proof value".to_string(),
        ));
    }
    let (base, bytes) = multibase::decode(text)
        .map_err(|e| CodecError::MalformedProofValue(e.to_string()))?;
    match base {
        Base::Base58Btc | Base::Base64Url => Ok((base, bytes)),
        other => Err(CodecError::MalformedProofValue(format!(
            "unsupported multibase prefix '{}'",
            other.code()
        ))),
    }
}

/// Decodes a multibase string that must carry the given base.
pub fn decode_expecting(text: &str, expected: Base) -> Result<Vec<u8>, CodecError> {
    let (base, bytes) = decode(text)?;
    if base == expected {
        Ok(bytes)
    } else {
        Err(CodecError::MalformedProofValue(format!(
            "expected multibase prefix '{}', found '{}'",
            expected.code(),
            base.code()
        )))
    }
}

// Path: crates/integrity/src/codec/framing.rs
//! CBOR framing of the `ecdsa-sd-2023` proof values.
//!
//! A proof value is a 3-byte tag header followed by one canonical CBOR
//! array: `0xd9 0x5d 0x00` frames the issuer's base proof, `0xd9 0x5d 0x01`
//! the holder's derived proof. Arrays use definite lengths and
//! shortest-form integers; label-map keys are emitted in canonical order.

use crate::relabel::LabelMap;
use attest_types::error::CodecError;
use attest_types::keys::{HmacKey, HMAC_KEY_LEN};
use ciborium::value::{Integer, Value};
use zeroize::Zeroizing;

/// Tag header of a base proof value.
pub const BASE_PROOF_HEADER: [u8; 3] = [0xd9, 0x5d, 0x00];
/// Tag header of a derived proof value.
pub const DERIVED_PROOF_HEADER: [u8; 3] = [0xd9, 0x5d, 0x01];

/// Byte length of the multicodec-prefixed compressed ephemeral public key.
pub const EPHEMERAL_KEY_LEN: usize = 35;

/// The issuer-emitted base proof internals.
#[derive(Clone)]
pub struct BaseProofValue {
    /// Issuer signature over `H(options) || ephemeralKey || H(mandatory)`.
    pub base_signature: Vec<u8>,
    /// Multicodec header plus compressed P-256 ephemeral public key.
    pub ephemeral_public_key: Vec<u8>,
    /// The 32-byte relabeling key; zeroized on drop.
    pub hmac_key: HmacKey,
    /// Ephemeral-key signatures over each non-mandatory statement, in
    /// ascending sorted-index order.
    pub statement_signatures: Vec<Vec<u8>>,
    /// The JSON Pointers the issuer marked mandatory.
    pub mandatory_pointers: Vec<String>,
}

/// The holder-emitted derived proof internals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedProofValue {
    /// The issuer's base signature, carried through unchanged.
    pub base_signature: Vec<u8>,
    /// Multicodec header plus compressed P-256 ephemeral public key.
    pub ephemeral_public_key: Vec<u8>,
    /// Signatures of the disclosed non-mandatory statements, in ascending
    /// reduced-sorted-index order.
    pub disclosed_signatures: Vec<Vec<u8>>,
    /// Canonical-id to HMAC-id map for the reduced graph, bare form.
    pub label_map: LabelMap,
    /// Reduced-sorted indexes of the mandatory statements.
    pub mandatory_indexes: Vec<usize>,
}

fn encode(header: [u8; 3], payload: &Value) -> Result<Vec<u8>, CodecError> {
    let mut out = header.to_vec();
    ciborium::into_writer(payload, &mut out)
        .map_err(|e| CodecError::MalformedProofValue(format!("CBOR encoding failed: {e}")))?;
    Ok(out)
}

fn byte_array(items: &[Vec<u8>]) -> Value {
    Value::Array(items.iter().map(|b| Value::Bytes(b.clone())).collect())
}

/// Serializes a base proof value under its framing tag.
pub fn serialize_base_proof(value: &BaseProofValue) -> Result<Vec<u8>, CodecError> {
    let payload = Value::Array(vec![
        Value::Bytes(value.base_signature.clone()),
        Value::Bytes(value.ephemeral_public_key.clone()),
        Value::Bytes(value.hmac_key.to_vec()),
        byte_array(&value.statement_signatures),
        Value::Array(
            value
                .mandatory_pointers
                .iter()
                .map(|p| Value::Text(p.clone()))
                .collect(),
        ),
    ]);
    encode(BASE_PROOF_HEADER, &payload)
}

/// Serializes a derived proof value under its framing tag.
pub fn serialize_derived_proof(value: &DerivedProofValue) -> Result<Vec<u8>, CodecError> {
    // Canonical CBOR orders map keys by their encoded bytes; for same-major
    // text keys that is length first, then lexicographic.
    let mut entries: Vec<(&String, &String)> = value.label_map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    let label_map = Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (Value::Text(k.clone()), Value::Text(v.clone())))
            .collect(),
    );
    let payload = Value::Array(vec![
        Value::Bytes(value.base_signature.clone()),
        Value::Bytes(value.ephemeral_public_key.clone()),
        byte_array(&value.disclosed_signatures),
        label_map,
        Value::Array(
            value
                .mandatory_indexes
                .iter()
                .map(|&i| Value::Integer(Integer::from(i as u64)))
                .collect(),
        ),
    ]);
    encode(DERIVED_PROOF_HEADER, &payload)
}

fn proof_kind(header: &[u8]) -> &'static str {
    if header == BASE_PROOF_HEADER.as_slice() {
        "base"
    } else if header == DERIVED_PROOF_HEADER.as_slice() {
        "derived"
    } else {
        "unknown"
    }
}

fn split_frame(bytes: &[u8], expected: [u8; 3], kind: &'static str) -> Result<Vec<Value>, CodecError> {
    let header = bytes
        .get(..3)
        .ok_or_else(|| CodecError::MalformedProofValue("proof value shorter than its framing tag".to_string()))?;
    if header != expected.as_slice() {
        return Err(CodecError::WrongProofKind {
            expected: kind,
            found: proof_kind(header),
        });
    }
    let body = bytes.get(3..).unwrap_or(&[]);
    let payload: Value = ciborium::from_reader(body)
        .map_err(|e| CodecError::MalformedProofValue(format!("CBOR decoding failed: {e}")))?;
    match payload {
        Value::Array(items) if items.len() == 5 => Ok(items),
        Value::Array(items) => Err(CodecError::MalformedProofValue(format!(
            "expected a 5-element tuple, found {} elements",
            items.len()
        ))),
        _ => Err(CodecError::MalformedProofValue(
            "expected a CBOR array".to_string(),
        )),
    }
}

fn take_bytes(value: Value, what: &str) -> Result<Vec<u8>, CodecError> {
    match value {
        Value::Bytes(bytes) => Ok(bytes),
        _ => Err(CodecError::MalformedProofValue(format!(
            "{what} must be a byte string"
        ))),
    }
}

fn take_byte_array(value: Value, what: &str) -> Result<Vec<Vec<u8>>, CodecError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| take_bytes(item, what))
            .collect(),
        _ => Err(CodecError::MalformedProofValue(format!(
            "{what} must be an array of byte strings"
        ))),
    }
}

fn take_ephemeral_key(value: Value) -> Result<Vec<u8>, CodecError> {
    let bytes = take_bytes(value, "ephemeral public key")?;
    if bytes.len() == EPHEMERAL_KEY_LEN {
        Ok(bytes)
    } else {
        Err(CodecError::MalformedProofValue(format!(
            "ephemeral public key must be {EPHEMERAL_KEY_LEN} bytes, found {}",
            bytes.len()
        )))
    }
}

/// Parses a base proof value, rejecting derived framing.
pub fn parse_base_proof(bytes: &[u8]) -> Result<BaseProofValue, CodecError> {
    let mut items = split_frame(bytes, BASE_PROOF_HEADER, "base")?.into_iter();
    let base_signature = take_bytes(items.next().unwrap_or(Value::Null), "base signature")?;
    let ephemeral_public_key = take_ephemeral_key(items.next().unwrap_or(Value::Null))?;
    let hmac_bytes = take_bytes(items.next().unwrap_or(Value::Null), "HMAC key")?;
    let hmac_key: [u8; HMAC_KEY_LEN] = hmac_bytes.as_slice().try_into().map_err(|_| {
        CodecError::MalformedProofValue(format!(
            "HMAC key must be {HMAC_KEY_LEN} bytes, found {}",
            hmac_bytes.len()
        ))
    })?;
    let statement_signatures =
        take_byte_array(items.next().unwrap_or(Value::Null), "statement signature")?;
    let mandatory_pointers = match items.next().unwrap_or(Value::Null) {
        Value::Array(entries) => entries
            .into_iter()
            .map(|entry| match entry {
                Value::Text(text) => Ok(text),
                _ => Err(CodecError::MalformedProofValue(
                    "mandatory pointers must be text strings".to_string(),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(CodecError::MalformedProofValue(
                "mandatory pointers must be an array".to_string(),
            ))
        }
    };
    Ok(BaseProofValue {
        base_signature,
        ephemeral_public_key,
        hmac_key: Zeroizing::new(hmac_key),
        statement_signatures,
        mandatory_pointers,
    })
}

/// Parses a derived proof value, rejecting base framing.
pub fn parse_derived_proof(bytes: &[u8]) -> Result<DerivedProofValue, CodecError> {
    let mut items = split_frame(bytes, DERIVED_PROOF_HEADER, "derived")?.into_iter();
    let base_signature = take_bytes(items.next().unwrap_or(Value::Null), "base signature")?;
    let ephemeral_public_key = take_ephemeral_key(items.next().unwrap_or(Value::Null))?;
    let disclosed_signatures =
        take_byte_array(items.next().unwrap_or(Value::Null), "disclosed signature")?;
    let label_map = match items.next().unwrap_or(Value::Null) {
        Value::Map(entries) => {
            let mut map = LabelMap::new();
            for (key, value) in entries {
                match (key, value) {
                    (Value::Text(k), Value::Text(v)) => {
                        map.insert(k, v);
                    }
                    _ => {
                        return Err(CodecError::MalformedProofValue(
                            "label map entries must map text to text".to_string(),
                        ))
                    }
                }
            }
            map
        }
        _ => {
            return Err(CodecError::MalformedProofValue(
                "label map must be a CBOR map".to_string(),
            ))
        }
    };
    let mandatory_indexes = match items.next().unwrap_or(Value::Null) {
        Value::Array(entries) => entries
            .into_iter()
            .map(|entry| match entry {
                Value::Integer(i) => usize::try_from(i128::from(i)).map_err(|_| {
                    CodecError::MalformedProofValue(
                        "mandatory indexes must be non-negative integers".to_string(),
                    )
                }),
                _ => Err(CodecError::MalformedProofValue(
                    "mandatory indexes must be integers".to_string(),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(CodecError::MalformedProofValue(
                "mandatory indexes must be an array".to_string(),
            ))
        }
    };
    Ok(DerivedProofValue {
        base_signature,
        ephemeral_public_key,
        disclosed_signatures,
        label_map,
        mandatory_indexes,
    })
}

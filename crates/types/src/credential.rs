// Path: crates/types/src/credential.rs
//! An opaque handle over a credential document.
//!
//! The library reads and writes only the `proof` member; every other claim
//! is carried through untouched. JSON round-trips preserve member order, so
//! a credential that gains a proof is byte-identical to the original
//! everywhere else.

use crate::error::DataIntegrityError;
use crate::proof::Proof;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A credential document. Everything outside the proof list is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(Value);

impl Credential {
    /// Wraps a parsed JSON document; the root must be an object.
    pub fn new(value: Value) -> Result<Self, DataIntegrityError> {
        if value.is_object() {
            Ok(Self(value))
        } else {
            Err(DataIntegrityError::InvalidArgument(
                "credential root must be a JSON object".to_string(),
            ))
        }
    }

    /// Parses a credential from its JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, DataIntegrityError> {
        Self::new(serde_json::from_str(text)?)
    }

    /// Serializes the credential back to JSON text.
    pub fn to_json_string(&self) -> Result<String, DataIntegrityError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// The underlying JSON document.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the handle, returning the JSON document.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The document's `@context`, if any.
    pub fn context(&self) -> Option<&Value> {
        self.0.get("@context")
    }

    /// All proofs attached to the credential, in document order.
    pub fn proofs(&self) -> Result<Vec<Proof>, DataIntegrityError> {
        match self.0.get("proof") {
            None => Ok(Vec::new()),
            Some(Value::Array(entries)) => entries
                .iter()
                .map(|entry| serde_json::from_value(entry.clone()).map_err(Into::into))
                .collect(),
            Some(single) => Ok(vec![serde_json::from_value(single.clone())?]),
        }
    }

    /// The first attached proof, if any.
    pub fn first_proof(&self) -> Result<Option<Proof>, DataIntegrityError> {
        Ok(self.proofs()?.into_iter().next())
    }

    /// A deep copy with the entire proof list removed.
    pub fn without_proof(&self) -> Self {
        let mut value = self.0.clone();
        if let Some(object) = value.as_object_mut() {
            object.remove("proof");
        }
        Self(value)
    }

    /// A deep copy with `proof` appended; existing claims are untouched.
    pub fn with_proof(&self, proof: &Proof) -> Result<Self, DataIntegrityError> {
        let proof_value = serde_json::to_value(proof)?;
        let mut value = self.0.clone();
        let object = value.as_object_mut().ok_or_else(|| {
            DataIntegrityError::InvalidArgument("credential root must be a JSON object".to_string())
        })?;
        match object.get_mut("proof") {
            None => {
                object.insert("proof".to_string(), proof_value);
            }
            Some(Value::Array(entries)) => entries.push(proof_value),
            Some(existing) => {
                let previous = existing.take();
                *existing = Value::Array(vec![previous, proof_value]);
            }
        }
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::PROOF_PURPOSE_ASSERTION;
    use chrono::{TimeZone, Utc};

    fn unsigned() -> Credential {
        Credential::new(serde_json::json!({
            "@context": ["https://www.w3.org/ns/credentials/v2"],
            "type": ["VerifiableCredential"],
            "issuer": "did:key:issuer",
            "credentialSubject": { "name": "Jane" }
        }))
        .unwrap()
    }

    fn proof() -> Proof {
        Proof::new(
            "eddsa-jcs-2022",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            "did:key:issuer#key-1",
            PROOF_PURPOSE_ASSERTION,
        )
    }

    #[test]
    fn rejects_non_object_roots() {
        assert!(Credential::new(serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn json_round_trip_is_stable() {
        let text = r#"{"zeta":1,"alpha":{"b":2,"a":3},"@context":["x"]}"#;
        let credential = Credential::from_json_str(text).unwrap();
        assert_eq!(credential.to_json_string().unwrap(), text);
    }

    #[test]
    fn attach_then_strip_restores_the_original() {
        let credential = unsigned();
        let signed = credential.with_proof(&proof()).unwrap();
        assert_eq!(signed.proofs().unwrap().len(), 1);
        assert_eq!(signed.without_proof(), credential);
    }

    #[test]
    fn second_proof_turns_the_member_into_an_array() {
        let signed = unsigned().with_proof(&proof()).unwrap();
        let twice = signed.with_proof(&proof()).unwrap();
        assert!(twice.as_value()["proof"].is_array());
        assert_eq!(twice.proofs().unwrap().len(), 2);
        assert_eq!(twice.first_proof().unwrap().unwrap().proof_purpose, "assertionMethod");
    }
}

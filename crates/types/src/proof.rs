// Path: crates/types/src/proof.rs
//! The Data Integrity proof document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `type` of every proof produced by this workspace.
pub const DATA_INTEGRITY_PROOF_TYPE: &str = "DataIntegrityProof";

/// The default proof purpose for credential issuance.
pub const PROOF_PURPOSE_ASSERTION: &str = "assertionMethod";

/// A Data Integrity proof as embedded in a credential.
///
/// Fields that a malformed credential may omit are optional here so the
/// verification path can fail soft with a structured outcome instead of a
/// deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// JSON-LD context, present only on detached proof documents.
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none", default)]
    pub context: Option<Value>,
    /// Always `DataIntegrityProof` for proofs produced here.
    #[serde(rename = "type")]
    pub proof_type: String,
    /// The cryptosuite identifier, e.g. `ecdsa-sd-2023`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cryptosuite: Option<String>,
    /// Creation timestamp (XSD dateTimeStamp).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created: Option<DateTime<Utc>>,
    /// DID URL of the verification method.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub verification_method: Option<String>,
    /// The proof purpose, e.g. `assertionMethod`.
    #[serde(default)]
    pub proof_purpose: String,
    /// Multibase-encoded proof value. Absent while the proof is being built
    /// and stripped before the proof options are canonicalized.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub proof_value: Option<String>,
}

impl Proof {
    /// Builds a proof skeleton for signing; `proof_value` starts empty.
    pub fn new(
        cryptosuite: impl Into<String>,
        created: DateTime<Utc>,
        verification_method: impl Into<String>,
        proof_purpose: impl Into<String>,
    ) -> Self {
        Self {
            context: None,
            proof_type: DATA_INTEGRITY_PROOF_TYPE.to_string(),
            cryptosuite: Some(cryptosuite.into()),
            created: Some(created),
            verification_method: Some(verification_method.into()),
            proof_purpose: proof_purpose.into(),
            proof_value: None,
        }
    }

    /// A copy of this proof with the proof value removed.
    pub fn without_proof_value(&self) -> Self {
        Self {
            proof_value: None,
            ..self.clone()
        }
    }

    /// The proof-options document that gets canonicalized and hashed.
    ///
    /// `document_context` is the `@context` of the secured document; it is
    /// supplied only for cryptosuites that canonicalize with RDFC, so term
    /// expansion can resolve claim vocabulary.
    pub fn options_document(&self, document_context: Option<&Value>) -> Value {
        let mut object = Map::new();
        if let Some(context) = document_context {
            object.insert("@context".to_string(), context.clone());
        }
        let stripped = self.without_proof_value();
        if let Ok(Value::Object(fields)) = serde_json::to_value(&stripped) {
            for (key, value) in fields {
                // A detached-proof context never overrides the document's.
                if key != "@context" || !object.contains_key("@context") {
                    object.insert(key, value);
                }
            }
        }
        Value::Object(object)
    }
}

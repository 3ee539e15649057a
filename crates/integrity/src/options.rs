// Path: crates/integrity/src/options.rs
//! Proof-options construction and canonical hashing helpers.

use crate::context::ProofContext;
use crate::suites::CryptosuiteDescriptor;
use attest_api::cancel::CancelToken;
use attest_types::credential::Credential;
use attest_types::proof::Proof;
use attest_types::suite::{Canonicalization, HashAlgorithm};
use attest_types::error::DataIntegrityError;
use serde_json::Value;

/// The proof-options document for `proof` over `document`.
///
/// The document's `@context` is copied in iff the suite canonicalizes with
/// RDFC, so that expansion can resolve claim terms; JCS suites hash the
/// options without it.
pub fn options_document(
    proof: &Proof,
    document: &Credential,
    descriptor: &CryptosuiteDescriptor,
) -> Value {
    let context = if descriptor.uses_rdfc() {
        document.context()
    } else {
        None
    };
    proof.options_document(context)
}

/// Canonicalizes `value` the way `descriptor` prescribes.
pub(crate) async fn canonical_bytes(
    ctx: &ProofContext,
    descriptor: &CryptosuiteDescriptor,
    value: &Value,
    cancel: &CancelToken,
) -> Result<Vec<u8>, DataIntegrityError> {
    cancel.checkpoint()?;
    match descriptor.canonicalization {
        Canonicalization::None => Ok(serde_json::to_vec(value)?),
        method => {
            let canonicalizer = ctx.canonicalizer_for(method)?;
            let canonical = canonicalizer
                .canonicalize(value, ctx.context_resolver(), cancel)
                .await?;
            Ok(canonical.into_bytes())
        }
    }
}

/// Hashes canonical bytes under the suite's hash algorithm.
pub(crate) fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> [u8; 32] {
    match algorithm {
        HashAlgorithm::Sha256 => attest_crypto::sha256(bytes),
    }
}

/// Builds, canonicalizes, and hashes the proof options in one step.
pub async fn canonical_options_hash(
    ctx: &ProofContext,
    proof: &Proof,
    document: &Credential,
    descriptor: &CryptosuiteDescriptor,
    cancel: &CancelToken,
) -> Result<[u8; 32], DataIntegrityError> {
    let options = options_document(proof, document, descriptor);
    let bytes = canonical_bytes(ctx, descriptor, &options, cancel).await?;
    Ok(hash_bytes(descriptor.hash, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suites::{ecdsa_sd_2023, eddsa_jcs_2022};
    use attest_types::proof::PROOF_PURPOSE_ASSERTION;
    use chrono::{TimeZone, Utc};

    fn credential() -> Credential {
        Credential::new(serde_json::json!({
            "@context": ["https://www.w3.org/ns/credentials/v2"],
            "type": ["VerifiableCredential"],
            "issuer": "did:key:issuer"
        }))
        .unwrap()
    }

    fn proof(suite: &str) -> Proof {
        Proof::new(
            suite,
            Utc.with_ymd_and_hms(2023, 8, 15, 23, 36, 38).unwrap(),
            "did:key:issuer#key-1",
            PROOF_PURPOSE_ASSERTION,
        )
    }

    #[test]
    fn rdfc_suites_carry_the_document_context() {
        let options = options_document(&proof("ecdsa-sd-2023"), &credential(), &ecdsa_sd_2023());
        assert_eq!(
            options["@context"],
            serde_json::json!(["https://www.w3.org/ns/credentials/v2"])
        );
        assert!(options.get("proofValue").is_none());
    }

    #[test]
    fn jcs_suites_do_not() {
        let options = options_document(&proof("eddsa-jcs-2022"), &credential(), &eddsa_jcs_2022());
        assert!(options.get("@context").is_none());
        assert_eq!(options["cryptosuite"], "eddsa-jcs-2022");
    }

    #[tokio::test]
    async fn jcs_options_hash_is_deterministic() {
        let ctx = crate::ProofContext::builder().build();
        let cancel = attest_api::CancelToken::new();
        let descriptor = eddsa_jcs_2022();
        let first =
            canonical_options_hash(&ctx, &proof("eddsa-jcs-2022"), &credential(), &descriptor, &cancel)
                .await
                .unwrap();
        let second =
            canonical_options_hash(&ctx, &proof("eddsa-jcs-2022"), &credential(), &descriptor, &cancel)
                .await
                .unwrap();
        assert_eq!(first, second);
    }
}

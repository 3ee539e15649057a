// Path: crates/integrity/src/engine/full.rs
//! The full-disclosure engine: `eddsa-rdfc-2022` and `eddsa-jcs-2022`.
//!
//! Both suites sign the concatenation `H(proofOptions) || H(document)` and
//! store the signature base58btc-encoded in `proofValue`.

use crate::codec;
use crate::context::ProofContext;
use crate::engine::{proof_created, SignRequest};
use crate::options::{canonical_bytes, canonical_options_hash, hash_bytes};
use crate::suites::CryptosuiteDescriptor;
use attest_api::cancel::CancelToken;
use attest_types::credential::Credential;
use attest_types::error::DataIntegrityError;
use attest_types::keys::{PrivateKey, PublicKey};
use attest_types::outcome::{InvalidReason, VerificationOutcome};
use attest_types::proof::Proof;
use multibase::Base;

async fn signed_data(
    ctx: &ProofContext,
    credential: &Credential,
    proof: &Proof,
    descriptor: &CryptosuiteDescriptor,
    cancel: &CancelToken,
) -> Result<Vec<u8>, DataIntegrityError> {
    let unsecured = credential.without_proof();
    let document_bytes = canonical_bytes(ctx, descriptor, unsecured.as_value(), cancel).await?;
    let document_hash = hash_bytes(descriptor.hash, &document_bytes);
    let options_hash = canonical_options_hash(ctx, proof, credential, descriptor, cancel).await?;

    let mut data = Vec::with_capacity(options_hash.len() + document_hash.len());
    data.extend_from_slice(&options_hash);
    data.extend_from_slice(&document_hash);
    Ok(data)
}

fn warn_on_missing_contexts(credential: &Credential, descriptor: &CryptosuiteDescriptor) {
    for required in descriptor.required_contexts {
        let present = credential
            .context()
            .map(|context| match context {
                serde_json::Value::Array(entries) => entries.iter().any(|e| e == required),
                other => other == required,
            })
            .unwrap_or(false);
        if !present {
            log::warn!(
                "document signed under {} does not declare the {required} context",
                descriptor.name
            );
        }
    }
}

pub(crate) async fn sign(
    ctx: &ProofContext,
    credential: &Credential,
    key: &PrivateKey,
    descriptor: &CryptosuiteDescriptor,
    request: &SignRequest,
    cancel: &CancelToken,
) -> Result<Credential, DataIntegrityError> {
    if !descriptor.is_key_compatible(key.algorithm()) {
        return Err(DataIntegrityError::InvalidArgument(format!(
            "a {} key cannot sign under {}",
            key.algorithm(),
            descriptor.name
        )));
    }
    warn_on_missing_contexts(credential, descriptor);

    let mut proof = Proof::new(
        descriptor.name,
        proof_created(request.created),
        &request.verification_method,
        &request.proof_purpose,
    );
    let data = signed_data(ctx, credential, &proof, descriptor, cancel).await?;

    let signer = ctx.signers().signer(descriptor.signature_algorithm)?;
    cancel.checkpoint()?;
    let signature = signer.sign(key, &data)?;
    proof.proof_value = Some(codec::encode_base58btc(&signature));

    log::debug!(
        "signed credential under {} ({} byte signature)",
        descriptor.name,
        signature.len()
    );
    credential.with_proof(&proof)
}

pub(crate) async fn verify(
    ctx: &ProofContext,
    credential: &Credential,
    proof: &Proof,
    descriptor: &CryptosuiteDescriptor,
    key: &PublicKey,
    cancel: &CancelToken,
) -> Result<VerificationOutcome, DataIntegrityError> {
    let Some(encoded) = proof.proof_value.as_deref() else {
        return Ok(VerificationOutcome::Invalid(InvalidReason::SignatureInvalid));
    };
    let signature = match codec::decode_expecting(encoded, Base::Base58Btc) {
        Ok(signature) => signature,
        Err(e) => {
            log::debug!("proof value rejected: {e}");
            return Ok(VerificationOutcome::Invalid(InvalidReason::SignatureInvalid));
        }
    };

    let data = signed_data(ctx, credential, proof, descriptor, cancel).await?;
    let verifier = ctx.signers().verifier(descriptor.signature_algorithm)?;
    cancel.checkpoint()?;
    match verifier.verify(key, &data, &signature) {
        Ok(true) => Ok(VerificationOutcome::Valid),
        Ok(false) => Ok(VerificationOutcome::Invalid(InvalidReason::SignatureInvalid)),
        Err(e) => {
            log::debug!("verification key rejected: {e}");
            Ok(VerificationOutcome::Invalid(InvalidReason::SignatureInvalid))
        }
    }
}

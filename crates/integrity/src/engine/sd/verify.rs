// Path: crates/integrity/src/engine/sd/verify.rs
//! The verifier path for derived proofs, and the holder's re-check of a
//! base proof.

use crate::codec::{self, framing};
use crate::context::ProofContext;
use crate::engine::sd::{
    concat_mandatory, ephemeral_key_from_header, signed_base_tuple,
};
use crate::engine::{check_proof, Checked};
use crate::options::{canonical_options_hash, hash_bytes};
use crate::relabel::apply_label_map;
use crate::statements::{prepare_statements, LabelSource};
use crate::suites::{CryptosuiteDescriptor, ECDSA_SD_2023};
use attest_api::cancel::CancelToken;
use attest_api::resolve::VerificationMethodResolver;
use attest_types::credential::Credential;
use attest_types::error::DataIntegrityError;
use attest_types::keys::PublicKey;
use attest_types::outcome::{InvalidReason, VerificationOutcome};
use attest_types::proof::Proof;
use attest_types::suite::Canonicalization;
use multibase::Base;

fn rejected() -> VerificationOutcome {
    VerificationOutcome::Invalid(InvalidReason::SignatureInvalid)
}

/// Verifies the derived proof of a reduced credential under the issuer key
/// resolved by [`check_proof`]. Codec failures reject the credential
/// before any key operation runs.
pub(crate) async fn verify_derived_proof(
    ctx: &ProofContext,
    credential: &Credential,
    proof: &Proof,
    descriptor: &CryptosuiteDescriptor,
    issuer_key: &PublicKey,
    cancel: &CancelToken,
) -> Result<VerificationOutcome, DataIntegrityError> {
    let Some(encoded) = proof.proof_value.as_deref() else {
        return Ok(rejected());
    };
    let derived = match codec::decode_expecting(encoded, Base::Base64Url)
        .and_then(|bytes| framing::parse_derived_proof(&bytes))
    {
        Ok(derived) => derived,
        Err(e) => {
            log::debug!("derived proof value rejected: {e}");
            return Ok(rejected());
        }
    };
    let ephemeral_key = match ephemeral_key_from_header(&derived.ephemeral_public_key) {
        Ok(key) => key,
        Err(e) => {
            log::debug!("embedded ephemeral key rejected: {e}");
            return Ok(rejected());
        }
    };

    // Re-canonicalize the reduced credential and bring it back into the
    // issuer's HMAC label space.
    let unsecured = credential.without_proof();
    cancel.checkpoint()?;
    let canonical = ctx
        .canonicalizer_for(Canonicalization::Rdfc10)?
        .canonicalize(unsecured.as_value(), ctx.context_resolver(), cancel)
        .await?
        .into_statements()?;
    let mut sorted = apply_label_map(&canonical, &derived.label_map);
    sorted.sort();

    let mandatory = match concat_mandatory(&sorted, &derived.mandatory_indexes) {
        Ok(bytes) => bytes,
        Err(_) => {
            log::debug!("derived proof mandatory indexes fall outside the reduced statements");
            return Ok(rejected());
        }
    };
    let mandatory_hash = hash_bytes(descriptor.hash, &mandatory);
    let options_hash = canonical_options_hash(ctx, proof, credential, descriptor, cancel).await?;
    let tuple = signed_base_tuple(&options_hash, &derived.ephemeral_public_key, &mandatory_hash);

    let verifier = ctx.signers().verifier(descriptor.signature_algorithm)?;
    cancel.checkpoint()?;
    match verifier.verify(issuer_key, &tuple, &derived.base_signature) {
        Ok(true) => {}
        Ok(false) => return Ok(rejected()),
        Err(e) => {
            log::debug!("issuer key rejected: {e}");
            return Ok(rejected());
        }
    }

    // Every statement not covered by a mandatory index must come with a
    // disclosed signature, paired in ascending order.
    let non_mandatory: Vec<usize> = (0..sorted.len())
        .filter(|index| !derived.mandatory_indexes.contains(index))
        .collect();
    if non_mandatory.len() != derived.disclosed_signatures.len() {
        log::debug!(
            "derived proof discloses {} signatures for {} non-mandatory statements",
            derived.disclosed_signatures.len(),
            non_mandatory.len()
        );
        return Ok(rejected());
    }
    for (&index, signature) in non_mandatory.iter().zip(&derived.disclosed_signatures) {
        cancel.checkpoint()?;
        let Some(statement) = sorted.get(index) else {
            return Ok(rejected());
        };
        match verifier.verify(&ephemeral_key, statement.as_bytes(), signature) {
            Ok(true) => {}
            Ok(false) => return Ok(rejected()),
            Err(e) => {
                log::debug!("ephemeral key rejected: {e}");
                return Ok(rejected());
            }
        }
    }

    log::debug!(
        "derived proof verified: {} statements, {} disclosed signatures",
        sorted.len(),
        derived.disclosed_signatures.len()
    );
    Ok(VerificationOutcome::Valid)
}

/// Re-verifies a *base* proof, as a holder does before deriving from a
/// freshly received credential.
pub async fn verify_base_proof(
    ctx: &ProofContext,
    credential: &Credential,
    resolver: &dyn VerificationMethodResolver,
    cancel: &CancelToken,
) -> Result<VerificationOutcome, DataIntegrityError> {
    let (proof, descriptor, issuer_key) = match check_proof(ctx, credential, resolver)? {
        Checked::Rejected(outcome) => return Ok(outcome),
        Checked::Accepted {
            proof,
            descriptor,
            key,
        } => (proof, descriptor, key),
    };
    if descriptor.name != ECDSA_SD_2023 {
        return Err(DataIntegrityError::InvalidArgument(format!(
            "{} proofs have no base form",
            descriptor.name
        )));
    }
    let Some(encoded) = proof.proof_value.as_deref() else {
        return Ok(rejected());
    };
    let base = match codec::decode_expecting(encoded, Base::Base64Url)
        .and_then(|bytes| framing::parse_base_proof(&bytes))
    {
        Ok(base) => base,
        Err(e) => {
            log::debug!("base proof value rejected: {e}");
            return Ok(rejected());
        }
    };
    let ephemeral_key = match ephemeral_key_from_header(&base.ephemeral_public_key) {
        Ok(key) => key,
        Err(e) => {
            log::debug!("embedded ephemeral key rejected: {e}");
            return Ok(rejected());
        }
    };

    let unsecured = credential.without_proof();
    cancel.checkpoint()?;
    let partitioned = ctx
        .partitioner()?
        .partition(
            unsecured.as_value(),
            &base.mandatory_pointers,
            ctx.canonicalizer_for(Canonicalization::Rdfc10)?,
            ctx.context_resolver(),
            cancel,
        )
        .await?;
    let prepared = prepare_statements(
        &partitioned.all_statements,
        &partitioned.mandatory_indexes,
        LabelSource::HmacKey(&base.hmac_key),
    )?;

    let mandatory_hash = hash_bytes(
        descriptor.hash,
        &concat_mandatory(&prepared.sorted_statements, &prepared.mandatory_indexes)?,
    );
    let options_hash = canonical_options_hash(ctx, &proof, credential, descriptor, cancel).await?;
    let tuple = signed_base_tuple(&options_hash, &base.ephemeral_public_key, &mandatory_hash);

    let verifier = ctx.signers().verifier(descriptor.signature_algorithm)?;
    cancel.checkpoint()?;
    match verifier.verify(&issuer_key, &tuple, &base.base_signature) {
        Ok(true) => {}
        Ok(false) => return Ok(rejected()),
        Err(e) => {
            log::debug!("issuer key rejected: {e}");
            return Ok(rejected());
        }
    }

    if prepared.non_mandatory_indexes.len() != base.statement_signatures.len() {
        return Ok(rejected());
    }
    for (&index, signature) in prepared
        .non_mandatory_indexes
        .iter()
        .zip(&base.statement_signatures)
    {
        cancel.checkpoint()?;
        let Some(statement) = prepared.sorted_statements.get(index) else {
            return Ok(rejected());
        };
        match verifier.verify(&ephemeral_key, statement.as_bytes(), signature) {
            Ok(true) => {}
            Ok(false) => return Ok(rejected()),
            Err(e) => {
                log::debug!("ephemeral key rejected: {e}");
                return Ok(rejected());
            }
        }
    }
    Ok(VerificationOutcome::Valid)
}

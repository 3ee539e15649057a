// Path: crates/integrity/src/engine/sd/derive.rs
//! The holder path: deriving a selectively-disclosed credential.

use crate::codec::{self, framing};
use crate::context::ProofContext;
use crate::engine::sd::labels::recover_label_map;
use crate::relabel::apply_label_map;
use crate::statements::{prepare_statements, LabelSource};
use crate::suites::ECDSA_SD_2023;
use attest_api::cancel::CancelToken;
use attest_types::credential::Credential;
use attest_types::error::{CodecError, DataIntegrityError};
use attest_types::suite::Canonicalization;
use multibase::Base;
use std::collections::{BTreeSet, HashMap};

/// Parameters of a proof derivation.
#[derive(Debug, Clone, Default)]
pub struct DeriveRequest {
    /// JSON Pointers the verifier asked to see.
    pub disclose_pointers: Vec<String>,
    /// JSON Pointers the holder refuses to disclose. Exclusions never
    /// override the issuer's mandatory pointers.
    pub exclude_pointers: Vec<String>,
}

impl DeriveRequest {
    /// A request disclosing the given pointers with no exclusions.
    pub fn new(disclose_pointers: Vec<String>) -> Self {
        Self {
            disclose_pointers,
            exclude_pointers: Vec::new(),
        }
    }

    /// Sets the exclusions.
    pub fn with_exclusions(mut self, exclude_pointers: Vec<String>) -> Self {
        self.exclude_pointers = exclude_pointers;
        self
    }
}

fn covered_by(pointer: &str, exclusion: &str) -> bool {
    pointer == exclusion
        || (pointer.starts_with(exclusion) && pointer.as_bytes().get(exclusion.len()) == Some(&b'/'))
}

/// The pointer set to disclose: mandatory pointers always, requested
/// pointers unless an exclusion covers them.
fn disclosure_pointers(
    mandatory: &[String],
    requested: &[String],
    excluded: &[String],
) -> Vec<String> {
    let mut selected: BTreeSet<String> = BTreeSet::new();
    for pointer in mandatory {
        if excluded.iter().any(|e| covered_by(pointer, e)) {
            log::warn!("exclusion covers mandatory pointer {pointer}; it is disclosed regardless");
        }
        selected.insert(pointer.clone());
    }
    for pointer in requested {
        if excluded.iter().any(|e| covered_by(pointer, e)) {
            continue;
        }
        selected.insert(pointer.clone());
    }
    selected.into_iter().collect()
}

/// Reduces `credential` to the requested disclosure and attaches a derived
/// proof.
///
/// The credential must carry a *base* `ecdsa-sd-2023` proof; a derived
/// proof cannot be derived again because the ephemeral private key it would
/// need no longer exists.
pub async fn derive_proof(
    ctx: &ProofContext,
    credential: &Credential,
    request: &DeriveRequest,
    cancel: &CancelToken,
) -> Result<Credential, DataIntegrityError> {
    let proof = credential.first_proof()?.ok_or_else(|| {
        DataIntegrityError::InvalidArgument("credential carries no proof to derive from".to_string())
    })?;
    if proof.cryptosuite.as_deref() != Some(ECDSA_SD_2023) {
        return Err(DataIntegrityError::InvalidArgument(format!(
            "cannot derive from a {} proof",
            proof.cryptosuite.as_deref().unwrap_or("untyped")
        )));
    }
    let encoded = proof.proof_value.as_deref().ok_or_else(|| {
        CodecError::MalformedProofValue("base proof carries no proof value".to_string())
    })?;
    let base = framing::parse_base_proof(&codec::decode_expecting(encoded, Base::Base64Url)?)?;

    // Reproduce the issuer's prepared ordering from the embedded HMAC key.
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
    if prepared.non_mandatory_indexes.len() != base.statement_signatures.len() {
        return Err(CodecError::MalformedProofValue(format!(
            "base proof carries {} statement signatures for {} non-mandatory statements",
            base.statement_signatures.len(),
            prepared.non_mandatory_indexes.len()
        ))
        .into());
    }

    // Non-mandatory statement text -> signature, honoring multiset
    // semantics for duplicate statements.
    let mut signatures_by_statement: HashMap<&str, Vec<&[u8]>> = HashMap::new();
    for (&index, signature) in prepared
        .non_mandatory_indexes
        .iter()
        .zip(&base.statement_signatures)
    {
        let statement = prepared.sorted_statements.get(index).ok_or_else(|| {
            DataIntegrityError::InvalidArgument(format!(
                "non-mandatory index {index} is out of range"
            ))
        })?;
        signatures_by_statement
            .entry(statement.as_str())
            .or_default()
            .push(signature.as_slice());
    }

    let selected = disclosure_pointers(
        &base.mandatory_pointers,
        &request.disclose_pointers,
        &request.exclude_pointers,
    );
    cancel.checkpoint()?;
    let reduced_value = ctx.selector()?.select(unsecured.as_value(), &selected)?;
    let reduced = Credential::new(reduced_value)?;

    // The reduced graph canonicalizes independently and may renumber its
    // blank nodes, so its label map has to be recovered, not reused.
    cancel.checkpoint()?;
    let reduced_canonical = ctx
        .canonicalizer_for(Canonicalization::Rdfc10)?
        .canonicalize(reduced.as_value(), ctx.context_resolver(), cancel)
        .await?
        .into_statements()?;
    let reduced_label_map = recover_label_map(
        &reduced_canonical,
        &prepared.sorted_statements,
        &prepared.label_map,
    )?;

    let mut reduced_sorted = apply_label_map(&reduced_canonical, &reduced_label_map);
    reduced_sorted.sort();

    // A statement with a signature was non-mandatory in the full credential
    // and its signature is disclosed; a statement without one must have
    // been mandatory, and its reduced-sorted index is recorded instead.
    let mut disclosed_signatures = Vec::new();
    let mut mandatory_indexes = Vec::new();
    for (index, statement) in reduced_sorted.iter().enumerate() {
        cancel.checkpoint()?;
        match signatures_by_statement
            .get_mut(statement.as_str())
            .and_then(Vec::pop)
        {
            Some(signature) => disclosed_signatures.push(signature.to_vec()),
            None => mandatory_indexes.push(index),
        }
    }

    let derived = framing::DerivedProofValue {
        base_signature: base.base_signature.clone(),
        ephemeral_public_key: base.ephemeral_public_key.clone(),
        disclosed_signatures,
        label_map: reduced_label_map,
        mandatory_indexes,
    };

    let mut derived_proof = proof.without_proof_value();
    derived_proof.proof_value = Some(codec::encode_base64url(
        &framing::serialize_derived_proof(&derived)?,
    ));

    log::debug!(
        "derived proof over {} statements ({} disclosed signatures, {} mandatory)",
        reduced_sorted.len(),
        derived.disclosed_signatures.len(),
        derived.mandatory_indexes.len()
    );
    reduced.with_proof(&derived_proof)
}

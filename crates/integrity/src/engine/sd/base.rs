// Path: crates/integrity/src/engine/sd/base.rs
//! The issuer path: creating a base proof.

use crate::codec::{self, framing};
use crate::context::ProofContext;
use crate::engine::proof_created;
use crate::engine::sd::{concat_mandatory, ephemeral_key_with_header, signed_base_tuple};
use crate::options::{canonical_options_hash, hash_bytes};
use crate::relabel::LabelMap;
use crate::statements::{prepare_statements, LabelSource};
use crate::suites::ECDSA_SD_2023;
use attest_api::cancel::CancelToken;
use attest_types::credential::Credential;
use attest_types::error::DataIntegrityError;
use attest_types::keys::{HmacKey, KeyPair, PrivateKey};
use attest_types::proof::{Proof, PROOF_PURPOSE_ASSERTION};
use attest_types::suite::Canonicalization;
use chrono::{DateTime, Utc};

/// Parameters of a base-proof issuance.
#[derive(Debug, Clone)]
pub struct BaseProofRequest {
    /// DID URL of the issuer's verification method.
    pub verification_method: String,
    /// The proof purpose; defaults to `assertionMethod`.
    pub proof_purpose: String,
    /// Proof timestamp; the current time when absent.
    pub created: Option<DateTime<Utc>>,
    /// JSON Pointers whose statements every derived credential must retain.
    pub mandatory_pointers: Vec<String>,
}

impl BaseProofRequest {
    /// A request with the default purpose and a fresh timestamp.
    pub fn new(verification_method: impl Into<String>) -> Self {
        Self {
            verification_method: verification_method.into(),
            proof_purpose: PROOF_PURPOSE_ASSERTION.to_string(),
            created: None,
            mandatory_pointers: Vec::new(),
        }
    }

    /// Sets the mandatory pointers.
    pub fn with_mandatory_pointers(mut self, pointers: Vec<String>) -> Self {
        self.mandatory_pointers = pointers;
        self
    }

    /// Pins the proof timestamp.
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

/// Intermediate artifacts of a base-proof issuance, exposed by the verbose
/// entry point for test-vector validation. The HMAC key zeroizes on drop.
pub struct BaseProofArtifacts {
    /// The document's canonical statements before relabeling.
    pub all_statements: Vec<String>,
    /// Relabeled statements in sorted order.
    pub sorted_statements: Vec<String>,
    /// Canonical-to-HMAC label map, bare form.
    pub label_map: LabelMap,
    /// Sorted-order indexes of the mandatory statements.
    pub mandatory_indexes: Vec<usize>,
    /// Sorted-order indexes of the non-mandatory statements.
    pub non_mandatory_indexes: Vec<usize>,
    /// SHA-256 over the concatenated mandatory statements.
    pub mandatory_hash: [u8; 32],
    /// SHA-256 over the canonical proof options.
    pub proof_options_hash: [u8; 32],
    /// The relabeling key embedded in the proof value.
    pub hmac_key: HmacKey,
}

/// Creates a base proof and attaches it to a copy of `credential`.
///
/// The ephemeral key pair is used once: its public half (compressed, with
/// multicodec header) is embedded in the proof value, its private half
/// signs each non-mandatory statement and should be dropped by the caller
/// afterwards.
pub async fn create_base_proof(
    ctx: &ProofContext,
    credential: &Credential,
    issuer_key: &PrivateKey,
    ephemeral: &KeyPair,
    request: &BaseProofRequest,
    cancel: &CancelToken,
) -> Result<Credential, DataIntegrityError> {
    let (secured, _) =
        create_base_proof_verbose(ctx, credential, issuer_key, ephemeral, request, cancel).await?;
    Ok(secured)
}

/// [`create_base_proof`], additionally returning the pipeline artifacts.
pub async fn create_base_proof_verbose(
    ctx: &ProofContext,
    credential: &Credential,
    issuer_key: &PrivateKey,
    ephemeral: &KeyPair,
    request: &BaseProofRequest,
    cancel: &CancelToken,
) -> Result<(Credential, BaseProofArtifacts), DataIntegrityError> {
    let descriptor = ctx.suites().get(ECDSA_SD_2023)?;
    if !descriptor.is_key_compatible(issuer_key.algorithm()) {
        return Err(DataIntegrityError::InvalidArgument(format!(
            "a {} key cannot sign under {}",
            issuer_key.algorithm(),
            descriptor.name
        )));
    }
    let ephemeral_framed = ephemeral_key_with_header(&ephemeral.public)?;

    let unsecured = credential.without_proof();
    cancel.checkpoint()?;
    let partitioned = ctx
        .partitioner()?
        .partition(
            unsecured.as_value(),
            &request.mandatory_pointers,
            ctx.canonicalizer_for(Canonicalization::Rdfc10)?,
            ctx.context_resolver(),
            cancel,
        )
        .await?;

    let hmac_key = ctx.hmac_keys().generate()?;
    let prepared = prepare_statements(
        &partitioned.all_statements,
        &partitioned.mandatory_indexes,
        LabelSource::HmacKey(&hmac_key),
    )?;
    let mandatory_hash = hash_bytes(
        descriptor.hash,
        &concat_mandatory(&prepared.sorted_statements, &prepared.mandatory_indexes)?,
    );

    let mut proof = Proof::new(
        descriptor.name,
        proof_created(request.created),
        &request.verification_method,
        &request.proof_purpose,
    );
    let proof_options_hash =
        canonical_options_hash(ctx, &proof, credential, descriptor, cancel).await?;

    let signer = ctx.signers().signer(descriptor.signature_algorithm)?;
    let tuple = signed_base_tuple(&proof_options_hash, &ephemeral_framed, &mandatory_hash);
    cancel.checkpoint()?;
    let base_signature = signer.sign(issuer_key, &tuple)?;

    // One signature per non-mandatory statement, in ascending sorted-index
    // order; this ordering is the only way the verifier can re-align them.
    let mut statement_signatures = Vec::with_capacity(prepared.non_mandatory_indexes.len());
    for &index in &prepared.non_mandatory_indexes {
        cancel.checkpoint()?;
        let statement = prepared.sorted_statements.get(index).ok_or_else(|| {
            DataIntegrityError::InvalidArgument(format!(
                "non-mandatory index {index} is out of range"
            ))
        })?;
        statement_signatures.push(signer.sign(&ephemeral.secret, statement.as_bytes())?);
    }

    let value = framing::BaseProofValue {
        base_signature,
        ephemeral_public_key: ephemeral_framed,
        hmac_key: hmac_key.clone(),
        statement_signatures,
        mandatory_pointers: request.mandatory_pointers.clone(),
    };
    proof.proof_value = Some(codec::encode_base64url(&framing::serialize_base_proof(
        &value,
    )?));

    log::debug!(
        "created base proof: {} statements, {} mandatory, {} signed individually",
        prepared.sorted_statements.len(),
        prepared.mandatory_indexes.len(),
        prepared.non_mandatory_indexes.len()
    );

    let secured = credential.with_proof(&proof)?;
    let artifacts = BaseProofArtifacts {
        all_statements: partitioned.all_statements,
        sorted_statements: prepared.sorted_statements,
        label_map: prepared.label_map,
        mandatory_indexes: prepared.mandatory_indexes,
        non_mandatory_indexes: prepared.non_mandatory_indexes,
        mandatory_hash,
        proof_options_hash,
        hmac_key,
    };
    Ok((secured, artifacts))
}

// Path: crates/integrity/src/engine/mod.rs
//! Cryptosuite dispatch and the shared verification pre-flight.

pub mod full;
pub mod sd;

use crate::context::ProofContext;
use crate::suites::{CryptosuiteDescriptor, ECDSA_SD_2023};
use attest_api::cancel::CancelToken;
use attest_api::resolve::VerificationMethodResolver;
use attest_types::credential::Credential;
use attest_types::error::{DataIntegrityError, RegistryError};
use attest_types::keys::{PrivateKey, PublicKey};
use attest_types::outcome::{InvalidReason, VerificationOutcome};
use attest_types::proof::{Proof, PROOF_PURPOSE_ASSERTION};
use chrono::{DateTime, Timelike, Utc};

/// Parameters of a full-disclosure signing operation.
#[derive(Debug, Clone)]
pub struct SignRequest {
    /// The cryptosuite to sign under.
    pub cryptosuite: String,
    /// DID URL of the verification method to record in the proof.
    pub verification_method: String,
    /// The proof purpose; defaults to `assertionMethod`.
    pub proof_purpose: String,
    /// Proof timestamp; the current time when absent.
    pub created: Option<DateTime<Utc>>,
}

impl SignRequest {
    /// A request with the default purpose and a fresh timestamp.
    pub fn new(cryptosuite: impl Into<String>, verification_method: impl Into<String>) -> Self {
        Self {
            cryptosuite: cryptosuite.into(),
            verification_method: verification_method.into(),
            proof_purpose: PROOF_PURPOSE_ASSERTION.to_string(),
            created: None,
        }
    }

    /// Pins the proof timestamp.
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

/// The proof timestamp to record: the requested one, or now at whole-second
/// precision.
pub(crate) fn proof_created(requested: Option<DateTime<Utc>>) -> DateTime<Utc> {
    requested.unwrap_or_else(|| {
        let now = Utc::now();
        now.with_nanosecond(0).unwrap_or(now)
    })
}

/// Secures `credential` under the requested cryptosuite.
///
/// Dispatches through the cryptosuite registry; the selective-disclosure
/// suite needs mandatory pointers and an ephemeral key, so it has its own
/// entry point ([`sd::base::create_base_proof`]).
pub async fn sign(
    ctx: &ProofContext,
    credential: &Credential,
    key: &PrivateKey,
    request: &SignRequest,
    cancel: &CancelToken,
) -> Result<Credential, DataIntegrityError> {
    let descriptor = ctx.suites().get(&request.cryptosuite)?;
    if descriptor.name == ECDSA_SD_2023 {
        return Err(DataIntegrityError::InvalidArgument(
            "ecdsa-sd-2023 proofs are created with create_base_proof".to_string(),
        ));
    }
    full::sign(ctx, credential, key, descriptor, request, cancel).await
}

/// Verifies the first proof of `credential`, dispatching by cryptosuite.
///
/// For `ecdsa-sd-2023` this is the verifier-side check of a *derived*
/// proof; holders re-verify base proofs with [`sd::verify::verify_base_proof`].
pub async fn verify(
    ctx: &ProofContext,
    credential: &Credential,
    resolver: &dyn VerificationMethodResolver,
    cancel: &CancelToken,
) -> Result<VerificationOutcome, DataIntegrityError> {
    let (proof, descriptor, key) = match check_proof(ctx, credential, resolver)? {
        Checked::Rejected(outcome) => return Ok(outcome),
        Checked::Accepted {
            proof,
            descriptor,
            key,
        } => (proof, descriptor, key),
    };
    if descriptor.name == ECDSA_SD_2023 {
        sd::verify::verify_derived_proof(ctx, credential, &proof, descriptor, &key, cancel).await
    } else {
        full::verify(ctx, credential, &proof, descriptor, &key, cancel).await
    }
}

/// Outcome of the shared verification pre-flight.
pub(crate) enum Checked<'a> {
    /// The credential is rejected before any cryptography runs.
    Rejected(VerificationOutcome),
    /// The proof is structurally sound and its key resolved.
    Accepted {
        proof: Proof,
        descriptor: &'a CryptosuiteDescriptor,
        key: PublicKey,
    },
}

/// Extracts the first proof and resolves everything verification needs,
/// failing fast with a structured outcome on the structural checks.
pub(crate) fn check_proof<'a>(
    ctx: &'a ProofContext,
    credential: &Credential,
    resolver: &dyn VerificationMethodResolver,
) -> Result<Checked<'a>, DataIntegrityError> {
    let Some(proof) = credential.first_proof()? else {
        return Ok(Checked::Rejected(VerificationOutcome::Invalid(
            InvalidReason::NoProof,
        )));
    };
    let cryptosuite = match proof.cryptosuite.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Ok(Checked::Rejected(VerificationOutcome::Invalid(
                InvalidReason::MissingCryptosuite,
            )))
        }
    };
    let descriptor = match ctx.suites().get(cryptosuite) {
        Ok(descriptor) => descriptor,
        Err(RegistryError::UnknownCryptosuite(name)) => {
            log::warn!("cannot verify proof under unregistered cryptosuite {name}");
            return Ok(Checked::Rejected(VerificationOutcome::Invalid(
                InvalidReason::UnknownCryptosuite,
            )));
        }
        Err(e) => return Err(e.into()),
    };
    let method = match proof.verification_method.as_deref() {
        Some(method) if !method.is_empty() => method,
        _ => {
            return Ok(Checked::Rejected(VerificationOutcome::Invalid(
                InvalidReason::MissingVerificationMethod,
            )))
        }
    };
    let Some(key) = resolver.resolve(method) else {
        return Ok(Checked::Rejected(VerificationOutcome::Invalid(
            InvalidReason::VerificationMethodNotFound,
        )));
    };
    if !descriptor.is_key_compatible(key.algorithm()) {
        log::warn!(
            "verification method {method} carries {} key, incompatible with {}",
            key.algorithm(),
            descriptor.name
        );
        return Ok(Checked::Rejected(VerificationOutcome::Invalid(
            InvalidReason::SignatureInvalid,
        )));
    }
    Ok(Checked::Accepted {
        proof,
        descriptor,
        key,
    })
}

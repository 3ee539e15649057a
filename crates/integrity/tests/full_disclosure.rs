// Path: crates/integrity/tests/full_disclosure.rs
//! Full-disclosure suite flows: `eddsa-jcs-2022` end to end with real JCS,
//! `eddsa-rdfc-2022` against fixture canonicalizations.

mod common;

use attest_api::cancel::CancelToken;
use attest_api::resolve::StaticMethodResolver;
use attest_crypto::sign::eddsa::keypair_from_seed;
use attest_integrity::{
    sign, verify, ProofContext, ProofContextBuilder, SignRequest, ECDSA_SD_2023, EDDSA_JCS_2022,
    EDDSA_RDFC_2022,
};
use attest_types::credential::Credential;
use attest_types::error::DataIntegrityError;
use attest_types::keys::KeyPair;
use attest_types::outcome::{InvalidReason, VerificationOutcome};
use chrono::{TimeZone, Utc};
use common::FixtureCanonicalizer;
use serde_json::json;
use std::sync::Arc;

const METHOD: &str = "did:key:z6MkSigner#z6MkSigner";
const SEED: [u8; 32] = [0x5c; 32];

fn signer() -> KeyPair {
    keypair_from_seed(&SEED)
}

fn resolver(pair: &KeyPair) -> StaticMethodResolver {
    StaticMethodResolver::new().with(METHOD, pair.public.clone())
}

fn degree_credential() -> Credential {
    Credential::new(json!({
        "@context": [
            "https://www.w3.org/ns/credentials/v2",
            "https://www.w3.org/ns/credentials/examples/v2"
        ],
        "id": "urn:example:cred:degree:7",
        "type": ["VerifiableCredential", "ExampleDegreeCredential"],
        "issuer": "did:key:z6MkSigner",
        "validFrom": "2024-01-01T00:00:00Z",
        "credentialSubject": {
            "id": "did:example:alice",
            "degree": { "type": "ExampleBachelorDegree", "name": "Bachelor of Science" }
        }
    }))
    .unwrap()
}

fn jcs_request() -> SignRequest {
    SignRequest::new(EDDSA_JCS_2022, METHOD)
        .with_created(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

#[tokio::test]
async fn jcs_round_trip_and_determinism() {
    let ctx = ProofContext::builder().build();
    let cancel = CancelToken::new();
    let pair = signer();

    let signed = sign(&ctx, &degree_credential(), &pair.secret, &jcs_request(), &cancel)
        .await
        .unwrap();
    let proof = signed.first_proof().unwrap().unwrap();
    assert!(proof.proof_value.as_deref().unwrap().starts_with('z'));
    assert_eq!(signed.without_proof(), degree_credential());

    let outcome = verify(&ctx, &signed, &resolver(&pair), &cancel).await.unwrap();
    assert!(outcome.is_valid());

    // Fixed timestamp plus deterministic Ed25519 means byte-equal output.
    let again = sign(&ctx, &degree_credential(), &pair.secret, &jcs_request(), &cancel)
        .await
        .unwrap();
    assert_eq!(
        signed.to_json_string().unwrap(),
        again.to_json_string().unwrap()
    );
}

#[tokio::test]
async fn any_claim_mutation_invalidates_the_signature() {
    let ctx = ProofContext::builder().build();
    let cancel = CancelToken::new();
    let pair = signer();
    let signed = sign(&ctx, &degree_credential(), &pair.secret, &jcs_request(), &cancel)
        .await
        .unwrap();

    let mut tampered = signed.clone().into_value();
    tampered["credentialSubject"]["degree"]["name"] = "Bachelor of Arts".into();
    let tampered = Credential::new(tampered).unwrap();

    let outcome = verify(&ctx, &tampered, &resolver(&pair), &cancel).await.unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Invalid(InvalidReason::SignatureInvalid)
    );
}

#[tokio::test]
async fn verification_with_another_key_fails() {
    let ctx = ProofContext::builder().build();
    let cancel = CancelToken::new();
    let pair = signer();
    let signed = sign(&ctx, &degree_credential(), &pair.secret, &jcs_request(), &cancel)
        .await
        .unwrap();

    let other = keypair_from_seed(&[0x77; 32]);
    let outcome = verify(&ctx, &signed, &resolver(&other), &cancel).await.unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Invalid(InvalidReason::SignatureInvalid)
    );
}

#[tokio::test]
async fn structural_failures_are_reported_not_thrown() {
    let ctx = ProofContext::builder().build();
    let cancel = CancelToken::new();
    let pair = signer();
    let resolver = resolver(&pair);

    let unsigned = degree_credential();
    let outcome = verify(&ctx, &unsigned, &resolver, &cancel).await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Invalid(InvalidReason::NoProof));

    let signed = sign(&ctx, &unsigned, &pair.secret, &jcs_request(), &cancel)
        .await
        .unwrap();

    let mut no_suite = signed.clone().into_value();
    no_suite["proof"]
        .as_object_mut()
        .unwrap()
        .remove("cryptosuite");
    let outcome = verify(&ctx, &Credential::new(no_suite).unwrap(), &resolver, &cancel)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Invalid(InvalidReason::MissingCryptosuite)
    );

    let mut unknown_suite = signed.clone().into_value();
    unknown_suite["proof"]["cryptosuite"] = "bbs-termwise-2023".into();
    let outcome = verify(
        &ctx,
        &Credential::new(unknown_suite).unwrap(),
        &resolver,
        &cancel,
    )
    .await
    .unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Invalid(InvalidReason::UnknownCryptosuite)
    );

    let mut no_method = signed.clone().into_value();
    no_method["proof"]
        .as_object_mut()
        .unwrap()
        .remove("verificationMethod");
    let outcome = verify(&ctx, &Credential::new(no_method).unwrap(), &resolver, &cancel)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Invalid(InvalidReason::MissingVerificationMethod)
    );

    let strangers = StaticMethodResolver::new();
    let outcome = verify(&ctx, &signed, &strangers, &cancel).await.unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Invalid(InvalidReason::VerificationMethodNotFound)
    );
}

#[tokio::test]
async fn rdfc_binds_the_declared_contexts() {
    // Dropping the examples context changes what the (fixture) RDFC
    // canonicalization emits, exactly as term-dropping does in real RDFC.
    let full = degree_credential();
    let mut stripped_value = full.clone().into_value();
    stripped_value["@context"] = json!(["https://www.w3.org/ns/credentials/v2"]);

    let full_statements = vec![
        "<urn:example:cred:degree:7> <https://www.w3.org/2018/credentials#issuer> <did:key:z6MkSigner> .\n".to_string(),
        "<did:example:alice> <https://example.org/examples#degree> _:c14n0 .\n".to_string(),
        "_:c14n0 <https://example.org/examples#name> \"Bachelor of Science\" .\n".to_string(),
    ];
    // Without the examples context the degree terms drop out entirely.
    let stripped_statements = vec![full_statements[0].clone()];

    let ctx: ProofContext = ProofContextBuilder::default()
        .with_canonicalizer(Arc::new(FixtureCanonicalizer::rdfc(vec![
            (full.clone().into_value(), full_statements),
            (stripped_value, stripped_statements),
        ])))
        .build();
    let cancel = CancelToken::new();
    let pair = signer();

    let request = SignRequest::new(EDDSA_RDFC_2022, METHOD)
        .with_created(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let signed = sign(&ctx, &full, &pair.secret, &request, &cancel).await.unwrap();
    let outcome = verify(&ctx, &signed, &resolver(&pair), &cancel).await.unwrap();
    assert!(outcome.is_valid());

    // Delete the examples context from the signed credential.
    let mut reduced = signed.into_value();
    reduced["@context"] = json!(["https://www.w3.org/ns/credentials/v2"]);
    let outcome = verify(
        &ctx,
        &Credential::new(reduced).unwrap(),
        &resolver(&pair),
        &cancel,
    )
    .await
    .unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Invalid(InvalidReason::SignatureInvalid)
    );
}

#[tokio::test]
async fn sd_proofs_cannot_be_signed_through_the_generic_entry_point() {
    let ctx = ProofContext::builder().build();
    let cancel = CancelToken::new();
    let pair = signer();
    let result = sign(
        &ctx,
        &degree_credential(),
        &pair.secret,
        &SignRequest::new(ECDSA_SD_2023, METHOD),
        &cancel,
    )
    .await;
    assert!(matches!(result, Err(DataIntegrityError::InvalidArgument(_))));
}

#[tokio::test]
async fn cancelled_tokens_abort_signing() {
    let ctx = ProofContext::builder().build();
    let cancel = CancelToken::new();
    cancel.cancel();
    let pair = signer();
    let result = sign(&ctx, &degree_credential(), &pair.secret, &jcs_request(), &cancel).await;
    assert!(matches!(result, Err(DataIntegrityError::Cancelled)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_signing_does_not_cross_contaminate() {
    let ctx = Arc::new(ProofContext::builder().build());
    let pair_a = signer();
    let pair_b = keypair_from_seed(&[0x99; 32]);

    let mut second = degree_credential().into_value();
    second["credentialSubject"]["degree"]["name"] = "Bachelor of Engineering".into();
    let credential_a = degree_credential();
    let credential_b = Credential::new(second).unwrap();

    let task_a = {
        let ctx = Arc::clone(&ctx);
        let secret = pair_a.secret.clone();
        let credential = credential_a.clone();
        tokio::spawn(async move {
            sign(&ctx, &credential, &secret, &jcs_request(), &CancelToken::new()).await
        })
    };
    let task_b = {
        let ctx = Arc::clone(&ctx);
        let secret = pair_b.secret.clone();
        let credential = credential_b.clone();
        tokio::spawn(async move {
            sign(&ctx, &credential, &secret, &jcs_request(), &CancelToken::new()).await
        })
    };

    let signed_a = task_a.await.unwrap().unwrap();
    let signed_b = task_b.await.unwrap().unwrap();

    let value_a = signed_a.first_proof().unwrap().unwrap().proof_value.unwrap();
    let value_b = signed_b.first_proof().unwrap().unwrap().proof_value.unwrap();
    assert_ne!(value_a, value_b);

    let cancel = CancelToken::new();
    assert!(verify(&ctx, &signed_a, &resolver(&pair_a), &cancel)
        .await
        .unwrap()
        .is_valid());
    assert!(verify(&ctx, &signed_b, &resolver(&pair_b), &cancel)
        .await
        .unwrap()
        .is_valid());
}

// Path: crates/integrity/src/lib.rs
//! Data Integrity proof engines for W3C Verifiable Credentials.
//!
//! This crate implements the proof pipelines for the full-disclosure suites
//! `eddsa-rdfc-2022` and `eddsa-jcs-2022` and the selective-disclosure suite
//! `ecdsa-sd-2023`: canonicalization and hashing orchestration, HMAC-based
//! blank-node relabeling, statement partitioning and sorting, CBOR-framed
//! proof values, and the issuer/holder/verifier index algebra.
//!
//! External concerns (RDFC-1.0 canonicalization, JSON-LD context loading,
//! pointer partitioning, fragment selection, DID key lookup) reach the
//! engines through the `attest-api` traits, bundled in a [`ProofContext`].
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

pub mod canon;
pub mod codec;
pub mod context;
pub mod engine;
pub mod options;
pub mod registry;
pub mod relabel;
pub mod statements;
pub mod suites;

pub use canon::JcsCanonicalizer;
pub use context::{ProofContext, ProofContextBuilder};
pub use engine::sd::base::{
    create_base_proof, create_base_proof_verbose, BaseProofArtifacts, BaseProofRequest,
};
pub use engine::sd::derive::{derive_proof, DeriveRequest};
pub use engine::sd::verify::verify_base_proof;
pub use engine::{sign, verify, SignRequest};
pub use registry::{CryptosuiteRegistry, SignerRegistry};
pub use suites::{CryptosuiteDescriptor, ECDSA_SD_2023, EDDSA_JCS_2022, EDDSA_RDFC_2022};

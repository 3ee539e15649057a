// Path: crates/types/src/lib.rs
//! Core data model for securing W3C Verifiable Credentials with Data
//! Integrity proofs: the credential handle, the proof document, opaque key
//! handles, verification outcomes, and the canonical error types shared by
//! every crate in the workspace.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

pub mod credential;
pub mod error;
pub mod keys;
pub mod outcome;
pub mod proof;
pub mod suite;

pub use credential::Credential;
pub use error::{
    CodecError, CryptoError, DataIntegrityError, ErrorCode, RegistryError, RelabelError,
};
pub use keys::{HmacKey, KeyPair, PrivateKey, PublicKey, SignatureAlgorithm, HMAC_KEY_LEN};
pub use outcome::{InvalidReason, VerificationOutcome};
pub use proof::{Proof, DATA_INTEGRITY_PROOF_TYPE, PROOF_PURPOSE_ASSERTION};
pub use suite::{Canonicalization, HashAlgorithm};

// Path: crates/crypto/src/lib.rs
//! Concrete cryptographic backends for the Data Integrity engines.
//!
//! Everything here implements the seams defined in `attest-api`: Ed25519
//! and ECDSA P-256 signing routines for the crypto function registry,
//! SHA-256 digests, and HMAC-SHA256 with its key sources.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

pub mod hash;
pub mod mac;
pub mod sign;

pub use hash::sha256;
pub use mac::{hmac_sha256, FixedHmacKeySource, OsHmacKeySource};

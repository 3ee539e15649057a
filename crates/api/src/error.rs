// Path: crates/api/src/error.rs
//! Re-exports of the canonical error types from the types crate.

pub use attest_types::error::{
    CodecError, CryptoError, DataIntegrityError, ErrorCode, RegistryError, RelabelError,
};

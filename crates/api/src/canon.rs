// Path: crates/api/src/canon.rs
//! Canonicalization and JSON-LD context resolution seams.

use crate::cancel::CancelToken;
use async_trait::async_trait;
use attest_types::error::DataIntegrityError;
use attest_types::suite::Canonicalization;
use serde_json::Value;

/// The output of a canonicalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalDocument {
    /// Canonical N-Quad statements, each terminated by `\n` (RDFC-1.0).
    Statements(Vec<String>),
    /// Canonical bytes of the whole document (JCS).
    Bytes(Vec<u8>),
}

impl CanonicalDocument {
    /// The canonical byte string: statements are concatenated as-is.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Statements(statements) => statements.concat().into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    /// The statement list; errors for byte-form canonicalizations.
    pub fn into_statements(self) -> Result<Vec<String>, DataIntegrityError> {
        match self {
            Self::Statements(statements) => Ok(statements),
            Self::Bytes(_) => Err(DataIntegrityError::Canonicalization(
                "canonicalizer produced bytes where statements were required".to_string(),
            )),
        }
    }
}

/// Resolves a JSON-LD context URL to an embedded context document.
///
/// Implementations must validate context integrity (for example by SHA-256
/// pinning) before returning a document; `None` means the context is not
/// known locally.
#[async_trait]
pub trait ContextResolver: Send + Sync {
    /// Looks up `url`, returning the context document or `None`.
    async fn resolve(
        &self,
        url: &str,
        cancel: &CancelToken,
    ) -> Result<Option<Value>, DataIntegrityError>;
}

/// Deterministically serializes a document for hashing.
#[async_trait]
pub trait Canonicalizer: Send + Sync {
    /// The canonicalization algorithm this implementation provides.
    fn method(&self) -> Canonicalization;

    /// Canonicalizes `document`.
    ///
    /// RDFC implementations expand the JSON-LD through `resolver` and emit
    /// sorted N-Quads; JCS implementations ignore `resolver` and emit the
    /// canonical JSON bytes.
    async fn canonicalize(
        &self,
        document: &Value,
        resolver: Option<&dyn ContextResolver>,
        cancel: &CancelToken,
    ) -> Result<CanonicalDocument, DataIntegrityError>;
}

// Path: crates/integrity/src/canon.rs
//! The bundled JCS canonicalizer.
//!
//! RDFC-1.0 needs a JSON-LD processor and stays behind the
//! [`Canonicalizer`] seam; JCS is a pure function of the JSON tree, so the
//! crate ships it ready to use.

use async_trait::async_trait;
use attest_api::cancel::CancelToken;
use attest_api::canon::{CanonicalDocument, Canonicalizer, ContextResolver};
use attest_types::error::DataIntegrityError;
use attest_types::suite::Canonicalization;
use serde_json::Value;

/// RFC 8785 canonicalization over the JSON tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct JcsCanonicalizer;

#[async_trait]
impl Canonicalizer for JcsCanonicalizer {
    fn method(&self) -> Canonicalization {
        Canonicalization::Jcs
    }

    async fn canonicalize(
        &self,
        document: &Value,
        _resolver: Option<&dyn ContextResolver>,
        cancel: &CancelToken,
    ) -> Result<CanonicalDocument, DataIntegrityError> {
        cancel.checkpoint()?;
        let text = json_canon::to_string(document)
            .map_err(|e| DataIntegrityError::Canonicalization(e.to_string()))?;
        Ok(CanonicalDocument::Bytes(text.into_bytes()))
    }
}

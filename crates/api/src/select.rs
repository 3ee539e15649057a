// Path: crates/api/src/select.rs
//! JSON-LD fragment selection.

use attest_types::error::DataIntegrityError;
use serde_json::Value;

/// Produces a valid JSON-LD subdocument retaining the original `@context`
/// and only the paths covering the selected pointers.
pub trait FragmentSelector: Send + Sync {
    /// Selects the fragments of `document` addressed by `pointers`.
    fn select(&self, document: &Value, pointers: &[String]) -> Result<Value, DataIntegrityError>;
}

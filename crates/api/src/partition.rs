// Path: crates/api/src/partition.rs
//! Statement partitioning by JSON Pointer.

use crate::cancel::CancelToken;
use crate::canon::{Canonicalizer, ContextResolver};
use async_trait::async_trait;
use attest_types::error::DataIntegrityError;
use serde_json::Value;

/// Canonical statements split into mandatory and non-mandatory groups.
///
/// Indexes point into `all_statements`; the two groups are disjoint and
/// together cover the whole list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedStatements {
    /// Every canonical statement of the document, in canonical order.
    pub all_statements: Vec<String>,
    /// Ascending indexes of statements selected by the pointers.
    pub mandatory_indexes: Vec<usize>,
    /// Ascending indexes of the remaining statements.
    pub non_mandatory_indexes: Vec<usize>,
}

/// Canonicalizes a document and identifies which canonical statements
/// descend from each of the given JSON Pointers.
#[async_trait]
pub trait StatementPartitioner: Send + Sync {
    /// Partitions `document` by `pointers`.
    async fn partition(
        &self,
        document: &Value,
        pointers: &[String],
        canonicalizer: &dyn Canonicalizer,
        resolver: Option<&dyn ContextResolver>,
        cancel: &CancelToken,
    ) -> Result<PartitionedStatements, DataIntegrityError>;
}

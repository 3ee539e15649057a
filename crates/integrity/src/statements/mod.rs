// Path: crates/integrity/src/statements/mod.rs
//! Statement preparation for the selective-disclosure pipeline.
//!
//! Takes the canonical statements of a document plus the canonical indexes
//! the partitioner marked mandatory, relabels the blank nodes, sorts, and
//! re-derives the mandatory/non-mandatory split against the sorted order -
//! the index space every signature in the proof value refers to.

use crate::relabel::{apply_label_map, relabel_statements, LabelMap};
use attest_types::error::DataIntegrityError;
use attest_types::keys::HMAC_KEY_LEN;
use std::collections::HashSet;

/// How to rewrite blank-node labels during preparation.
pub enum LabelSource<'a> {
    /// Relabel with fresh HMAC identifiers under this key (issuer path).
    HmacKey(&'a [u8; HMAC_KEY_LEN]),
    /// Rewrite through an existing map (holder and verifier paths).
    Map(&'a LabelMap),
}

/// The prepared, sorted statement set.
///
/// `mandatory_indexes` and `non_mandatory_indexes` are ascending, disjoint,
/// and together cover `0..sorted_statements.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedStatements {
    /// Relabeled statements in byte-lexicographic order.
    pub sorted_statements: Vec<String>,
    /// The label map used for the rewrite, bare form.
    pub label_map: LabelMap,
    /// Sorted-order indexes of the mandatory statements.
    pub mandatory_indexes: Vec<usize>,
    /// Sorted-order indexes of everything else.
    pub non_mandatory_indexes: Vec<usize>,
}

/// Relabels, sorts, and classifies `all_statements`.
///
/// `mandatory_indexes` point into `all_statements` (canonical order). A
/// statement text that occurs more than once is treated as mandatory if any
/// of its canonical occurrences was mandatory.
pub fn prepare_statements(
    all_statements: &[String],
    mandatory_indexes: &[usize],
    source: LabelSource<'_>,
) -> Result<PreparedStatements, DataIntegrityError> {
    let (relabeled, label_map) = match source {
        LabelSource::HmacKey(key) => relabel_statements(all_statements, key)?,
        LabelSource::Map(map) => (apply_label_map(all_statements, map), map.clone()),
    };

    let mut mandatory_texts: HashSet<&str> = HashSet::new();
    for &index in mandatory_indexes {
        let statement = relabeled.get(index).ok_or_else(|| {
            DataIntegrityError::InvalidArgument(format!(
                "mandatory index {index} is out of range for {} statements",
                relabeled.len()
            ))
        })?;
        mandatory_texts.insert(statement.as_str());
    }

    let mut sorted_statements = relabeled.clone();
    sorted_statements.sort();

    let mut mandatory = Vec::new();
    let mut non_mandatory = Vec::new();
    for (index, statement) in sorted_statements.iter().enumerate() {
        if mandatory_texts.contains(statement.as_str()) {
            mandatory.push(index);
        } else {
            non_mandatory.push(index);
        }
    }

    Ok(PreparedStatements {
        sorted_statements,
        label_map,
        mandatory_indexes: mandatory,
        non_mandatory_indexes: non_mandatory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x42; 32];

    fn statements() -> Vec<String> {
        vec![
            "<urn:z> <urn:p> \"last\" .\n".to_string(),
            "_:c14n0 <urn:p> \"blank\" .\n".to_string(),
            "<urn:a> <urn:p> \"first\" .\n".to_string(),
        ]
    }

    #[test]
    fn sorts_byte_lexicographically_and_partitions() {
        let prepared = prepare_statements(&statements(), &[2], LabelSource::HmacKey(&KEY)).unwrap();

        let mut expected = prepared.sorted_statements.clone();
        expected.sort();
        assert_eq!(prepared.sorted_statements, expected);
        assert_eq!(prepared.sorted_statements.len(), 3);

        // "<urn:a> ..." sorts first and is the only mandatory statement.
        assert_eq!(prepared.mandatory_indexes, vec![0]);
        assert_eq!(prepared.non_mandatory_indexes, vec![1, 2]);
        assert!(prepared.sorted_statements[0].contains("first"));
    }

    #[test]
    fn partitions_cover_the_whole_range_disjointly() {
        let prepared =
            prepare_statements(&statements(), &[0, 1], LabelSource::HmacKey(&KEY)).unwrap();
        let mut all: Vec<usize> = prepared
            .mandatory_indexes
            .iter()
            .chain(&prepared.non_mandatory_indexes)
            .copied()
            .collect();
        all.sort();
        assert_eq!(all, vec![0, 1, 2]);
    }

    #[test]
    fn duplicates_straddling_the_boundary_become_mandatory() {
        let statements = vec![
            "<urn:a> <urn:p> \"dup\" .\n".to_string(),
            "<urn:a> <urn:p> \"dup\" .\n".to_string(),
            "<urn:b> <urn:p> \"other\" .\n".to_string(),
        ];
        // Only the first occurrence is mandatory; both copies must end up so.
        let prepared = prepare_statements(&statements, &[0], LabelSource::HmacKey(&KEY)).unwrap();
        assert_eq!(prepared.mandatory_indexes, vec![0, 1]);
        assert_eq!(prepared.non_mandatory_indexes, vec![2]);
    }

    #[test]
    fn map_source_reuses_the_supplied_map() {
        let (_, map) = crate::relabel::relabel_statements(&statements(), &KEY).unwrap();
        let keyed = prepare_statements(&statements(), &[1], LabelSource::HmacKey(&KEY)).unwrap();
        let mapped = prepare_statements(&statements(), &[1], LabelSource::Map(&map)).unwrap();
        assert_eq!(keyed, mapped);
    }

    #[test]
    fn out_of_range_mandatory_index_is_rejected() {
        let result = prepare_statements(&statements(), &[17], LabelSource::HmacKey(&KEY));
        assert!(matches!(
            result,
            Err(DataIntegrityError::InvalidArgument(_))
        ));
    }
}

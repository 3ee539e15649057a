// Path: crates/integrity/src/relabel/mod.rs
//! HMAC-based blank-node relabeling.
//!
//! RDFC-1.0 assigns blank nodes canonical identifiers `_:c14n<N>` whose
//! numbering depends on the whole graph. Relabeling replaces each one with
//! `u` + base64url-no-pad(HMAC-SHA256(key, canonicalId)), which is stable
//! under graph reduction and therefore safe to reveal to a verifier.

use attest_types::error::{CryptoError, RelabelError};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::collections::BTreeMap;
use std::ops::Range;

/// Mapping between canonical and HMAC identifiers, bare form (no `_:`).
pub type LabelMap = BTreeMap<String, String>;

/// A byte that can appear in a blank-node label: the canonical `c14n<N>`
/// family plus the base64url alphabet of the HMAC identifiers, whose `-`
/// and `_` must not truncate the scan.
fn is_label_byte(byte: &u8) -> bool {
    byte.is_ascii_alphanumeric() || *byte == b'-' || *byte == b'_'
}

/// Byte ranges of the blank-node labels in a statement, `_:` excluded.
fn label_ranges(statement: &str) -> Vec<Range<usize>> {
    let bytes = statement.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes.get(i) == Some(&b'_') && bytes.get(i + 1) == Some(&b':') {
            let start = i + 2;
            let mut end = start;
            while bytes.get(end).is_some_and(is_label_byte) {
                end += 1;
            }
            if end > start {
                ranges.push(start..end);
                i = end;
                continue;
            }
        }
        i += 1;
    }
    ranges
}

/// The blank-node labels of a statement, in order of occurrence.
pub(crate) fn statement_labels(statement: &str) -> Vec<String> {
    label_ranges(statement)
        .into_iter()
        .filter_map(|range| statement.get(range).map(str::to_string))
        .collect()
}

/// Rewrites one statement through `map`; labels absent from the map are
/// left untouched.
pub(crate) fn apply_to_statement(statement: &str, map: &LabelMap) -> String {
    let mut out = String::with_capacity(statement.len());
    let mut cursor = 0;
    for range in label_ranges(statement) {
        let Some(label) = statement.get(range.clone()) else {
            continue;
        };
        if let Some(replacement) = map.get(label) {
            out.push_str(statement.get(cursor..range.start).unwrap_or(""));
            out.push_str(replacement);
            cursor = range.end;
        }
    }
    out.push_str(statement.get(cursor..).unwrap_or(""));
    out
}

/// Computes the HMAC identifier of one canonical label.
fn hmac_label(key: &[u8; 32], label: &str) -> Result<String, CryptoError> {
    let tag = attest_crypto::hmac_sha256(key, label.as_bytes())?;
    Ok(format!("u{}", URL_SAFE_NO_PAD.encode(tag)))
}

/// Relabels every blank node in `statements` under `key`.
///
/// Returns the rewritten statements and the canonical-to-HMAC label map in
/// bare form. The same canonical label always maps to the same HMAC label.
pub fn relabel_statements(
    statements: &[String],
    key: &[u8; 32],
) -> Result<(Vec<String>, LabelMap), CryptoError> {
    let mut map = LabelMap::new();
    for statement in statements {
        for label in statement_labels(statement) {
            // Canonical blank nodes are the `_:c14n<N>` family; anything
            // else that merely looks like a label is left alone.
            if label.starts_with('c') && !map.contains_key(&label) {
                let replacement = hmac_label(key, &label)?;
                map.insert(label, replacement);
            }
        }
    }
    let relabeled = statements
        .iter()
        .map(|statement| apply_to_statement(statement, &map))
        .collect();
    Ok((relabeled, map))
}

/// Rewrites `statements` through an existing label map; blank nodes whose
/// label is absent from the map are left untouched.
pub fn apply_label_map(statements: &[String], map: &LabelMap) -> Vec<String> {
    statements
        .iter()
        .map(|statement| apply_to_statement(statement, map))
        .collect()
}

/// Recovers a label map by positional comparison of two statement lists.
pub fn extract_label_map(
    original: &[String],
    relabeled: &[String],
) -> Result<LabelMap, RelabelError> {
    if original.len() != relabeled.len() {
        return Err(RelabelError::CountMismatch {
            original: original.len(),
            relabeled: relabeled.len(),
        });
    }
    let mut map = LabelMap::new();
    for (index, (before, after)) in original.iter().zip(relabeled).enumerate() {
        let from = statement_labels(before);
        let to = statement_labels(after);
        if from.len() != to.len() {
            return Err(RelabelError::BlankNodeCountMismatch {
                index,
                original: from.len(),
                relabeled: to.len(),
            });
        }
        for (a, b) in from.into_iter().zip(to) {
            match map.get(&a) {
                Some(existing) if existing != &b => {
                    return Err(RelabelError::LabelMapAmbiguous { id: a });
                }
                _ => {
                    map.insert(a, b);
                }
            }
        }
    }
    Ok(map)
}

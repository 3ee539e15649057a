// Path: crates/integrity/src/engine/sd/labels.rs
//! Label-map recovery for reduced credentials.
//!
//! RDFC numbers blank nodes per graph, so the reduced credential's
//! `_:c14n<N>` identifiers need not match the full credential's. Each
//! reduced canonical id is matched to an HMAC id from the issuer's label
//! map by searching for the unique substitution that turns the reduced
//! statement into a member of the full relabeled statement set; assignments
//! lock in as they are discovered and propagate to later statements. A
//! canonical id that admits several consistent assignments is an explicit
//! failure, never an arbitrary pick.

use crate::relabel::{apply_to_statement, statement_labels, LabelMap};
use attest_types::error::RelabelError;
use std::collections::{BTreeSet, HashSet};

struct Search<'a> {
    full_set: HashSet<&'a str>,
    candidates: Vec<&'a String>,
    assigned: LabelMap,
    used: HashSet<String>,
}

impl<'a> Search<'a> {
    fn substituted(&self, statement: &str, extra: &LabelMap) -> String {
        let merged: LabelMap = self
            .assigned
            .iter()
            .chain(extra.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        apply_to_statement(statement, &merged)
    }

    /// HMAC ids that complete `statement` into a member of the full set
    /// when bound to `label`, given the assignments made so far.
    fn viable(&self, statement: &str, label: &str) -> Vec<String> {
        let mut hits = Vec::new();
        for candidate in &self.candidates {
            if self.used.contains(candidate.as_str()) {
                continue;
            }
            let mut trial = LabelMap::new();
            trial.insert(label.to_string(), (*candidate).clone());
            if self.full_set.contains(self.substituted(statement, &trial).as_str()) {
                hits.push((*candidate).clone());
            }
        }
        hits.dedup();
        hits
    }

    fn assign(&mut self, label: String, value: String) {
        self.used.insert(value.clone());
        self.assigned.insert(label, value);
    }

    /// Counts complete assignments of `labels` (up to `limit`) that put
    /// `statement` into the full set, returning the first one found.
    fn solutions(
        &self,
        statement: &str,
        labels: &[String],
        partial: &mut LabelMap,
        taken: &mut HashSet<String>,
        limit: usize,
        found: &mut Vec<LabelMap>,
    ) {
        if found.len() >= limit {
            return;
        }
        let Some((label, rest)) = labels.split_first() else {
            if self
                .full_set
                .contains(self.substituted(statement, partial).as_str())
            {
                found.push(partial.clone());
            }
            return;
        };
        for candidate in &self.candidates {
            if self.used.contains(candidate.as_str()) || taken.contains(candidate.as_str()) {
                continue;
            }
            partial.insert(label.clone(), (*candidate).clone());
            taken.insert((*candidate).clone());
            self.solutions(statement, rest, partial, taken, limit, found);
            taken.remove(candidate.as_str());
            partial.remove(label);
            if found.len() >= limit {
                return;
            }
        }
    }
}

/// Recovers the reduced credential's label map.
///
/// `reduced_statements` are the reduced graph's canonical statements;
/// `full_relabeled` is the full credential's relabeled sorted statement
/// list and `full_map` the label map that produced it.
pub(crate) fn recover_label_map(
    reduced_statements: &[String],
    full_relabeled: &[String],
    full_map: &LabelMap,
) -> Result<LabelMap, RelabelError> {
    let mut search = Search {
        full_set: full_relabeled.iter().map(String::as_str).collect(),
        candidates: full_map.values().collect(),
        assigned: LabelMap::new(),
        used: HashSet::new(),
    };

    let with_labels: Vec<(&String, Vec<String>)> = reduced_statements
        .iter()
        .map(|statement| {
            let unique: BTreeSet<String> = statement_labels(statement).into_iter().collect();
            (statement, unique.into_iter().collect())
        })
        .filter(|(_, labels): &(_, Vec<String>)| !labels.is_empty())
        .collect();

    // Linear probe to a fixed point: statements with a single unresolved
    // label pin their assignment; everything else waits for propagation.
    let mut progress = true;
    while progress {
        progress = false;
        for (statement, labels) in &with_labels {
            let unknown: Vec<&String> = labels
                .iter()
                .filter(|label| !search.assigned.contains_key(label.as_str()))
                .collect();
            if unknown.len() != 1 {
                continue;
            }
            let label = unknown.first().map(|l| (*l).clone()).unwrap_or_default();
            let hits = search.viable(statement, &label);
            match hits.len() {
                0 => {}
                1 => {
                    let value = hits.into_iter().next().unwrap_or_default();
                    search.assign(label, value);
                    progress = true;
                }
                _ => return Err(RelabelError::LabelMapAmbiguous { id: label }),
            }
        }

        // Statements with several unresolved labels fall back to an
        // exhaustive joint assignment once propagation stalls.
        if !progress {
            for (statement, labels) in &with_labels {
                let unknown: Vec<String> = labels
                    .iter()
                    .filter(|label| !search.assigned.contains_key(label.as_str()))
                    .cloned()
                    .collect();
                if unknown.len() < 2 {
                    continue;
                }
                let mut found = Vec::new();
                search.solutions(
                    statement,
                    &unknown,
                    &mut LabelMap::new(),
                    &mut HashSet::new(),
                    2,
                    &mut found,
                );
                match found.len() {
                    0 => {}
                    1 => {
                        let solution = found.into_iter().next().unwrap_or_default();
                        for (label, value) in solution {
                            search.assign(label, value);
                        }
                        progress = true;
                        break;
                    }
                    _ => {
                        let id = unknown.into_iter().next().unwrap_or_default();
                        return Err(RelabelError::LabelMapAmbiguous { id });
                    }
                }
            }
        }
    }

    for (_, labels) in &with_labels {
        for label in labels {
            if !search.assigned.contains_key(label.as_str()) {
                return Err(RelabelError::LabelMapUnresolved { id: label.clone() });
            }
        }
    }
    Ok(search.assigned)
}

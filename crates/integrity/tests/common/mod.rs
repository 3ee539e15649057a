// Path: crates/integrity/tests/common/mod.rs
//! Shared fixtures for the integration tests.
//!
//! RDFC-1.0 canonicalization and JSON Pointer partitioning are external
//! collaborators, so the tests drive the engines with table-backed fakes
//! over hand-canonicalized N-Quads. Documents the tables do not know fall
//! back to a single JCS-derived statement, which keeps proof-options
//! hashing deterministic and makes tampered documents canonicalize to
//! something that can never verify.
#![allow(dead_code)]

use async_trait::async_trait;
use attest_api::cancel::CancelToken;
use attest_api::canon::{CanonicalDocument, Canonicalizer, ContextResolver};
use attest_api::partition::{PartitionedStatements, StatementPartitioner};
use attest_api::resolve::StaticMethodResolver;
use attest_api::select::FragmentSelector;
use attest_crypto::mac::FixedHmacKeySource;
use attest_integrity::{ProofContext, ProofContextBuilder};
use attest_types::credential::Credential;
use attest_types::error::DataIntegrityError;
use attest_types::keys::KeyPair;
use attest_types::suite::Canonicalization;
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// RFC 6979 A.2.5 P-256 key, reused as the fixture issuer key.
pub const ISSUER_SECRET: &str = "c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721";
/// NIST CAVS ECDH test key, reused as the fixture ephemeral key.
pub const EPHEMERAL_SECRET: &str =
    "7d7dc5f71eb29ddaf80d6214632eeae03d9058af1fb6d22ed80badb62bc1a534";
/// Deterministic relabeling key: `00 11 .. ee ff` repeated twice.
pub const HMAC_KEY: [u8; 32] = [
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
    0xff, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
    0xee, 0xff,
];

pub const ISSUER_METHOD: &str = "did:example:issuer#key-1";

/// Table-backed canonicalizer: known documents canonicalize to their
/// recorded statements, everything else to one JCS-derived statement.
pub struct FixtureCanonicalizer {
    method: Canonicalization,
    table: Vec<(Value, Vec<String>)>,
}

impl FixtureCanonicalizer {
    pub fn rdfc(table: Vec<(Value, Vec<String>)>) -> Self {
        Self {
            method: Canonicalization::Rdfc10,
            table,
        }
    }
}

#[async_trait]
impl Canonicalizer for FixtureCanonicalizer {
    fn method(&self) -> Canonicalization {
        self.method
    }

    async fn canonicalize(
        &self,
        document: &Value,
        _resolver: Option<&dyn ContextResolver>,
        cancel: &CancelToken,
    ) -> Result<CanonicalDocument, DataIntegrityError> {
        cancel.checkpoint()?;
        for (known, statements) in &self.table {
            if known == document {
                return Ok(CanonicalDocument::Statements(statements.clone()));
            }
        }
        let fallback = json_canon::to_string(document)
            .map_err(|e| DataIntegrityError::Canonicalization(e.to_string()))?;
        Ok(CanonicalDocument::Statements(vec![format!("{fallback}\n")]))
    }
}

/// Table-backed partitioner for one known document.
pub struct FixturePartitioner {
    document: Value,
    statements: Vec<String>,
    pointer_indexes: HashMap<String, Vec<usize>>,
}

#[async_trait]
impl StatementPartitioner for FixturePartitioner {
    async fn partition(
        &self,
        document: &Value,
        pointers: &[String],
        _canonicalizer: &dyn Canonicalizer,
        _resolver: Option<&dyn ContextResolver>,
        cancel: &CancelToken,
    ) -> Result<PartitionedStatements, DataIntegrityError> {
        cancel.checkpoint()?;
        if document != &self.document {
            return Err(DataIntegrityError::Canonicalization(
                "partitioner does not know this document".to_string(),
            ));
        }
        let mut mandatory: BTreeSet<usize> = BTreeSet::new();
        for pointer in pointers {
            let indexes = self.pointer_indexes.get(pointer).ok_or_else(|| {
                DataIntegrityError::Canonicalization(format!(
                    "pointer {pointer} selects nothing in this document"
                ))
            })?;
            mandatory.extend(indexes.iter().copied());
        }
        let non_mandatory = (0..self.statements.len())
            .filter(|index| !mandatory.contains(index))
            .collect();
        Ok(PartitionedStatements {
            all_statements: self.statements.clone(),
            mandatory_indexes: mandatory.into_iter().collect(),
            non_mandatory_indexes: non_mandatory,
        })
    }
}

/// Table-backed fragment selector keyed by the selected pointer set.
pub struct FixtureSelector {
    selections: Vec<(BTreeSet<String>, Value)>,
}

impl FragmentSelector for FixtureSelector {
    fn select(&self, _document: &Value, pointers: &[String]) -> Result<Value, DataIntegrityError> {
        let requested: BTreeSet<String> = pointers.iter().cloned().collect();
        for (known, reduced) in &self.selections {
            if known == &requested {
                return Ok(reduced.clone());
            }
        }
        Err(DataIntegrityError::Selection(format!(
            "no fixture selection for pointers {pointers:?}"
        )))
    }
}

/// Everything the selective-disclosure flow needs.
pub struct SdFixture {
    pub ctx: ProofContext,
    pub credential: Credential,
    pub reduced_document: Value,
    pub full_statements: Vec<String>,
    pub reduced_statements: Vec<String>,
    pub issuer: KeyPair,
    pub ephemeral: KeyPair,
    pub resolver: StaticMethodResolver,
}

/// The issuer's mandatory pointers.
pub fn mandatory_pointers() -> Vec<String> {
    vec![
        "/issuer".to_string(),
        "/type".to_string(),
        "/validFrom".to_string(),
    ]
}

/// The pointer the verifier requests in the happy-path flow.
pub fn disclosed_pointer() -> String {
    "/credentialSubject/degree".to_string()
}

pub fn full_document() -> Value {
    json!({
        "@context": [
            "https://www.w3.org/ns/credentials/v2",
            "https://example.org/vocab/v1"
        ],
        "id": "urn:example:cred:7",
        "type": ["VerifiableCredential", "EmploymentCredential"],
        "issuer": "did:example:issuer",
        "validFrom": "2024-03-01T00:00:00Z",
        "credentialSubject": {
            "id": "did:example:alice",
            "birthCountry": "Bahamas",
            "degree": { "type": "BachelorDegree", "field": "Biology" },
            "address": { "street": "10 Main St", "city": "Metropolis" }
        }
    })
}

pub fn reduced_document() -> Value {
    json!({
        "@context": [
            "https://www.w3.org/ns/credentials/v2",
            "https://example.org/vocab/v1"
        ],
        "id": "urn:example:cred:7",
        "type": ["VerifiableCredential", "EmploymentCredential"],
        "issuer": "did:example:issuer",
        "validFrom": "2024-03-01T00:00:00Z",
        "credentialSubject": {
            "id": "did:example:alice",
            "degree": { "type": "BachelorDegree", "field": "Biology" }
        }
    })
}

/// Canonical N-Quads of [`full_document`], RDFC order. `_:c14n0` is the
/// address node, `_:c14n1` the degree node.
pub fn full_statements() -> Vec<String> {
    [
        "<did:example:alice> <https://example.org/vocab#address> _:c14n0 .",
        "<did:example:alice> <https://example.org/vocab#birthCountry> \"Bahamas\" .",
        "<did:example:alice> <https://example.org/vocab#degree> _:c14n1 .",
        "<urn:example:cred:7> <https://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://www.w3.org/2018/credentials#VerifiableCredential> .",
        "<urn:example:cred:7> <https://www.w3.org/2018/credentials#credentialSubject> <did:example:alice> .",
        "<urn:example:cred:7> <https://www.w3.org/2018/credentials#issuer> <did:example:issuer> .",
        "<urn:example:cred:7> <https://www.w3.org/2018/credentials#validFrom> \"2024-03-01T00:00:00Z\"^^<http://www.w3.org/2001/XMLSchema#dateTime> .",
        "_:c14n0 <https://example.org/vocab#city> \"Metropolis\" .",
        "_:c14n0 <https://example.org/vocab#street> \"10 Main St\" .",
        "_:c14n1 <https://example.org/vocab#field> \"Biology\" .",
        "_:c14n1 <https://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://example.org/vocab#BachelorDegree> .",
    ]
    .iter()
    .map(|s| format!("{s}\n"))
    .collect()
}

/// Canonical N-Quads of [`reduced_document`]. The surviving blank node is
/// renumbered `_:c14n0` by the fresh canonicalization.
pub fn reduced_statements() -> Vec<String> {
    [
        "<did:example:alice> <https://example.org/vocab#degree> _:c14n0 .",
        "<urn:example:cred:7> <https://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://www.w3.org/2018/credentials#VerifiableCredential> .",
        "<urn:example:cred:7> <https://www.w3.org/2018/credentials#credentialSubject> <did:example:alice> .",
        "<urn:example:cred:7> <https://www.w3.org/2018/credentials#issuer> <did:example:issuer> .",
        "<urn:example:cred:7> <https://www.w3.org/2018/credentials#validFrom> \"2024-03-01T00:00:00Z\"^^<http://www.w3.org/2001/XMLSchema#dateTime> .",
        "_:c14n0 <https://example.org/vocab#field> \"Biology\" .",
        "_:c14n0 <https://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://example.org/vocab#BachelorDegree> .",
    ]
    .iter()
    .map(|s| format!("{s}\n"))
    .collect()
}

fn pointer_indexes() -> HashMap<String, Vec<usize>> {
    HashMap::from([
        ("/type".to_string(), vec![3]),
        ("/issuer".to_string(), vec![5]),
        ("/validFrom".to_string(), vec![6]),
        ("/credentialSubject/birthCountry".to_string(), vec![1]),
        ("/credentialSubject/degree".to_string(), vec![2, 9, 10]),
        ("/credentialSubject/address".to_string(), vec![0, 7, 8]),
    ])
}

pub fn sd_fixture() -> SdFixture {
    let _ = env_logger::builder().is_test(true).try_init();

    let document = full_document();
    let reduced = reduced_document();

    let canonicalizer = FixtureCanonicalizer::rdfc(vec![
        (document.clone(), full_statements()),
        (reduced.clone(), reduced_statements()),
    ]);
    let partitioner = FixturePartitioner {
        document: document.clone(),
        statements: full_statements(),
        pointer_indexes: pointer_indexes(),
    };
    let selection: BTreeSet<String> = mandatory_pointers()
        .into_iter()
        .chain([disclosed_pointer()])
        .collect();
    let selector = FixtureSelector {
        selections: vec![(selection, reduced.clone())],
    };

    let ctx: ProofContext = ProofContextBuilder::default()
        .with_canonicalizer(Arc::new(canonicalizer))
        .with_partitioner(Arc::new(partitioner))
        .with_selector(Arc::new(selector))
        .with_hmac_key_source(Arc::new(FixedHmacKeySource::new(HMAC_KEY)))
        .build();

    let issuer =
        attest_crypto::sign::ecdsa::keypair_from_secret(&hex::decode(ISSUER_SECRET).unwrap())
            .unwrap();
    let ephemeral =
        attest_crypto::sign::ecdsa::keypair_from_secret(&hex::decode(EPHEMERAL_SECRET).unwrap())
            .unwrap();
    let resolver = StaticMethodResolver::new().with(ISSUER_METHOD, issuer.public.clone());

    SdFixture {
        ctx,
        credential: Credential::new(document).unwrap(),
        reduced_document: reduced,
        full_statements: full_statements(),
        reduced_statements: reduced_statements(),
        issuer,
        ephemeral,
        resolver,
    }
}

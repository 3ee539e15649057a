// Path: crates/types/src/suite.rs
//! Cryptosuite classification enums shared between the trait crate and the
//! engine crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a cryptosuite transforms a document before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Canonicalization {
    /// RDF Dataset Canonicalization (RDFC-1.0) over the expanded JSON-LD.
    Rdfc10,
    /// JSON Canonicalization Scheme (RFC 8785) over the JSON tree.
    Jcs,
    /// No canonicalization; the serialized document is hashed as-is.
    None,
}

impl fmt::Display for Canonicalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rdfc10 => f.write_str("RDFC-1.0"),
            Self::Jcs => f.write_str("JCS"),
            Self::None => f.write_str("none"),
        }
    }
}

/// Hash algorithms used by the registered cryptosuites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => f.write_str("SHA-256"),
        }
    }
}

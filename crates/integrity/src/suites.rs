// Path: crates/integrity/src/suites.rs
//! Cryptosuite descriptors.

use attest_types::keys::SignatureAlgorithm;
use attest_types::suite::{Canonicalization, HashAlgorithm};

/// EdDSA over RDFC-1.0 canonical N-Quads.
pub const EDDSA_RDFC_2022: &str = "eddsa-rdfc-2022";
/// EdDSA over JCS (RFC 8785) canonical JSON.
pub const EDDSA_JCS_2022: &str = "eddsa-jcs-2022";
/// ECDSA P-256 selective disclosure over RDFC-1.0.
pub const ECDSA_SD_2023: &str = "ecdsa-sd-2023";

/// The W3C credentials v2 context expected by the registered suites.
pub const CREDENTIALS_V2_CONTEXT: &str = "https://www.w3.org/ns/credentials/v2";

/// Static description of a cryptosuite: how it canonicalizes, hashes, and
/// signs, and which key algorithms its verification methods may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptosuiteDescriptor {
    /// The cryptosuite identifier carried in proofs.
    pub name: &'static str,
    /// The canonicalization the suite applies before hashing.
    pub canonicalization: Canonicalization,
    /// The hash applied to canonical bytes.
    pub hash: HashAlgorithm,
    /// The algorithm signatures are produced under.
    pub signature_algorithm: SignatureAlgorithm,
    /// Contexts the secured document is expected to declare.
    pub required_contexts: &'static [&'static str],
    /// Key algorithms acceptable for this suite's verification methods.
    pub key_algorithms: &'static [SignatureAlgorithm],
}

impl CryptosuiteDescriptor {
    /// Whether the suite canonicalizes with RDFC-1.0 (and therefore carries
    /// the document `@context` into its proof options).
    pub fn uses_rdfc(&self) -> bool {
        self.canonicalization == Canonicalization::Rdfc10
    }

    /// Whether a key of the given algorithm can secure or verify proofs of
    /// this suite.
    pub fn is_key_compatible(&self, algorithm: SignatureAlgorithm) -> bool {
        self.key_algorithms.contains(&algorithm)
    }
}

/// Descriptor for `eddsa-rdfc-2022`.
pub fn eddsa_rdfc_2022() -> CryptosuiteDescriptor {
    CryptosuiteDescriptor {
        name: EDDSA_RDFC_2022,
        canonicalization: Canonicalization::Rdfc10,
        hash: HashAlgorithm::Sha256,
        signature_algorithm: SignatureAlgorithm::Ed25519,
        required_contexts: &[CREDENTIALS_V2_CONTEXT],
        key_algorithms: &[SignatureAlgorithm::Ed25519],
    }
}

/// Descriptor for `eddsa-jcs-2022`.
pub fn eddsa_jcs_2022() -> CryptosuiteDescriptor {
    CryptosuiteDescriptor {
        name: EDDSA_JCS_2022,
        canonicalization: Canonicalization::Jcs,
        hash: HashAlgorithm::Sha256,
        signature_algorithm: SignatureAlgorithm::Ed25519,
        required_contexts: &[],
        key_algorithms: &[SignatureAlgorithm::Ed25519],
    }
}

/// Descriptor for `ecdsa-sd-2023`.
pub fn ecdsa_sd_2023() -> CryptosuiteDescriptor {
    CryptosuiteDescriptor {
        name: ECDSA_SD_2023,
        canonicalization: Canonicalization::Rdfc10,
        hash: HashAlgorithm::Sha256,
        signature_algorithm: SignatureAlgorithm::EcdsaP256Sha256,
        required_contexts: &[CREDENTIALS_V2_CONTEXT],
        key_algorithms: &[SignatureAlgorithm::EcdsaP256Sha256],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_rule_follows_canonicalization() {
        assert!(eddsa_rdfc_2022().uses_rdfc());
        assert!(ecdsa_sd_2023().uses_rdfc());
        assert!(!eddsa_jcs_2022().uses_rdfc());
    }

    #[test]
    fn key_compatibility() {
        assert!(eddsa_jcs_2022().is_key_compatible(SignatureAlgorithm::Ed25519));
        assert!(!eddsa_jcs_2022().is_key_compatible(SignatureAlgorithm::EcdsaP256Sha256));
        assert!(ecdsa_sd_2023().is_key_compatible(SignatureAlgorithm::EcdsaP256Sha256));
    }
}

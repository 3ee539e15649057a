// Path: crates/integrity/src/registry.rs
//! The two cross-call registries: cryptosuite name -> descriptor and
//! algorithm tag -> signing routines.
//!
//! Both follow a builder-and-freeze pattern: registrations happen while
//! bootstrapping a [`crate::ProofContext`], after which the frozen registry
//! is shared read-only. There is no process-wide singleton.

use crate::suites::{self, CryptosuiteDescriptor};
use attest_api::sign::{SignatureSigner, SignatureVerifier};
use attest_crypto::sign::ecdsa::{EcdsaP256Signer, EcdsaP256Verifier};
use attest_crypto::sign::eddsa::{Ed25519Signer, Ed25519Verifier};
use attest_types::error::RegistryError;
use attest_types::keys::SignatureAlgorithm;
use std::collections::HashMap;

/// Frozen map of cryptosuite identifiers to descriptors.
#[derive(Debug, Clone, Default)]
pub struct CryptosuiteRegistry {
    suites: HashMap<&'static str, CryptosuiteDescriptor>,
}

impl CryptosuiteRegistry {
    /// Starts an empty builder.
    pub fn builder() -> CryptosuiteRegistryBuilder {
        CryptosuiteRegistryBuilder::default()
    }

    /// A registry with the three bundled suites.
    pub fn with_defaults() -> Self {
        Self::builder()
            .register(suites::eddsa_rdfc_2022())
            .register(suites::eddsa_jcs_2022())
            .register(suites::ecdsa_sd_2023())
            .freeze()
    }

    /// Looks up a descriptor by cryptosuite identifier.
    pub fn get(&self, name: &str) -> Result<&CryptosuiteDescriptor, RegistryError> {
        if self.suites.is_empty() {
            return Err(RegistryError::NotInitialised {
                registry: "cryptosuite",
            });
        }
        self.suites
            .get(name)
            .ok_or_else(|| RegistryError::UnknownCryptosuite(name.to_string()))
    }
}

/// Accumulates cryptosuite registrations before the freeze.
#[derive(Debug, Clone, Default)]
pub struct CryptosuiteRegistryBuilder {
    suites: HashMap<&'static str, CryptosuiteDescriptor>,
}

impl CryptosuiteRegistryBuilder {
    /// Registers `descriptor`, replacing any previous entry for its name.
    pub fn register(mut self, descriptor: CryptosuiteDescriptor) -> Self {
        self.suites.insert(descriptor.name, descriptor);
        self
    }

    /// Freezes the registrations into an immutable registry.
    pub fn freeze(self) -> CryptosuiteRegistry {
        CryptosuiteRegistry {
            suites: self.suites,
        }
    }
}

/// Frozen map of algorithm tags to signing and verification routines.
#[derive(Default)]
pub struct SignerRegistry {
    signers: HashMap<SignatureAlgorithm, Box<dyn SignatureSigner>>,
    verifiers: HashMap<SignatureAlgorithm, Box<dyn SignatureVerifier>>,
}

impl SignerRegistry {
    /// Starts an empty builder.
    pub fn builder() -> SignerRegistryBuilder {
        SignerRegistryBuilder::default()
    }

    /// A registry with the bundled Ed25519 and ECDSA P-256 backends.
    pub fn with_defaults() -> Self {
        Self::builder()
            .register_signer(Box::new(Ed25519Signer))
            .register_verifier(Box::new(Ed25519Verifier))
            .register_signer(Box::new(EcdsaP256Signer))
            .register_verifier(Box::new(EcdsaP256Verifier))
            .freeze()
    }

    /// The signing routine for `algorithm`.
    pub fn signer(&self, algorithm: SignatureAlgorithm) -> Result<&dyn SignatureSigner, RegistryError> {
        if self.signers.is_empty() && self.verifiers.is_empty() {
            return Err(RegistryError::NotInitialised {
                registry: "crypto function",
            });
        }
        self.signers
            .get(&algorithm)
            .map(AsRef::as_ref)
            .ok_or(RegistryError::UnknownAlgorithm(algorithm))
    }

    /// The verification routine for `algorithm`.
    pub fn verifier(
        &self,
        algorithm: SignatureAlgorithm,
    ) -> Result<&dyn SignatureVerifier, RegistryError> {
        if self.signers.is_empty() && self.verifiers.is_empty() {
            return Err(RegistryError::NotInitialised {
                registry: "crypto function",
            });
        }
        self.verifiers
            .get(&algorithm)
            .map(AsRef::as_ref)
            .ok_or(RegistryError::UnknownAlgorithm(algorithm))
    }
}

/// Accumulates signing-routine registrations before the freeze.
#[derive(Default)]
pub struct SignerRegistryBuilder {
    signers: HashMap<SignatureAlgorithm, Box<dyn SignatureSigner>>,
    verifiers: HashMap<SignatureAlgorithm, Box<dyn SignatureVerifier>>,
}

impl SignerRegistryBuilder {
    /// Registers a signer under its own algorithm tag.
    pub fn register_signer(mut self, signer: Box<dyn SignatureSigner>) -> Self {
        self.signers.insert(signer.algorithm(), signer);
        self
    }

    /// Registers a verifier under its own algorithm tag.
    pub fn register_verifier(mut self, verifier: Box<dyn SignatureVerifier>) -> Self {
        self.verifiers.insert(verifier.algorithm(), verifier);
        self
    }

    /// Freezes the registrations into an immutable registry.
    pub fn freeze(self) -> SignerRegistry {
        SignerRegistry {
            signers: self.signers,
            verifiers: self.verifiers,
        }
    }
}

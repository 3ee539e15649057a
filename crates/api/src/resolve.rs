// Path: crates/api/src/resolve.rs
//! Verification-method resolution.
//!
//! DID document handling is an external concern; the engines only need a
//! way to turn the `verificationMethod` DID URL of a proof into a public
//! key handle.

use attest_types::keys::PublicKey;
use std::collections::HashMap;

/// Resolves a verification-method identifier to a public key.
pub trait VerificationMethodResolver: Send + Sync {
    /// Looks up `method_id`; `None` when the method is not present in the
    /// resolver's DID document(s).
    fn resolve(&self, method_id: &str) -> Option<PublicKey>;
}

/// A fixed map of verification methods, useful for tests and for callers
/// that have already resolved their DID documents.
#[derive(Debug, Clone, Default)]
pub struct StaticMethodResolver {
    methods: HashMap<String, PublicKey>,
}

impl StaticMethodResolver {
    /// An empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` under `method_id`, replacing any previous entry.
    pub fn insert(&mut self, method_id: impl Into<String>, key: PublicKey) {
        self.methods.insert(method_id.into(), key);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, method_id: impl Into<String>, key: PublicKey) -> Self {
        self.insert(method_id, key);
        self
    }
}

impl VerificationMethodResolver for StaticMethodResolver {
    fn resolve(&self, method_id: &str) -> Option<PublicKey> {
        self.methods.get(method_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_types::keys::SignatureAlgorithm;

    #[test]
    fn static_resolver_round_trips() {
        let key = PublicKey::new(SignatureAlgorithm::Ed25519, vec![7; 32]);
        let resolver = StaticMethodResolver::new().with("did:key:abc#key-1", key.clone());
        assert_eq!(resolver.resolve("did:key:abc#key-1"), Some(key));
        assert!(resolver.resolve("did:key:abc#key-2").is_none());
    }
}

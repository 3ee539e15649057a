// Path: crates/integrity/src/context.rs
//! The collaborator bundle every engine entry point receives.

use crate::canon::JcsCanonicalizer;
use crate::registry::{CryptosuiteRegistry, SignerRegistry};
use attest_api::canon::{Canonicalizer, ContextResolver};
use attest_api::partition::StatementPartitioner;
use attest_api::select::FragmentSelector;
use attest_api::sign::HmacKeySource;
use attest_crypto::mac::OsHmacKeySource;
use attest_types::error::DataIntegrityError;
use attest_types::suite::Canonicalization;
use std::collections::HashMap;
use std::sync::Arc;

/// Groups the canonicalizers, delegates, and registries a proof operation
/// needs, so per-call APIs take one context instead of a parameter soup.
///
/// Contexts are cheap to clone and immutable once built.
#[derive(Clone)]
pub struct ProofContext {
    canonicalizers: HashMap<Canonicalization, Arc<dyn Canonicalizer>>,
    context_resolver: Option<Arc<dyn ContextResolver>>,
    partitioner: Option<Arc<dyn StatementPartitioner>>,
    selector: Option<Arc<dyn FragmentSelector>>,
    suites: Arc<CryptosuiteRegistry>,
    signers: Arc<SignerRegistry>,
    hmac_keys: Arc<dyn HmacKeySource>,
}

impl ProofContext {
    /// Starts a builder preloaded with the bundled defaults: the JCS
    /// canonicalizer, both registries, and an OS-CSPRNG HMAC key source.
    pub fn builder() -> ProofContextBuilder {
        ProofContextBuilder::default()
    }

    /// The canonicalizer registered for `method`.
    pub fn canonicalizer_for(
        &self,
        method: Canonicalization,
    ) -> Result<&dyn Canonicalizer, DataIntegrityError> {
        self.canonicalizers
            .get(&method)
            .map(AsRef::as_ref)
            .ok_or_else(|| {
                DataIntegrityError::InvalidArgument(format!(
                    "no canonicalizer registered for {method}"
                ))
            })
    }

    /// The JSON-LD context resolver, if one was supplied.
    pub fn context_resolver(&self) -> Option<&dyn ContextResolver> {
        self.context_resolver.as_deref()
    }

    /// The statement partitioner; required for the selective-disclosure paths.
    pub fn partitioner(&self) -> Result<&dyn StatementPartitioner, DataIntegrityError> {
        self.partitioner.as_deref().ok_or_else(|| {
            DataIntegrityError::InvalidArgument(
                "no statement partitioner configured".to_string(),
            )
        })
    }

    /// The fragment selector; required for deriving proofs.
    pub fn selector(&self) -> Result<&dyn FragmentSelector, DataIntegrityError> {
        self.selector.as_deref().ok_or_else(|| {
            DataIntegrityError::InvalidArgument("no fragment selector configured".to_string())
        })
    }

    /// The cryptosuite registry.
    pub fn suites(&self) -> &CryptosuiteRegistry {
        &self.suites
    }

    /// The crypto function registry.
    pub fn signers(&self) -> &SignerRegistry {
        &self.signers
    }

    /// The HMAC relabeling key source.
    pub fn hmac_keys(&self) -> &dyn HmacKeySource {
        self.hmac_keys.as_ref()
    }
}

/// Builder for [`ProofContext`].
pub struct ProofContextBuilder {
    canonicalizers: HashMap<Canonicalization, Arc<dyn Canonicalizer>>,
    context_resolver: Option<Arc<dyn ContextResolver>>,
    partitioner: Option<Arc<dyn StatementPartitioner>>,
    selector: Option<Arc<dyn FragmentSelector>>,
    suites: Arc<CryptosuiteRegistry>,
    signers: Arc<SignerRegistry>,
    hmac_keys: Arc<dyn HmacKeySource>,
}

impl Default for ProofContextBuilder {
    fn default() -> Self {
        let mut canonicalizers: HashMap<Canonicalization, Arc<dyn Canonicalizer>> = HashMap::new();
        canonicalizers.insert(Canonicalization::Jcs, Arc::new(JcsCanonicalizer));
        Self {
            canonicalizers,
            context_resolver: None,
            partitioner: None,
            selector: None,
            suites: Arc::new(CryptosuiteRegistry::with_defaults()),
            signers: Arc::new(SignerRegistry::with_defaults()),
            hmac_keys: Arc::new(OsHmacKeySource::new()),
        }
    }
}

impl ProofContextBuilder {
    /// Registers a canonicalizer under its own method tag.
    pub fn with_canonicalizer(mut self, canonicalizer: Arc<dyn Canonicalizer>) -> Self {
        self.canonicalizers
            .insert(canonicalizer.method(), canonicalizer);
        self
    }

    /// Supplies a JSON-LD context resolver.
    pub fn with_context_resolver(mut self, resolver: Arc<dyn ContextResolver>) -> Self {
        self.context_resolver = Some(resolver);
        self
    }

    /// Supplies the statement partitioner.
    pub fn with_partitioner(mut self, partitioner: Arc<dyn StatementPartitioner>) -> Self {
        self.partitioner = Some(partitioner);
        self
    }

    /// Supplies the fragment selector.
    pub fn with_selector(mut self, selector: Arc<dyn FragmentSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Replaces the cryptosuite registry.
    pub fn with_suites(mut self, suites: CryptosuiteRegistry) -> Self {
        self.suites = Arc::new(suites);
        self
    }

    /// Replaces the crypto function registry.
    pub fn with_signers(mut self, signers: SignerRegistry) -> Self {
        self.signers = Arc::new(signers);
        self
    }

    /// Replaces the HMAC key source.
    pub fn with_hmac_key_source(mut self, source: Arc<dyn HmacKeySource>) -> Self {
        self.hmac_keys = source;
        self
    }

    /// Freezes the builder into an immutable context.
    pub fn build(self) -> ProofContext {
        ProofContext {
            canonicalizers: self.canonicalizers,
            context_resolver: self.context_resolver,
            partitioner: self.partitioner,
            selector: self.selector,
            suites: self.suites,
            signers: self.signers,
            hmac_keys: self.hmac_keys,
        }
    }
}

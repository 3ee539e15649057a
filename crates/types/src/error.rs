// Path: crates/types/src/error.rs
//! Canonical error types for the attest workspace.
//!
//! Verification *outcomes* are not errors: a proof that fails cryptographic
//! checks surfaces as [`crate::VerificationOutcome::Invalid`], never as an
//! `Err`. The enums here cover operational failures only: malformed proof
//! values, registry misconfiguration, relabeling contract violations, key
//! handling, and cancellation.

use crate::keys::SignatureAlgorithm;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors from the proof-value codec layer (multibase and CBOR framing).
#[derive(Error, Debug)]
pub enum CodecError {
    /// The proof value could not be decoded or parsed.
    #[error("malformed proof value: {0}")]
    MalformedProofValue(String),
    /// The CBOR framing tag identifies a different proof kind than requested.
    #[error("wrong proof kind: expected {expected} proof, found {found}")]
    WrongProofKind {
        /// The proof kind the parser was asked for.
        expected: &'static str,
        /// The proof kind the framing tag actually identified.
        found: &'static str,
    },
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            Self::MalformedProofValue(_) => "CODEC_MALFORMED_PROOF_VALUE",
            Self::WrongProofKind { .. } => "CODEC_WRONG_PROOF_KIND",
        }
    }
}

/// Errors from blank-node relabeling and label-map recovery.
#[derive(Error, Debug)]
pub enum RelabelError {
    /// Two statement lists that must correspond line-by-line have different lengths.
    #[error("statement count mismatch: {original} original vs {relabeled} relabeled")]
    CountMismatch {
        /// Number of statements in the original list.
        original: usize,
        /// Number of statements in the relabeled list.
        relabeled: usize,
    },
    /// Corresponding statements contain different numbers of blank nodes.
    #[error("blank node count mismatch in statement {index}: {original} vs {relabeled}")]
    BlankNodeCountMismatch {
        /// Index of the offending statement pair.
        index: usize,
        /// Blank nodes found in the original statement.
        original: usize,
        /// Blank nodes found in the relabeled statement.
        relabeled: usize,
    },
    /// A blank node admits more than one consistent label assignment.
    #[error("ambiguous label assignment for blank node {id}")]
    LabelMapAmbiguous {
        /// The canonical identifier that could not be assigned uniquely.
        id: String,
    },
    /// A blank node admits no consistent label assignment.
    #[error("no consistent label assignment for blank node {id}")]
    LabelMapUnresolved {
        /// The canonical identifier that could not be assigned at all.
        id: String,
    },
}

impl ErrorCode for RelabelError {
    fn code(&self) -> &'static str {
        match self {
            Self::CountMismatch { .. } => "RELABEL_COUNT_MISMATCH",
            Self::BlankNodeCountMismatch { .. } => "RELABEL_BLANK_NODE_COUNT_MISMATCH",
            Self::LabelMapAmbiguous { .. } => "RELABEL_LABEL_MAP_AMBIGUOUS",
            Self::LabelMapUnresolved { .. } => "RELABEL_LABEL_MAP_UNRESOLVED",
        }
    }
}

/// Errors from the cryptosuite and signer registries.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry was queried before anything was registered in it.
    #[error("{registry} registry has not been initialised")]
    NotInitialised {
        /// Which registry was empty.
        registry: &'static str,
    },
    /// No descriptor is registered under the given cryptosuite name.
    #[error("unknown cryptosuite: {0}")]
    UnknownCryptosuite(String),
    /// No signing or verification routine is registered for the algorithm.
    #[error("no routine registered for algorithm {0}")]
    UnknownAlgorithm(SignatureAlgorithm),
}

impl ErrorCode for RegistryError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotInitialised { .. } => "REGISTRY_NOT_INITIALISED",
            Self::UnknownCryptosuite(_) => "REGISTRY_UNKNOWN_CRYPTOSUITE",
            Self::UnknownAlgorithm(_) => "REGISTRY_UNKNOWN_ALGORITHM",
        }
    }
}

/// Errors from cryptographic key and signature handling.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The provided key material is malformed or invalid for the algorithm.
    #[error("invalid cryptographic key: {0}")]
    InvalidKey(String),
    /// The provided signature material is malformed for the algorithm.
    #[error("invalid signature format: {0}")]
    InvalidSignature(String),
    /// A failure in an underlying cryptographic routine.
    #[error("cryptographic operation failed: {0}")]
    OperationFailed(String),
    /// The algorithm is not supported by this backend.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

impl ErrorCode for CryptoError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidKey(_) => "CRYPTO_INVALID_KEY",
            Self::InvalidSignature(_) => "CRYPTO_INVALID_SIGNATURE",
            Self::OperationFailed(_) => "CRYPTO_OPERATION_FAILED",
            Self::UnsupportedAlgorithm(_) => "CRYPTO_UNSUPPORTED_ALGORITHM",
        }
    }
}

/// The top-level error type for Data Integrity operations.
#[derive(Error, Debug)]
pub enum DataIntegrityError {
    /// A proof-value codec failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A relabeling or label-map recovery failure.
    #[error(transparent)]
    Relabel(#[from] RelabelError),
    /// A registry lookup failure.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A key or signature handling failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// A canonicalization, partitioning, or context-resolution collaborator failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),
    /// JSON-LD fragment selection failed.
    #[error("fragment selection failed: {0}")]
    Selection(String),
    /// Credential or proof (de)serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// An argument violated the call contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The operation observed a cancelled token and stopped cooperatively.
    #[error("operation was cancelled")]
    Cancelled,
}

impl ErrorCode for DataIntegrityError {
    fn code(&self) -> &'static str {
        match self {
            Self::Codec(e) => e.code(),
            Self::Relabel(e) => e.code(),
            Self::Registry(e) => e.code(),
            Self::Crypto(e) => e.code(),
            Self::Canonicalization(_) => "DI_CANONICALIZATION_FAILED",
            Self::Selection(_) => "DI_SELECTION_FAILED",
            Self::Serialization(_) => "DI_SERIALIZATION_FAILED",
            Self::InvalidArgument(_) => "DI_INVALID_ARGUMENT",
            Self::Cancelled => "DI_CANCELLED",
        }
    }
}

impl From<serde_json::Error> for DataIntegrityError {
    fn from(e: serde_json::Error) -> Self {
        DataIntegrityError::Serialization(e.to_string())
    }
}

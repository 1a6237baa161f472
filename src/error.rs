//! Error types for quorum signing operations.
//!
//! Every failure carries the input that caused it; nothing is retried here.
//! Retry policy for flaky signing backends belongs to the caller.

/// Errors produced while encoding, hashing, signing, or aggregating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuorumSigError {
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Invalid value for type {type_name}: {value}")]
    InvalidValue { type_name: String, value: String },

    #[error("Invalid private key: {0}")]
    KeyFormat(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Unsupported recovery id: {0}")]
    UnsupportedRecoveryId(u8),

    #[error("Insufficient signers: got {0}")]
    InsufficientSigners(usize),

    #[error("Duplicate signer address: {0}")]
    DuplicateSigner(String),
}

pub type QuorumSigResult<T> = Result<T, QuorumSigError>;

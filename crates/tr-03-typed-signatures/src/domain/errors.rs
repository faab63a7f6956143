//! # Signature Errors

use shared_types::Timestamp;
use thiserror::Error;

/// Why a well-sized signature was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecoveryFault {
    /// `v` must be 0, 1, 27 or 28.
    #[error("invalid recovery id {0}")]
    InvalidRecoveryId(u8),

    /// `r` or `s` is zero or not below the curve order.
    #[error("scalar out of range")]
    ScalarOutOfRange,

    /// `s` above half the curve order (EIP-2).
    #[error("malleable signature (high s)")]
    HighS,

    #[error("public key recovery failed")]
    RecoveryFailed,

    /// Recovery produced the zero address.
    #[error("recovered the zero address")]
    ZeroAddress,
}

/// Errors from typed-signature verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid signature length: expected 65 bytes, got {actual}")]
    InvalidSignatureLength { actual: usize },

    #[error("Invalid signature: {0}")]
    InvalidSignature(RecoveryFault),

    /// `|now - sign_at|` exceeds the window.
    #[error("Signature expired: signed at {sign_at}, now {now}, window {window}s")]
    SignatureExpired {
        sign_at: Timestamp,
        now: Timestamp,
        window: u64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<RecoveryFault> for AuthError {
    fn from(fault: RecoveryFault) -> Self {
        AuthError::InvalidSignature(fault)
    }
}

/// Result alias for verification.
pub type AuthResult<T> = Result<T, AuthError>;

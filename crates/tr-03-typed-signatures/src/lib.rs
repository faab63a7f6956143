//! # Typed Signatures (TR-03)
//!
//! Verifies domain-separated structured-message signatures (EIP-712 style)
//! and recovers the signer's address.
//!
//! ## Checks
//!
//! 1. Signature is exactly 65 bytes (`r ‖ s ‖ v`).
//! 2. `v` is 27/28 (0/1 accepted), `r`/`s` in range, `s` low.
//! 3. Recovery succeeds and does not yield the zero address.
//! 4. `|now - signAt| <= 3600` seconds by default, with `now` from a [`Clock`].
//!
//! [`Clock`]: shared_types::Clock

pub mod config;
pub mod domain;
pub mod verifier;

// Re-export public API
pub use config::{VerifierConfig, DEFAULT_DOMAIN_NAME, DEFAULT_VALIDITY_WINDOW_SECS};
pub use domain::{
    recover_signer, signing_digest, AuthError, AuthResult, Eip712Domain, RecoveryFault,
    StructEncoder, TypedStruct, EIP712_DOMAIN_TYPE, SIGNATURE_LENGTH,
};
pub use verifier::AuthRequestVerifier;

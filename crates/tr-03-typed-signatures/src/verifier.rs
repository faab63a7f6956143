//! # Auth Request Verifier
//!
//! Binds signatures to one signing domain and checks the validity window
//! against an injected [`Clock`]. No replay bookkeeping is kept: a request
//! that verifies once verifies again until its window closes.

use crate::config::VerifierConfig;
use crate::domain::{
    recover_signer, signing_digest, AuthError, AuthResult, Eip712Domain, TypedStruct,
};
use shared_types::{fmt_address, Address, Clock, Hash, Timestamp};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct AuthRequestVerifier {
    config: VerifierConfig,
    domain: Eip712Domain,
    domain_separator: Hash,
    clock: Arc<dyn Clock>,
}

impl AuthRequestVerifier {
    pub fn new(config: VerifierConfig, clock: Arc<dyn Clock>) -> AuthResult<Self> {
        config.validate()?;
        let domain = config.domain();
        let domain_separator = domain.separator();
        Ok(Self {
            config,
            domain,
            domain_separator,
            clock,
        })
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    pub fn domain_separator(&self) -> Hash {
        self.domain_separator
    }

    /// Current time from the injected clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Digest a client signs for `payload`.
    pub fn signing_hash<T: TypedStruct>(&self, payload: &T) -> Hash {
        signing_digest(&self.domain_separator, &payload.struct_hash())
    }

    /// Recover the signer of `payload` without checking time.
    pub fn recover<T: TypedStruct>(&self, payload: &T, signature: &[u8]) -> AuthResult<Address> {
        let signer = recover_signer(&self.signing_hash(payload), signature)?;
        debug!("[tr-03] Recovered signer {}", fmt_address(&signer));
        Ok(signer)
    }

    /// Require `|now - sign_at| <= window`.
    pub fn check_window(&self, sign_at: Timestamp, now: Timestamp) -> AuthResult<()> {
        let window = self.config.validity_window_secs;
        if now.abs_diff(sign_at) > window {
            warn!(
                "[tr-03] ⏰ Signature outside window: signed at {}, now {}",
                sign_at, now
            );
            return Err(AuthError::SignatureExpired {
                sign_at,
                now,
                window,
            });
        }
        Ok(())
    }

    /// Check the window against the clock, then recover the signer.
    pub fn verify<T: TypedStruct>(&self, payload: &T, signature: &[u8]) -> AuthResult<Address> {
        self.check_window(payload.sign_at(), self.now())?;
        self.recover(payload, signature)
    }
}

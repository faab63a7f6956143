//! # Verifier Configuration

use crate::domain::{AuthError, AuthResult, Eip712Domain};
use serde::{Deserialize, Serialize};
use shared_types::{Address, U256, ZERO_ADDRESS};

/// Default signature validity window, in seconds.
pub const DEFAULT_VALIDITY_WINDOW_SECS: u64 = 3600;

/// Signing domain name used by deployed root-tagger clients.
pub const DEFAULT_DOMAIN_NAME: &str = "Terminus DID Root Tagger";

/// Signing domain and validity window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Domain name, e.g. the tagger's human-readable name.
    pub name: String,
    pub version: String,
    /// Chain or deployment context id.
    pub chain_id: u64,
    /// Address of the verifying entity.
    pub verifying_contract: Address,
    /// Maximum `|now - sign_at|` in seconds.
    pub validity_window_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DOMAIN_NAME.to_string(),
            version: "1".to_string(),
            chain_id: 1,
            verifying_contract: ZERO_ADDRESS,
            validity_window_secs: DEFAULT_VALIDITY_WINDOW_SECS,
        }
    }
}

impl VerifierConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            name: DEFAULT_DOMAIN_NAME.to_string(),
            version: "1".to_string(),
            chain_id: 31337,
            verifying_contract: [0xC0; 20],
            validity_window_secs: DEFAULT_VALIDITY_WINDOW_SECS,
        }
    }

    pub fn validate(&self) -> AuthResult<()> {
        if self.name.is_empty() {
            return Err(AuthError::InvalidConfig("name cannot be empty".to_string()));
        }
        if self.version.is_empty() {
            return Err(AuthError::InvalidConfig(
                "version cannot be empty".to_string(),
            ));
        }
        if self.validity_window_secs == 0 {
            return Err(AuthError::InvalidConfig(
                "validity_window_secs cannot be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The signing domain described by this config.
    pub fn domain(&self) -> Eip712Domain {
        Eip712Domain {
            name: self.name.clone(),
            version: self.version.clone(),
            chain_id: U256::from(self.chain_id),
            verifying_contract: self.verifying_contract,
        }
    }

    /// Builder-style method to set the domain name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder-style method to set the chain id
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Builder-style method to set the verifying entity
    pub fn with_verifying_contract(mut self, address: Address) -> Self {
        self.verifying_contract = address;
        self
    }

    /// Builder-style method to set the validity window
    pub fn with_validity_window(mut self, secs: u64) -> Self {
        self.validity_window_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VerifierConfig::default();
        assert_eq!(config.validity_window_secs, 3600);
        assert!(config.validate().is_ok());

        let domain = config.domain();
        assert_eq!(domain.name, "Terminus DID Root Tagger");
        assert_eq!(domain.version, "1");
    }

    #[test]
    fn test_invalid_configs() {
        assert!(VerifierConfig::for_testing()
            .with_validity_window(0)
            .validate()
            .is_err());
        assert!(VerifierConfig::for_testing().with_name("").validate().is_err());
    }

    #[test]
    fn test_domain_follows_config() {
        let a = VerifierConfig::for_testing().domain().separator();
        let b = VerifierConfig::for_testing()
            .with_chain_id(1)
            .domain()
            .separator();
        assert_ne!(a, b);
    }
}

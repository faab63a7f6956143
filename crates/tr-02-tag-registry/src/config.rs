//! # Tag Registry Configuration

use crate::domain::{TagError, TagResult};
use serde::{Deserialize, Serialize};
use shared_types::{Address, ZERO_ADDRESS};

/// Upper bound accepted for `max_descriptor_len`.
pub const DESCRIPTOR_LEN_CEILING: usize = 4096;

/// Tag registry configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Operator address. Administers the root namespace and may act for any
    /// namespace owner.
    pub operator: Address,

    /// Longest descriptor accepted by `define_tag`, in bytes.
    pub max_descriptor_len: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            operator: ZERO_ADDRESS,
            max_descriptor_len: 256,
        }
    }
}

impl RegistryConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            operator: [0x0F; 20],
            max_descriptor_len: 256,
        }
    }

    pub fn validate(&self) -> TagResult<()> {
        if self.operator == ZERO_ADDRESS {
            return Err(TagError::InvalidConfig(
                "operator cannot be the zero address".to_string(),
            ));
        }
        if self.max_descriptor_len == 0 || self.max_descriptor_len > DESCRIPTOR_LEN_CEILING {
            return Err(TagError::InvalidConfig(format!(
                "max_descriptor_len must be between 1 and {DESCRIPTOR_LEN_CEILING}"
            )));
        }
        Ok(())
    }

    /// Builder-style method to set the operator
    pub fn with_operator(mut self, operator: Address) -> Self {
        self.operator = operator;
        self
    }

    /// Builder-style method to set the descriptor length limit
    pub fn with_max_descriptor_len(mut self, max: usize) -> Self {
        self.max_descriptor_len = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_needs_operator() {
        let config = RegistryConfig::default();
        assert!(matches!(config.validate(), Err(TagError::InvalidConfig(_))));
        assert!(config.with_operator([1; 20]).validate().is_ok());
    }

    #[test]
    fn test_testing_config() {
        assert!(RegistryConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_descriptor_limit_bounds() {
        let config = RegistryConfig::for_testing();
        assert!(config.clone().with_max_descriptor_len(0).validate().is_err());
        assert!(config
            .clone()
            .with_max_descriptor_len(DESCRIPTOR_LEN_CEILING + 1)
            .validate()
            .is_err());
        assert!(config
            .with_max_descriptor_len(DESCRIPTOR_LEN_CEILING)
            .validate()
            .is_ok());
    }
}

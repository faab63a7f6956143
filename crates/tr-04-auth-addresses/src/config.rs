//! # Auth Address Configuration

use crate::domain::{AuthAddressError, AuthAddressResult};
use serde::{Deserialize, Serialize};
use shared_crypto::keccak256;
use shared_types::{Address, ROOT_NAMESPACE, ZERO_ADDRESS};

/// Tag holding the list.
pub const DEFAULT_TAG_NAME: &str = "authAddresses";

/// Where the list lives and who writes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthAddressConfig {
    /// Namespace of the tag (root by default).
    pub namespace: String,
    pub tag_name: String,
    /// Address the manager writes tag values as.
    pub tagger_id: Address,
}

/// Tagger address derived from the tag name.
fn derived_tagger_id(tag_name: &str) -> Address {
    let hash = keccak256(format!("tagger:{tag_name}").as_bytes());
    let mut id = [0u8; 20];
    id.copy_from_slice(&hash[12..]);
    id
}

impl Default for AuthAddressConfig {
    fn default() -> Self {
        Self {
            namespace: ROOT_NAMESPACE.to_string(),
            tag_name: DEFAULT_TAG_NAME.to_string(),
            tagger_id: derived_tagger_id(DEFAULT_TAG_NAME),
        }
    }
}

impl AuthAddressConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            tagger_id: [0x7A; 20],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> AuthAddressResult<()> {
        if self.tag_name.is_empty() {
            return Err(AuthAddressError::InvalidConfig(
                "tag_name cannot be empty".to_string(),
            ));
        }
        if self.tagger_id == ZERO_ADDRESS {
            return Err(AuthAddressError::InvalidConfig(
                "tagger_id cannot be the zero address".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder-style method to set the namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Builder-style method to set the tag name
    pub fn with_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    /// Builder-style method to set the tagger address
    pub fn with_tagger_id(mut self, tagger_id: Address) -> Self {
        self.tagger_id = tagger_id;
        self
    }
}

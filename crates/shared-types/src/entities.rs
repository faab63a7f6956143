//! # Core Domain Entities
//!
//! Primitive identifiers shared by every registry subsystem.
//!
//! ## Clusters
//!
//! - **Hashing**: `Hash`, `EntryId`
//! - **Identity**: `Address`, `TaggerId`
//! - **Time**: `Timestamp`

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
///
/// Owners, delegates and taggers are all identified by addresses.
pub type Address = [u8; 20];

/// The all-zero address. Never a valid signer.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Seconds since the Unix epoch, as read from the injected clock.
pub type Timestamp = u64;

/// Identifier of a registered entry: `keccak256(full_name)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub Hash);

impl EntryId {
    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Render an address as a `0x`-prefixed lowercase hex string.
pub fn fmt_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Metadata stored alongside a registered entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EntryMetadata {
    /// Full hierarchical name, e.g. `alice.example.com`.
    pub name: String,
    /// Decentralized identifier bound to the entry.
    pub did: String,
    /// Free-form notes.
    pub notes: String,
    /// Whether child entries may be registered under this one.
    pub allow_subdomain: bool,
}

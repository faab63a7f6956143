//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the tag registry depends on: the external name registry
//! that owns entries, and the taggers that write tag values.

use crate::domain::{Selector, TaggerId};
use shared_types::{Address, EntryId, EntryMetadata, RegistryError};

/// The hierarchical ownership registry.
///
/// Registration rules (parents, subdomain policy, transfers) belong to the
/// implementation; the tag registry only reads ownership.
pub trait NameRegistry: Send + Sync {
    fn is_registered(&self, name: &str) -> bool;

    /// Register `metadata.name` to `owner`.
    ///
    /// # Errors
    /// * `RegistryError::AlreadyRegistered` - name taken
    /// * `RegistryError::ParentNotRegistered` - parent label missing
    /// * `RegistryError::SubdomainsNotAllowed` - parent forbids children
    fn register(&self, owner: Address, metadata: EntryMetadata) -> Result<EntryId, RegistryError>;

    /// Current owner, `None` if not registered.
    fn owner_of(&self, name: &str) -> Option<Address>;

    fn metadata(&self, id: &EntryId) -> Option<EntryMetadata>;
}

/// The single authorized writer of a tag.
///
/// Taggers expose getters by selector so readers need no knowledge of how a
/// value is stored.
pub trait Tagger: Send + Sync {
    /// Address the tagger writes as.
    fn tagger_id(&self) -> TaggerId;

    /// Invoke the getter identified by `selector` for `entry_name`.
    ///
    /// Returns `None` if the selector is not served, otherwise the raw ABI
    /// value (empty when unset).
    fn call_getter(&self, selector: Selector, entry_name: &str) -> Option<Vec<u8>>;
}

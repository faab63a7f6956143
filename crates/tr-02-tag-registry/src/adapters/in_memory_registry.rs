//! In-memory Name Registry Adapter
//!
//! Implements `NameRegistry` for tests and embedding. A name may be
//! registered only if its parent is registered and allows subdomains.
//! Top-level names have no parent requirement.

use crate::ports::outbound::NameRegistry;
use parking_lot::RwLock;
use shared_types::{
    entry_id, fmt_address, parent, Address, EntryId, EntryMetadata, RegistryError,
};
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct Record {
    owner: Address,
    metadata: EntryMetadata,
}

/// Name registry backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryNameRegistry {
    entries: RwLock<HashMap<EntryId, Record>>,
}

impl InMemoryNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with default metadata that allows subdomains.
    pub fn register_name(&self, owner: Address, name: &str) -> Result<EntryId, RegistryError> {
        self.register(
            owner,
            EntryMetadata {
                name: name.to_string(),
                allow_subdomain: true,
                ..EntryMetadata::default()
            },
        )
    }

    /// Move ownership of a registered name.
    pub fn transfer(&self, name: &str, new_owner: Address) -> Result<(), RegistryError> {
        let mut entries = self.entries.write();
        let record = entries
            .get_mut(&entry_id(name))
            .ok_or_else(|| RegistryError::InvalidName(name.to_string()))?;
        record.owner = new_owner;
        info!(
            "[tr-02] 🔑 Ownership of {:?} transferred to {}",
            name,
            fmt_address(&new_owner)
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() || name.split('.').any(str::is_empty) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl NameRegistry for InMemoryNameRegistry {
    fn is_registered(&self, name: &str) -> bool {
        self.entries.read().contains_key(&entry_id(name))
    }

    fn register(&self, owner: Address, metadata: EntryMetadata) -> Result<EntryId, RegistryError> {
        let name = metadata.name.clone();
        validate_name(&name)?;

        let mut entries = self.entries.write();
        let id = entry_id(&name);
        if entries.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(name));
        }

        if let Some(parent_name) = parent(&name) {
            match entries.get(&entry_id(parent_name)) {
                None => return Err(RegistryError::ParentNotRegistered(name)),
                Some(p) if !p.metadata.allow_subdomain => {
                    return Err(RegistryError::SubdomainsNotAllowed {
                        parent: parent_name.to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        debug!("[tr-02] Registering {:?} as {}", name, id);
        entries.insert(id, Record { owner, metadata });
        Ok(id)
    }

    fn owner_of(&self, name: &str) -> Option<Address> {
        self.entries.read().get(&entry_id(name)).map(|r| r.owner)
    }

    fn metadata(&self, id: &EntryId) -> Option<EntryMetadata> {
        self.entries.read().get(id).map(|r| r.metadata.clone())
    }
}

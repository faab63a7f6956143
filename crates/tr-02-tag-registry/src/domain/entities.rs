//! # Tag Registry Entities
//!
//! Definitions, values and tagger identities.

use serde::{Deserialize, Serialize};
use shared_types::{Address, EntryId, Hash};
use std::fmt;

/// Identity of a tagger (the address it writes as).
pub type TaggerId = Address;

/// Four-byte accessor identifier used by generic readers.
pub type Selector = [u8; 4];

/// A tag slot: `(namespace, tag_name)`. The root namespace is `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagKey {
    pub namespace: String,
    pub tag_name: String,
}

impl TagKey {
    pub fn new(namespace: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            tag_name: tag_name.into(),
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "<root>/{}", self.tag_name)
        } else {
            write!(f, "{}/{}", self.namespace, self.tag_name)
        }
    }
}

/// A declared tag.
///
/// `field_name_refs` holds one field-name hash per tuple of the descriptor,
/// in pre-order. The shape is immutable once defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDefinition {
    pub namespace: String,
    pub tag_name: String,
    pub type_descriptor: Vec<u8>,
    pub field_name_refs: Vec<Hash>,
}

impl TagDefinition {
    pub fn key(&self) -> TagKey {
        TagKey::new(self.namespace.clone(), self.tag_name.clone())
    }
}

/// The stored value of a tag on one entry.
///
/// `raw` is empty exactly when `exists` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagValue {
    pub entry_id: EntryId,
    pub namespace: String,
    pub tag_name: String,
    pub raw: Vec<u8>,
    pub exists: bool,
}

impl TagValue {
    pub(crate) fn new(entry_id: EntryId, key: &TagKey, raw: Option<Vec<u8>>) -> Self {
        let raw = raw.unwrap_or_default();
        Self {
            entry_id,
            namespace: key.namespace.clone(),
            tag_name: key.tag_name.clone(),
            exists: !raw.is_empty(),
            raw,
        }
    }
}

/// A published list of tuple field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNameRecord {
    pub hash: Hash,
    pub names: Vec<String>,
    /// Position in the append-only log.
    pub position: u64,
}

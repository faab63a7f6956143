//! # Inbound Ports (Driving Ports / API)

use crate::domain::{FieldNameRecord, TagDefinition, TagResult, TagValue, TaggerId};
use crate::ports::outbound::Tagger;
use shared_types::{Address, Hash};
use std::sync::Arc;
use tr_01_type_descriptor::AbiValue;

/// Result of a generic tag read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReading {
    /// Rendered type, with field names where the type has tuples.
    pub type_string: String,
    /// Decoded value, `None` if unset.
    pub value: Option<AbiValue>,
}

/// Primary tag registry API.
pub trait TagRegistryApi: Send + Sync {
    /// Declare a tag in `namespace`.
    ///
    /// `field_names` holds one list per tuple of the descriptor, in pre-order.
    ///
    /// # Errors
    /// * `Unauthorized` - caller is neither namespace owner nor operator
    /// * `DuplicateTag` - already defined
    /// * `Descriptor(..)` - descriptor or field names rejected
    fn define_tag(
        &self,
        caller: Address,
        namespace: &str,
        tag_name: &str,
        descriptor: &[u8],
        field_names: &[Vec<String>],
    ) -> TagResult<TagDefinition>;

    fn get_definition(&self, namespace: &str, tag_name: &str) -> TagResult<TagDefinition>;

    /// Rendered type of a tag with resolved field names.
    fn type_string(&self, namespace: &str, tag_name: &str) -> TagResult<String>;

    /// Names published under `hash`.
    fn resolve_field_names(&self, hash: &Hash) -> TagResult<FieldNameRecord>;

    /// Bind the single writer of a tag, replacing any previous one.
    fn set_tagger(
        &self,
        caller: Address,
        namespace: &str,
        tag_name: &str,
        tagger: &Arc<dyn Tagger>,
    ) -> TagResult<()>;

    fn get_tagger(&self, namespace: &str, tag_name: &str) -> TagResult<TaggerId>;

    /// Write a value. Only the bound tagger may write; empty `raw` clears.
    fn set_tag_value(
        &self,
        caller: Address,
        namespace: &str,
        tag_name: &str,
        entry_name: &str,
        raw: Vec<u8>,
    ) -> TagResult<()>;

    fn get_tag_value(&self, namespace: &str, tag_name: &str, entry_name: &str)
        -> TagResult<TagValue>;

    fn has_tag(&self, namespace: &str, tag_name: &str, entry_name: &str) -> bool;

    /// Clear a value. Only the bound tagger may clear.
    fn remove_tag_value(
        &self,
        caller: Address,
        namespace: &str,
        tag_name: &str,
        entry_name: &str,
    ) -> TagResult<bool>;

    /// Read any tag without prior knowledge of its shape: definition,
    /// descriptor, tagger getter, ABI decode.
    fn read_tag(&self, namespace: &str, tag_name: &str, entry_name: &str)
        -> TagResult<TagReading>;
}

//! # Tagger Bindings
//!
//! At most one tagger is bound to a tag slot at a time; binding again
//! replaces the previous writer.
//!
//! Generic readers locate a tagger's accessor for a tag by selector:
//! the first four bytes of `keccak256("get" + UpperFirst(tag) + "(string)")`,
//! e.g. `authAddresses` → `getAuthAddresses(string)`.

use super::entities::{Selector, TagKey, TaggerId};
use crate::ports::outbound::Tagger;
use shared_crypto::keccak256;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Accessor signature for a tag's getter.
pub fn getter_signature(tag_name: &str) -> String {
    let mut chars = tag_name.chars();
    let upper_first: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("get{upper_first}(string)")
}

/// Selector a generic reader uses to call the getter of `tag_name`.
pub fn getter_selector(tag_name: &str) -> Selector {
    let hash = keccak256(getter_signature(tag_name).as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// A tag's writer. The handle is weak so taggers that hold the registry do
/// not keep each other alive.
#[derive(Clone)]
pub struct TaggerBinding {
    pub id: TaggerId,
    handle: Weak<dyn Tagger>,
}

impl TaggerBinding {
    pub fn new(tagger: &Arc<dyn Tagger>) -> Self {
        Self {
            id: tagger.tagger_id(),
            handle: Arc::downgrade(tagger),
        }
    }

    pub fn upgrade(&self) -> Option<Arc<dyn Tagger>> {
        self.handle.upgrade()
    }
}

impl std::fmt::Debug for TaggerBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggerBinding")
            .field("id", &shared_types::fmt_address(&self.id))
            .finish()
    }
}

/// Single-writer table of tag slot → tagger.
#[derive(Debug, Default)]
pub struct TaggerRegistry {
    bindings: HashMap<TagKey, TaggerBinding>,
}

impl TaggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `tagger`, returning the id of the writer it replaced.
    pub fn bind(&mut self, key: TagKey, tagger: &Arc<dyn Tagger>) -> Option<TaggerId> {
        self.bindings
            .insert(key, TaggerBinding::new(tagger))
            .map(|previous| previous.id)
    }

    pub fn get(&self, key: &TagKey) -> Option<&TaggerBinding> {
        self.bindings.get(key)
    }
}

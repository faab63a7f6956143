//! # Tag Values
//!
//! Raw bytes keyed by `(namespace, entry, tag)`. Absence and an empty value
//! are the same state: writing empty bytes removes the entry.

use super::entities::{TagKey, TagValue};
use shared_types::EntryId;
use std::collections::HashMap;

type ValueKey = (TagKey, EntryId);

#[derive(Debug, Default)]
pub struct TagValueStore {
    values: HashMap<ValueKey, Vec<u8>>,
}

impl TagValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `raw`, or clear the slot when `raw` is empty.
    /// Returns whether the slot existed before.
    pub fn set(&mut self, key: &TagKey, entry: EntryId, raw: Vec<u8>) -> bool {
        let slot = (key.clone(), entry);
        if raw.is_empty() {
            self.values.remove(&slot).is_some()
        } else {
            self.values.insert(slot, raw).is_some()
        }
    }

    pub fn get(&self, key: &TagKey, entry: EntryId) -> TagValue {
        let raw = self.values.get(&(key.clone(), entry)).cloned();
        TagValue::new(entry, key, raw)
    }

    pub fn has(&self, key: &TagKey, entry: EntryId) -> bool {
        self.values.contains_key(&(key.clone(), entry))
    }

    pub fn remove(&mut self, key: &TagKey, entry: EntryId) -> bool {
        self.values.remove(&(key.clone(), entry)).is_some()
    }
}

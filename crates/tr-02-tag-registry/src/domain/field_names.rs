//! # Field-Name Index
//!
//! Tuple field names live outside descriptors. Each name list is published
//! once to an append-only log and referenced by its content hash,
//! `keccak256(abi.encode(string[]))`. Publishing the same list again returns
//! the existing record.

use super::entities::FieldNameRecord;
use super::errors::TagResult;
use shared_crypto::keccak256;
use shared_types::Hash;
use std::collections::HashMap;
use tr_01_type_descriptor::{abi_encode, AbiValue, TypeNode};

/// Content hash of a field-name list.
pub fn field_names_hash(names: &[String]) -> TagResult<Hash> {
    let value = AbiValue::Array(names.iter().cloned().map(AbiValue::String).collect());
    let encoded = abi_encode(&TypeNode::array_of(TypeNode::String), &value)?;
    Ok(keccak256(&encoded))
}

/// Append-only hash → names table.
#[derive(Debug, Default)]
pub struct FieldNameIndex {
    log: Vec<FieldNameRecord>,
    by_hash: HashMap<Hash, usize>,
}

impl FieldNameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a name list, returning its hash. Idempotent.
    pub fn publish(&mut self, names: &[String]) -> TagResult<Hash> {
        let hash = field_names_hash(names)?;
        if !self.by_hash.contains_key(&hash) {
            let position = self.log.len();
            self.log.push(FieldNameRecord {
                hash,
                names: names.to_vec(),
                position: position as u64,
            });
            self.by_hash.insert(hash, position);
        }
        Ok(hash)
    }

    pub fn resolve(&self, hash: &Hash) -> Option<&[String]> {
        self.by_hash
            .get(hash)
            .map(|&i| self.log[i].names.as_slice())
    }

    /// Log position at which `hash` was first published.
    pub fn position(&self, hash: &Hash) -> Option<u64> {
        self.by_hash.get(hash).map(|&i| self.log[i].position)
    }

    /// Records from `from_position` onwards, in publication order.
    pub fn replay(&self, from_position: u64) -> impl Iterator<Item = &FieldNameRecord> {
        let start = usize::try_from(from_position).unwrap_or(usize::MAX);
        self.log.iter().skip(start)
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_publish_is_idempotent() {
        let mut index = FieldNameIndex::new();
        let a = index.publish(&names(&["algorithm", "addr"])).unwrap();
        let b = index.publish(&names(&["algorithm", "addr"])).unwrap();

        assert_eq!(a, b);
        assert_eq!(index.len(), 1);
        assert_eq!(index.position(&a), Some(0));
    }

    #[test]
    fn test_order_matters() {
        let a = field_names_hash(&names(&["a", "b"])).unwrap();
        let b = field_names_hash(&names(&["b", "a"])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolve_and_replay() {
        let mut index = FieldNameIndex::new();
        let first = index.publish(&names(&["x"])).unwrap();
        let second = index.publish(&names(&["y", "z"])).unwrap();

        assert_eq!(index.resolve(&second).unwrap(), names(&["y", "z"]).as_slice());
        assert!(index.resolve(&[0u8; 32]).is_none());

        let replayed: Vec<_> = index.replay(1).map(|r| r.hash).collect();
        assert_eq!(replayed, vec![second]);
        assert_eq!(index.replay(0).count(), 2);
        assert_eq!(index.replay(u64::MAX).count(), 0);
        assert_eq!(index.position(&first), Some(0));
    }

    #[test]
    fn test_hash_covers_abi_encoding() {
        let list = names(&["a", "b"]);
        let encoded = abi_encode(
            &TypeNode::array_of(TypeNode::String),
            &AbiValue::Array(vec![
                AbiValue::String("a".into()),
                AbiValue::String("b".into()),
            ]),
        )
        .unwrap();
        assert_eq!(field_names_hash(&list).unwrap(), keccak256(&encoded));
    }
}

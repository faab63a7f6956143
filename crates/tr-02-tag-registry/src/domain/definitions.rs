//! # Tag Definitions
//!
//! A definition fixes the value type of a tag slot. The descriptor must parse
//! to exactly one type and the field-name lists must match its tuples.

use super::entities::{TagDefinition, TagKey};
use super::errors::{TagError, TagResult};
use std::collections::HashMap;
use tr_01_type_descriptor::{parse, validate_field_names, validate_layout, TypeNode};

/// Validate a descriptor and its field names, returning the parsed type.
pub fn validate_definition(
    descriptor: &[u8],
    field_names: &[Vec<String>],
    max_descriptor_len: usize,
) -> TagResult<TypeNode> {
    if descriptor.len() > max_descriptor_len {
        return Err(TagError::DescriptorTooLong {
            len: descriptor.len(),
            max: max_descriptor_len,
        });
    }
    let node = parse(descriptor)?;
    validate_layout(&node)?;
    validate_field_names(&node, field_names)?;
    Ok(node)
}

/// Defined tags keyed by `(namespace, tag_name)`.
#[derive(Debug, Default)]
pub struct TagDefinitionStore {
    definitions: HashMap<TagKey, TagDefinition>,
}

impl TagDefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new definition. Existing definitions are never replaced.
    pub fn insert(&mut self, definition: TagDefinition) -> TagResult<()> {
        let key = definition.key();
        if self.definitions.contains_key(&key) {
            return Err(TagError::DuplicateTag {
                namespace: key.namespace,
                tag_name: key.tag_name,
            });
        }
        self.definitions.insert(key, definition);
        Ok(())
    }

    pub fn get(&self, key: &TagKey) -> TagResult<&TagDefinition> {
        self.definitions
            .get(key)
            .ok_or_else(|| TagError::TagNotDefined {
                namespace: key.namespace.clone(),
                tag_name: key.tag_name.clone(),
            })
    }
}

//! Domain layer: definitions, values, tagger bindings and the field-name index.

pub mod definitions;
pub mod entities;
pub mod errors;
pub mod field_names;
pub mod taggers;
pub mod values;

pub use definitions::{validate_definition, TagDefinitionStore};
pub use entities::*;
pub use errors::{TagError, TagResult};
pub use field_names::{field_names_hash, FieldNameIndex};
pub use taggers::{getter_selector, getter_signature, TaggerBinding, TaggerRegistry};
pub use values::TagValueStore;

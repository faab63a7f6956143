//! # Tag Registry (TR-02)
//!
//! Typed attribute slots ("tags") on registered names.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): definition, value and tagger stores, field-name index
//! - **Ports Layer** (`ports/`): `TagRegistryApi` inbound; `NameRegistry` and `Tagger` outbound
//! - **Adapters Layer** (`adapters/`): in-memory `NameRegistry`
//! - **Service Layer** (`service.rs`): authority checks and locking
//!
//! ## Model
//!
//! A tag is declared once per namespace with a type descriptor. Exactly one
//! tagger may write it; anyone may read it, either as raw bytes or through
//! [`TagRegistryApi::read_tag`], which decodes the value using only the
//! stored descriptor and the tagger's getter selector.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::InMemoryNameRegistry;
pub use config::RegistryConfig;
pub use domain::{
    field_names_hash, getter_selector, getter_signature, FieldNameRecord, Selector, TagDefinition,
    TagError, TagKey, TagResult, TagValue, TaggerId,
};
pub use ports::inbound::{TagReading, TagRegistryApi};
pub use ports::outbound::{NameRegistry, Tagger};
pub use service::TagRegistryService;

//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of outbound ports.

mod in_memory_registry;

pub use in_memory_registry::InMemoryNameRegistry;

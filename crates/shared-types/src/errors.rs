//! # Error Types
//!
//! Errors raised by the external name registry port.

use thiserror::Error;

/// Errors returned by a `NameRegistry` implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The name is already registered.
    #[error("Entry already registered: {0}")]
    AlreadyRegistered(String),

    /// The parent of the name is not registered.
    #[error("Parent entry not registered for: {0}")]
    ParentNotRegistered(String),

    /// The parent does not accept child entries.
    #[error("Parent entry {parent} does not allow subdomains")]
    SubdomainsNotAllowed { parent: String },

    /// Empty names and names with empty labels are rejected.
    #[error("Invalid entry name: {0:?}")]
    InvalidName(String),
}

//! # Auth Address Errors

use super::entities::Action;
use shared_types::RegistryError;
use thiserror::Error;
use tr_01_type_descriptor::AbiError;
use tr_02_tag_registry::TagError;
use tr_03_typed_signatures::AuthError;

/// Errors from the auth-address list protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthAddressError {
    /// The request's action does not match the operation.
    #[error("Invalid action {actual}: expected {expected}")]
    InvalidAction { expected: Action, actual: u8 },

    /// Owner-side signer owns neither the entry nor any ancestor.
    #[error("Signer {signer} is not authorized for {entry:?}")]
    Unauthorized { signer: String, entry: String },

    /// Candidate-side signer is not the address being added.
    #[error("Address signature recovered {recovered}, expected {expected}")]
    InvalidAddressSignature { expected: String, recovered: String },

    #[error("Unsupported signature algorithm {0}")]
    UnsupportedAlgorithm(u8),

    /// No list exists for the entry.
    #[error("No auth addresses set for {0:?}")]
    TagNotSet(String),

    /// Out of bounds, or the element there is a different address.
    #[error("Invalid index {index} for list of {len}")]
    InvalidIndex { index: usize, len: usize },

    #[error("Address {0} not in list")]
    AddressNotFound(String),

    #[error("Entry not registered: {0}")]
    EntryNotRegistered(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result alias for auth-address operations.
pub type AuthAddressResult<T> = Result<T, AuthAddressError>;

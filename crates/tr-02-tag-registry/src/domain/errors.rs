//! # Tag Registry Errors

use shared_types::RegistryError;
use thiserror::Error;
use tr_01_type_descriptor::{AbiError, DescriptorError};

/// Tag registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("Tag {tag_name:?} already defined in namespace {namespace:?}")]
    DuplicateTag { namespace: String, tag_name: String },

    #[error("Tag {tag_name:?} not defined in namespace {namespace:?}")]
    TagNotDefined { namespace: String, tag_name: String },

    #[error("No tagger configured for {tag_name:?} in namespace {namespace:?}")]
    NoTaggerConfigured { namespace: String, tag_name: String },

    /// The configured tagger has been dropped.
    #[error("Tagger for {tag_name:?} in namespace {namespace:?} is no longer available")]
    TaggerUnavailable { namespace: String, tag_name: String },

    /// Value writes must come from the configured tagger.
    #[error("Caller {caller} is not the tagger of {tag_name:?}")]
    NotTagger { caller: String, tag_name: String },

    /// Caller does not own the namespace and is not the operator.
    #[error("Caller {caller} may not administer namespace {namespace:?}")]
    Unauthorized { caller: String, namespace: String },

    #[error("Entry not registered: {0}")]
    EntryNotRegistered(String),

    #[error("Entry {entry:?} is outside namespace {namespace:?}")]
    OutOfNamespace { entry: String, namespace: String },

    #[error("Field names not published for hash 0x{0}")]
    UnknownFieldNames(String),

    #[error("Tagger does not serve selector 0x{0}")]
    UnsupportedGetter(String),

    #[error("Invalid tag name: {0:?}")]
    InvalidTagName(String),

    #[error("Descriptor of {len} bytes exceeds limit of {max}")]
    DescriptorTooLong { len: usize, max: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result alias for tag registry operations.
pub type TagResult<T> = Result<T, TagError>;

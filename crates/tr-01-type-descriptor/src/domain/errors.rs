//! # Descriptor Errors
//!
//! Malformed-input errors raised by the descriptor grammar and the ABI value
//! codec. They are always detected locally and never retried.

use std::fmt;
use thiserror::Error;

/// Which sized node failed width validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthKind {
    /// Signed integer (`0x00`).
    Int,
    /// Unsigned integer (`0x01`).
    Uint,
    /// Fixed-size byte string (`0x08`).
    FixedBytes,
}

impl fmt::Display for WidthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidthKind::Int => f.write_str("int"),
            WidthKind::Uint => f.write_str("uint"),
            WidthKind::FixedBytes => f.write_str("bytes"),
        }
    }
}

/// Why a descriptor failed to parse as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformation {
    /// No bytes at all.
    #[error("empty input")]
    Empty,

    /// A node declared more bytes than remain.
    #[error("truncated at offset {offset}")]
    Truncated { offset: usize },

    /// Bytes remain after the root node.
    #[error("{trailing} trailing byte(s) after offset {consumed}")]
    TrailingBytes { consumed: usize, trailing: usize },

    /// Nesting exceeds the supported depth.
    #[error("nesting deeper than {max} levels")]
    TooDeep { max: usize },
}

/// Errors from parsing, rendering or encoding type descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// The byte stream does not parse to exactly one node.
    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(Malformation),

    /// Integer or fixed-bytes width outside `1..=32`.
    #[error("Invalid {kind} width {width} at offset {offset}")]
    InvalidWidth {
        kind: WidthKind,
        width: u8,
        offset: usize,
    },

    /// Leading byte is not part of the grammar.
    #[error("Unknown type tag 0x{tag:02x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    /// A tuple's name list has the wrong length.
    #[error("Tuple #{tuple} has {expected} field(s) but {actual} name(s) were supplied")]
    FieldNameArityMismatch {
        tuple: usize,
        expected: usize,
        actual: usize,
    },

    /// Fewer name lists than tuples.
    #[error("Field names supplied for {supplied} tuple(s) but tuple #{tuple} needs a list")]
    InsufficientFieldNames { tuple: usize, supplied: usize },

    /// More name lists than tuples (strict validation only).
    #[error("Field names supplied for {supplied} tuple(s) but the type has {tuples}")]
    SurplusFieldNames { tuples: usize, supplied: usize },

    /// Tuple too wide for the 2-byte field count.
    #[error("Tuple with {fields} fields cannot be encoded")]
    TupleTooLarge { fields: usize },

    /// Hex input could not be decoded.
    #[error("Invalid hex input: {0}")]
    InvalidHex(String),
}

impl From<Malformation> for DescriptorError {
    fn from(m: Malformation) -> Self {
        DescriptorError::MalformedDescriptor(m)
    }
}

/// Errors from ABI value encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Value shape does not match the type.
    #[error("Type mismatch: expected a value of type {expected}")]
    TypeMismatch { expected: String },

    /// Integer does not fit the declared width.
    #[error("Value out of range for {ty}")]
    ValueOutOfRange { ty: String },

    /// Fixed-length value or tuple has the wrong number of items.
    #[error("Length mismatch for {ty}: expected {expected}, got {actual}")]
    LengthMismatch {
        ty: String,
        expected: usize,
        actual: usize,
    },

    /// Input ends before a word or payload.
    #[error("Truncated ABI data: need {needed} byte(s) at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// An offset or length word does not fit in memory.
    #[error("Invalid offset or length word at {at}")]
    InvalidOffset { at: usize },

    /// Padding bits are not canonical.
    #[error("Non-canonical encoding of {ty} at offset {offset}")]
    InvalidPadding { ty: String, offset: usize },

    /// `string` payload is not UTF-8.
    #[error("Invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// Array whose elements encode to zero bytes. The element count of such
    /// an array is not bounded by the input.
    #[error("Array of zero-sized elements: {ty}")]
    ZeroSizedElement { ty: String },
}

/// Result alias for descriptor operations.
pub type DescriptorResult<T> = Result<T, DescriptorError>;

/// Result alias for ABI operations.
pub type AbiResult<T> = Result<T, AbiError>;

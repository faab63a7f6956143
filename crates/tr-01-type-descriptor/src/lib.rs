//! # Type Descriptors (TR-01)
//!
//! Compact binary descriptors for the value types a tag may hold, plus the
//! ABI codec used to store and read those values.
//!
//! ## Grammar
//!
//! Every node starts with a one-byte tag (`0x00..=0x09`). Scalars are a single
//! byte or a tag plus width; arrays and tuples nest recursively. A descriptor
//! is valid only if it parses to exactly one node with no bytes left over.
//!
//! ## Field Names
//!
//! Tuples carry no names in the descriptor. Names are supplied separately as
//! one list per tuple, matched in pre-order (outer tuple first, then its
//! fields left to right).
//!
//! ```text
//! 0x04 0x06 0x0002 0x01 0x01 0x07
//!   => tuple(uint8,address)[]
//!   => tuple(uint8 algorithm,address addr)[]   with [["algorithm","addr"]]
//! ```

pub mod domain;

// Re-export public API
pub use domain::abi::{validate_layout, AbiValue};
pub use domain::decoder::{
    decode, decode_hex, hex_to_bytes, parse, validate_field_names, MAX_NESTING_DEPTH,
};
pub use domain::errors::{
    AbiError, AbiResult, DescriptorError, DescriptorResult, Malformation, WidthKind,
};
pub use domain::type_node::TypeNode;

/// Encode a value of type `ty` as ABI bytes.
pub fn abi_encode(ty: &TypeNode, value: &AbiValue) -> AbiResult<Vec<u8>> {
    domain::abi::encode(ty, value)
}

/// Decode ABI bytes as a value of type `ty`.
pub fn abi_decode(ty: &TypeNode, data: &[u8]) -> AbiResult<AbiValue> {
    domain::abi::decode(ty, data)
}

//! # Descriptor Decoder
//!
//! Recursive-descent parser over the compact grammar. Decoding is a pure
//! function of `(bytes, field_names)`: the same inputs always produce the same
//! type string.
//!
//! Structural errors (unknown tags, bad widths, truncation, trailing bytes)
//! are reported before field-name errors.

use super::errors::{DescriptorError, DescriptorResult, Malformation, WidthKind};
use super::type_node::*;

/// Deepest nesting accepted from untrusted input.
pub const MAX_NESTING_DEPTH: usize = 64;

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn read_u8(&mut self) -> DescriptorResult<u8> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or(Malformation::Truncated { offset: self.pos })?;
        self.pos += 1;
        Ok(b)
    }

    fn read_u16_be(&mut self) -> DescriptorResult<u16> {
        let hi = self.read_u8()?;
        let lo = self.read_u8()?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

/// Parse descriptor bytes into a [`TypeNode`].
///
/// The whole input must be consumed by exactly one root node.
pub fn parse(bytes: &[u8]) -> DescriptorResult<TypeNode> {
    if bytes.is_empty() {
        return Err(Malformation::Empty.into());
    }

    let mut cursor = Cursor::new(bytes);
    let node = parse_node(&mut cursor, 0)?;

    if cursor.remaining() != 0 {
        return Err(Malformation::TrailingBytes {
            consumed: cursor.pos,
            trailing: cursor.remaining(),
        }
        .into());
    }

    Ok(node)
}

fn parse_node(cursor: &mut Cursor<'_>, depth: usize) -> DescriptorResult<TypeNode> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Malformation::TooDeep {
            max: MAX_NESTING_DEPTH,
        }
        .into());
    }

    let offset = cursor.pos;
    let tag = cursor.read_u8()?;

    let node = match tag {
        TAG_INT => TypeNode::Int {
            width: read_width(cursor, WidthKind::Int)?,
        },
        TAG_UINT => TypeNode::Uint {
            width: read_width(cursor, WidthKind::Uint)?,
        },
        TAG_BOOL => TypeNode::Bool,
        TAG_STRING => TypeNode::String,
        TAG_ARRAY => TypeNode::Array(Box::new(parse_node(cursor, depth + 1)?)),
        TAG_FIXED_ARRAY => {
            let len = cursor.read_u16_be()?;
            TypeNode::FixedArray(len, Box::new(parse_node(cursor, depth + 1)?))
        }
        TAG_TUPLE => {
            let count = usize::from(cursor.read_u16_be()?);
            // Every field needs at least one byte.
            let mut fields = Vec::with_capacity(count.min(cursor.remaining()));
            for _ in 0..count {
                fields.push(parse_node(cursor, depth + 1)?);
            }
            TypeNode::Tuple(fields)
        }
        TAG_ADDRESS => TypeNode::Address,
        TAG_FIXED_BYTES => TypeNode::FixedBytes(read_width(cursor, WidthKind::FixedBytes)?),
        TAG_BYTES => TypeNode::Bytes,
        other => return Err(DescriptorError::UnknownTag { tag: other, offset }),
    };

    Ok(node)
}

fn read_width(cursor: &mut Cursor<'_>, kind: WidthKind) -> DescriptorResult<u8> {
    let offset = cursor.pos;
    let width = cursor.read_u8()?;
    if width == 0 || width > MAX_WIDTH {
        return Err(DescriptorError::InvalidWidth {
            kind,
            width,
            offset,
        });
    }
    Ok(width)
}

/// Decode descriptor bytes into a type signature string.
///
/// With `field_names`, each tuple (in pre-order) consumes the next name list
/// and renders as `tuple(<type0> <name0>,...)`.
pub fn decode(bytes: &[u8], field_names: Option<&[Vec<String>]>) -> DescriptorResult<String> {
    let node = parse(bytes)?;
    match field_names {
        Some(names) => node.render_with_names(names),
        None => Ok(node.to_string()),
    }
}

/// [`decode`] over a hex string, with or without a `0x` prefix.
pub fn decode_hex(input: &str, field_names: Option<&[Vec<String>]>) -> DescriptorResult<String> {
    let bytes = hex_to_bytes(input)?;
    decode(&bytes, field_names)
}

/// Decode a hex string with an optional `0x` prefix.
pub fn hex_to_bytes(input: &str) -> DescriptorResult<Vec<u8>> {
    let stripped = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(stripped).map_err(|e| DescriptorError::InvalidHex(e.to_string()))
}

/// Check that `field_names` has exactly one list per tuple with matching
/// arity. Stricter than [`decode`], which ignores surplus lists.
pub fn validate_field_names(node: &TypeNode, field_names: &[Vec<String>]) -> DescriptorResult<()> {
    let arities = node.tuple_arities();

    for (tuple, expected) in arities.iter().enumerate() {
        let list = field_names
            .get(tuple)
            .ok_or(DescriptorError::InsufficientFieldNames {
                tuple,
                supplied: field_names.len(),
            })?;
        if list.len() != *expected {
            return Err(DescriptorError::FieldNameArityMismatch {
                tuple,
                expected: *expected,
                actual: list.len(),
            });
        }
    }

    if field_names.len() > arities.len() {
        return Err(DescriptorError::SurplusFieldNames {
            tuples: arities.len(),
            supplied: field_names.len(),
        });
    }

    Ok(())
}

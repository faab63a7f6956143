//! # Type Nodes
//!
//! In-memory form of a type descriptor. Each node corresponds to one leading
//! tag byte of the compact grammar:
//!
//! | tag | node | following bytes |
//! |-----|------|-----------------|
//! | `0x00` | `Int` | width in bytes (1..=32) |
//! | `0x01` | `Uint` | width in bytes (1..=32) |
//! | `0x02` | `Bool` | - |
//! | `0x03` | `String` | - |
//! | `0x04` | `Array` | element |
//! | `0x05` | `FixedArray` | u16 BE length, element |
//! | `0x06` | `Tuple` | u16 BE field count, fields |
//! | `0x07` | `Address` | - |
//! | `0x08` | `FixedBytes` | length (1..=32) |
//! | `0x09` | `Bytes` | - |

use super::errors::{DescriptorError, DescriptorResult};
use std::fmt;

pub const TAG_INT: u8 = 0x00;
pub const TAG_UINT: u8 = 0x01;
pub const TAG_BOOL: u8 = 0x02;
pub const TAG_STRING: u8 = 0x03;
pub const TAG_ARRAY: u8 = 0x04;
pub const TAG_FIXED_ARRAY: u8 = 0x05;
pub const TAG_TUPLE: u8 = 0x06;
pub const TAG_ADDRESS: u8 = 0x07;
pub const TAG_FIXED_BYTES: u8 = 0x08;
pub const TAG_BYTES: u8 = 0x09;

/// Maximum width in bytes for integers and fixed byte strings.
pub const MAX_WIDTH: u8 = 32;

/// A structural type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeNode {
    /// Signed integer, `width` bytes.
    Int { width: u8 },
    /// Unsigned integer, `width` bytes.
    Uint { width: u8 },
    Bool,
    String,
    /// Dynamic-length array.
    Array(Box<TypeNode>),
    /// Array with a fixed number of elements.
    FixedArray(u16, Box<TypeNode>),
    /// Ordered heterogeneous fields.
    Tuple(Vec<TypeNode>),
    Address,
    /// `bytesN`, `N` bytes.
    FixedBytes(u8),
    /// Dynamic byte string.
    Bytes,
}

impl TypeNode {
    /// `uint256`
    pub fn uint256() -> Self {
        TypeNode::Uint { width: 32 }
    }

    /// Dynamic array of `elem`.
    pub fn array_of(elem: TypeNode) -> Self {
        TypeNode::Array(Box::new(elem))
    }

    /// Encode this node back to descriptor bytes.
    pub fn encode(&self) -> DescriptorResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(&mut out)?;
        Ok(out)
    }

    fn encode_into(&self, out: &mut Vec<u8>) -> DescriptorResult<()> {
        match self {
            TypeNode::Int { width } => out.extend_from_slice(&[TAG_INT, *width]),
            TypeNode::Uint { width } => out.extend_from_slice(&[TAG_UINT, *width]),
            TypeNode::Bool => out.push(TAG_BOOL),
            TypeNode::String => out.push(TAG_STRING),
            TypeNode::Array(elem) => {
                out.push(TAG_ARRAY);
                elem.encode_into(out)?;
            }
            TypeNode::FixedArray(len, elem) => {
                out.push(TAG_FIXED_ARRAY);
                out.extend_from_slice(&len.to_be_bytes());
                elem.encode_into(out)?;
            }
            TypeNode::Tuple(fields) => {
                let count = u16::try_from(fields.len()).map_err(|_| {
                    DescriptorError::TupleTooLarge {
                        fields: fields.len(),
                    }
                })?;
                out.push(TAG_TUPLE);
                out.extend_from_slice(&count.to_be_bytes());
                for field in fields {
                    field.encode_into(out)?;
                }
            }
            TypeNode::Address => out.push(TAG_ADDRESS),
            TypeNode::FixedBytes(n) => out.extend_from_slice(&[TAG_FIXED_BYTES, *n]),
            TypeNode::Bytes => out.push(TAG_BYTES),
        }
        Ok(())
    }

    /// Field count of every tuple, in pre-order (parent before children).
    ///
    /// This is the shape a field-name list must match.
    pub fn tuple_arities(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_arities(&mut out);
        out
    }

    fn collect_arities(&self, out: &mut Vec<usize>) {
        match self {
            TypeNode::Array(elem) | TypeNode::FixedArray(_, elem) => elem.collect_arities(out),
            TypeNode::Tuple(fields) => {
                out.push(fields.len());
                for field in fields {
                    field.collect_arities(out);
                }
            }
            _ => {}
        }
    }

    /// Whether the ABI encoding of this type has a variable size.
    pub fn is_dynamic(&self) -> bool {
        match self {
            TypeNode::String | TypeNode::Bytes | TypeNode::Array(_) => true,
            TypeNode::FixedArray(_, elem) => elem.is_dynamic(),
            TypeNode::Tuple(fields) => fields.iter().any(TypeNode::is_dynamic),
            _ => false,
        }
    }

    /// Render with tuple field names, consuming one name list per tuple in
    /// pre-order. Lists beyond the last tuple are ignored.
    pub fn render_with_names(&self, field_names: &[Vec<String>]) -> DescriptorResult<String> {
        let mut next_tuple = 0usize;
        let mut out = String::new();
        self.render(&mut out, Some(field_names), &mut next_tuple)?;
        Ok(out)
    }

    fn render(
        &self,
        out: &mut String,
        names: Option<&[Vec<String>]>,
        next_tuple: &mut usize,
    ) -> DescriptorResult<()> {
        match self {
            TypeNode::Int { width } => out.push_str(&format!("int{}", u16::from(*width) * 8)),
            TypeNode::Uint { width } => out.push_str(&format!("uint{}", u16::from(*width) * 8)),
            TypeNode::Bool => out.push_str("bool"),
            TypeNode::String => out.push_str("string"),
            TypeNode::Array(elem) => {
                elem.render(out, names, next_tuple)?;
                out.push_str("[]");
            }
            TypeNode::FixedArray(len, elem) => {
                elem.render(out, names, next_tuple)?;
                out.push_str(&format!("[{len}]"));
            }
            TypeNode::Tuple(fields) => {
                let own_names = match names {
                    Some(lists) => {
                        let index = *next_tuple;
                        *next_tuple += 1;
                        let list = lists.get(index).ok_or(
                            DescriptorError::InsufficientFieldNames {
                                tuple: index,
                                supplied: lists.len(),
                            },
                        )?;
                        Some((index, list))
                    }
                    None => None,
                };

                let mut rendered = Vec::with_capacity(fields.len());
                for field in fields {
                    let mut s = String::new();
                    field.render(&mut s, names, next_tuple)?;
                    rendered.push(s);
                }

                out.push_str("tuple(");
                match own_names {
                    Some((index, list)) => {
                        if list.len() != rendered.len() {
                            return Err(DescriptorError::FieldNameArityMismatch {
                                tuple: index,
                                expected: rendered.len(),
                                actual: list.len(),
                            });
                        }
                        let joined: Vec<String> = rendered
                            .iter()
                            .zip(list)
                            .map(|(ty, name)| format!("{ty} {name}"))
                            .collect();
                        out.push_str(&joined.join(","));
                    }
                    None => out.push_str(&rendered.join(",")),
                }
                out.push(')');
            }
            TypeNode::Address => out.push_str("address"),
            TypeNode::FixedBytes(n) => out.push_str(&format!("bytes{n}")),
            TypeNode::Bytes => out.push_str("bytes"),
        }
        Ok(())
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        let mut next_tuple = 0usize;
        // Rendering without names cannot fail.
        self.render(&mut out, None, &mut next_tuple)
            .map_err(|_| fmt::Error)?;
        f.write_str(&out)
    }
}

//! # ABI Value Codec
//!
//! Tag values are stored as the standard contract-ABI encoding of a single
//! parameter of the tag's declared type (`abi.encode(value)`). Generic readers
//! pair this codec with the descriptor decoder to read any tag without knowing
//! its shape in advance.
//!
//! Layout rules: static values occupy their head slots inline; dynamic values
//! leave a 32-byte offset (relative to the start of the enclosing sequence) in
//! the head and are appended to the tail.

use super::errors::{AbiError, AbiResult};
use super::type_node::TypeNode;
use primitive_types::U256;
use shared_types::Address;

const WORD: usize = 32;

/// A decoded value tree mirroring a [`TypeNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// Signed integer as a 256-bit two's complement word.
    Int(U256),
    Uint(U256),
    Bool(bool),
    String(String),
    Address(Address),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    Array(Vec<AbiValue>),
    FixedArray(Vec<AbiValue>),
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    /// Signed integer from an `i64`.
    pub fn int(v: i64) -> Self {
        if v >= 0 {
            AbiValue::Int(U256::from(v as u64))
        } else {
            // Two's complement: !(|v| - 1)
            AbiValue::Int(!U256::from(v.unsigned_abs() - 1))
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            AbiValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            AbiValue::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AbiValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Items of an array, fixed array or tuple.
    pub fn as_items(&self) -> Option<&[AbiValue]> {
        match self {
            AbiValue::Array(items) | AbiValue::FixedArray(items) | AbiValue::Tuple(items) => {
                Some(items)
            }
            _ => None,
        }
    }
}

/// Encode a single value of type `ty`.
pub fn encode(ty: &TypeNode, value: &AbiValue) -> AbiResult<Vec<u8>> {
    encode_sequence(&[(ty, value)])
}

/// Decode a single value of type `ty` from `data`.
pub fn decode(ty: &TypeNode, data: &[u8]) -> AbiResult<AbiValue> {
    let mut values = decode_sequence(&[ty], data, 0)?;
    values.pop().ok_or(AbiError::Truncated {
        offset: 0,
        needed: WORD,
    })
}

/// Reject types that have no bounded ABI decoding: arrays (and non-empty
/// fixed arrays) whose elements encode to zero bytes, such as `tuple()[]`.
pub fn validate_layout(ty: &TypeNode) -> AbiResult<()> {
    match ty {
        TypeNode::Array(elem) => {
            if head_size(elem) == 0 {
                return Err(AbiError::ZeroSizedElement { ty: ty.to_string() });
            }
            validate_layout(elem)
        }
        TypeNode::FixedArray(len, elem) => {
            if *len > 0 && head_size(elem) == 0 {
                return Err(AbiError::ZeroSizedElement { ty: ty.to_string() });
            }
            validate_layout(elem)
        }
        TypeNode::Tuple(fields) => fields.iter().try_for_each(validate_layout),
        _ => Ok(()),
    }
}

/// Size of the head slot a value of this type occupies.
fn head_size(ty: &TypeNode) -> usize {
    if ty.is_dynamic() {
        WORD
    } else {
        static_size(ty)
    }
}

fn static_size(ty: &TypeNode) -> usize {
    match ty {
        TypeNode::FixedArray(len, elem) => static_size(elem).saturating_mul(usize::from(*len)),
        TypeNode::Tuple(fields) => fields
            .iter()
            .fold(0usize, |acc, f| acc.saturating_add(static_size(f))),
        _ => WORD,
    }
}

fn word(v: U256) -> [u8; WORD] {
    let mut out = [0u8; WORD];
    v.to_big_endian(&mut out);
    out
}

fn pad_right(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(data);
    let rem = data.len() % WORD;
    if rem != 0 {
        out.resize(out.len() + WORD - rem, 0);
    }
}

fn encode_sequence(items: &[(&TypeNode, &AbiValue)]) -> AbiResult<Vec<u8>> {
    let head_len: usize = items.iter().map(|(ty, _)| head_size(ty)).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for (ty, value) in items {
        let encoded = encode_value(ty, value)?;
        if ty.is_dynamic() {
            head.extend_from_slice(&word(U256::from(head_len + tail.len())));
            tail.extend(encoded);
        } else {
            head.extend(encoded);
        }
    }

    head.extend(tail);
    Ok(head)
}

fn encode_value(ty: &TypeNode, value: &AbiValue) -> AbiResult<Vec<u8>> {
    match (ty, value) {
        (TypeNode::Uint { width }, AbiValue::Uint(v)) => {
            if v.bits() > usize::from(*width) * 8 {
                return Err(AbiError::ValueOutOfRange { ty: ty.to_string() });
            }
            Ok(word(*v).to_vec())
        }
        (TypeNode::Int { width }, AbiValue::Int(v)) => {
            if !fits_signed(*v, usize::from(*width) * 8) {
                return Err(AbiError::ValueOutOfRange { ty: ty.to_string() });
            }
            Ok(word(*v).to_vec())
        }
        (TypeNode::Bool, AbiValue::Bool(b)) => Ok(word(U256::from(u8::from(*b))).to_vec()),
        (TypeNode::Address, AbiValue::Address(a)) => {
            let mut out = vec![0u8; 12];
            out.extend_from_slice(a);
            Ok(out)
        }
        (TypeNode::FixedBytes(n), AbiValue::FixedBytes(bytes)) => {
            if bytes.len() != usize::from(*n) {
                return Err(AbiError::LengthMismatch {
                    ty: ty.to_string(),
                    expected: usize::from(*n),
                    actual: bytes.len(),
                });
            }
            let mut out = Vec::with_capacity(WORD);
            pad_right(&mut out, bytes);
            Ok(out)
        }
        (TypeNode::Bytes, AbiValue::Bytes(bytes)) => Ok(encode_dynamic_bytes(bytes)),
        (TypeNode::String, AbiValue::String(s)) => Ok(encode_dynamic_bytes(s.as_bytes())),
        (TypeNode::Array(elem), AbiValue::Array(items)) => {
            let mut out = word(U256::from(items.len())).to_vec();
            let pairs: Vec<_> = items.iter().map(|v| (elem.as_ref(), v)).collect();
            out.extend(encode_sequence(&pairs)?);
            Ok(out)
        }
        (TypeNode::FixedArray(len, elem), AbiValue::FixedArray(items)) => {
            if items.len() != usize::from(*len) {
                return Err(AbiError::LengthMismatch {
                    ty: ty.to_string(),
                    expected: usize::from(*len),
                    actual: items.len(),
                });
            }
            let pairs: Vec<_> = items.iter().map(|v| (elem.as_ref(), v)).collect();
            encode_sequence(&pairs)
        }
        (TypeNode::Tuple(fields), AbiValue::Tuple(items)) => {
            if items.len() != fields.len() {
                return Err(AbiError::LengthMismatch {
                    ty: ty.to_string(),
                    expected: fields.len(),
                    actual: items.len(),
                });
            }
            let pairs: Vec<_> = fields.iter().zip(items.iter()).collect();
            encode_sequence(&pairs)
        }
        _ => Err(AbiError::TypeMismatch {
            expected: ty.to_string(),
        }),
    }
}

fn encode_dynamic_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = word(U256::from(bytes.len())).to_vec();
    pad_right(&mut out, bytes);
    out
}

/// Whether the two's complement word `v` is a valid `bits`-wide signed value.
fn fits_signed(v: U256, bits: usize) -> bool {
    if bits >= 256 {
        return true;
    }
    let upper = v >> (bits - 1);
    upper.is_zero() || upper == (U256::MAX >> (bits - 1))
}

fn read_word(data: &[u8], at: usize) -> AbiResult<&[u8]> {
    at.checked_add(WORD)
        .and_then(|end| data.get(at..end))
        .ok_or(AbiError::Truncated {
            offset: at,
            needed: WORD,
        })
}

fn read_usize(data: &[u8], at: usize) -> AbiResult<usize> {
    let v = U256::from_big_endian(read_word(data, at)?);
    if v.bits() > 64 {
        return Err(AbiError::InvalidOffset { at });
    }
    usize::try_from(v.low_u64()).map_err(|_| AbiError::InvalidOffset { at })
}

fn decode_sequence(types: &[&TypeNode], data: &[u8], base: usize) -> AbiResult<Vec<AbiValue>> {
    let mut values = Vec::with_capacity(types.len());
    let mut cursor = base;

    for ty in types {
        if ty.is_dynamic() {
            let rel = read_usize(data, cursor)?;
            let start = base
                .checked_add(rel)
                .ok_or(AbiError::InvalidOffset { at: cursor })?;
            values.push(decode_value(ty, data, start)?);
            cursor += WORD;
        } else {
            values.push(decode_value(ty, data, cursor)?);
            cursor = cursor
                .checked_add(static_size(ty))
                .ok_or(AbiError::InvalidOffset { at: cursor })?;
        }
    }

    Ok(values)
}

fn decode_value(ty: &TypeNode, data: &[u8], at: usize) -> AbiResult<AbiValue> {
    let non_canonical = || AbiError::InvalidPadding {
        ty: ty.to_string(),
        offset: at,
    };

    match ty {
        TypeNode::Uint { width } => {
            let v = U256::from_big_endian(read_word(data, at)?);
            if v.bits() > usize::from(*width) * 8 {
                return Err(non_canonical());
            }
            Ok(AbiValue::Uint(v))
        }
        TypeNode::Int { width } => {
            let v = U256::from_big_endian(read_word(data, at)?);
            if !fits_signed(v, usize::from(*width) * 8) {
                return Err(non_canonical());
            }
            Ok(AbiValue::Int(v))
        }
        TypeNode::Bool => {
            let v = U256::from_big_endian(read_word(data, at)?);
            if v > U256::one() {
                return Err(non_canonical());
            }
            Ok(AbiValue::Bool(!v.is_zero()))
        }
        TypeNode::Address => {
            let w = read_word(data, at)?;
            if w[..12].iter().any(|b| *b != 0) {
                return Err(non_canonical());
            }
            let mut address = [0u8; 20];
            address.copy_from_slice(&w[12..]);
            Ok(AbiValue::Address(address))
        }
        TypeNode::FixedBytes(n) => {
            let w = read_word(data, at)?;
            let n = usize::from(*n);
            if w[n..].iter().any(|b| *b != 0) {
                return Err(non_canonical());
            }
            Ok(AbiValue::FixedBytes(w[..n].to_vec()))
        }
        TypeNode::Bytes => Ok(AbiValue::Bytes(read_dynamic_bytes(data, at)?.to_vec())),
        TypeNode::String => {
            let raw = read_dynamic_bytes(data, at)?;
            let s = std::str::from_utf8(raw).map_err(|_| AbiError::InvalidUtf8 { offset: at })?;
            Ok(AbiValue::String(s.to_string()))
        }
        TypeNode::Array(elem) => {
            let len = read_usize(data, at)?;
            let body = at + WORD;
            ensure_elements_fit(ty, elem, len, data, body)?;
            let types = vec![elem.as_ref(); len];
            Ok(AbiValue::Array(decode_sequence(&types, data, body)?))
        }
        TypeNode::FixedArray(len, elem) => {
            let len = usize::from(*len);
            ensure_elements_fit(ty, elem, len, data, at)?;
            let types = vec![elem.as_ref(); len];
            Ok(AbiValue::FixedArray(decode_sequence(&types, data, at)?))
        }
        TypeNode::Tuple(fields) => {
            let types: Vec<&TypeNode> = fields.iter().collect();
            Ok(AbiValue::Tuple(decode_sequence(&types, data, at)?))
        }
    }
}

/// Reject element counts the remaining input cannot possibly hold.
fn ensure_elements_fit(
    ty: &TypeNode,
    elem: &TypeNode,
    len: usize,
    data: &[u8],
    body: usize,
) -> AbiResult<()> {
    if len == 0 {
        return Ok(());
    }
    let elem_size = head_size(elem);
    if elem_size == 0 {
        return Err(AbiError::ZeroSizedElement { ty: ty.to_string() });
    }
    let needed = len.saturating_mul(elem_size);
    if needed > data.len().saturating_sub(body) {
        return Err(AbiError::Truncated {
            offset: body,
            needed,
        });
    }
    Ok(())
}

fn read_dynamic_bytes(data: &[u8], at: usize) -> AbiResult<&[u8]> {
    let len = read_usize(data, at)?;
    let start = at + WORD;
    start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .ok_or(AbiError::Truncated {
            offset: start,
            needed: len,
        })
}

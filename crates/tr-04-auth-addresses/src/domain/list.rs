//! # Auth Address List
//!
//! An ordered list that allows duplicates. Appends go to the tail; removal
//! is swap-and-pop: the last element moves into the removed slot.
//!
//! **Removal does not preserve order.** After removing any element but the
//! last, the former tail occupies the removed position. Callers must not rely
//! on insertion order or on indices surviving a removal.

use super::entities::AuthAddress;
use super::errors::{AuthAddressError, AuthAddressResult};
use shared_types::{fmt_address, Address, U256};
use tr_01_type_descriptor::{abi_decode, abi_encode, AbiError, AbiValue, TypeNode};

/// Descriptor of the stored value: `tuple(uint8,address)[]`.
pub const LIST_DESCRIPTOR: [u8; 7] = [0x04, 0x06, 0x00, 0x02, 0x01, 0x01, 0x07];

/// Field names of the list's tuple.
pub fn list_field_names() -> Vec<Vec<String>> {
    vec![vec!["algorithm".to_string(), "addr".to_string()]]
}

fn list_type() -> TypeNode {
    TypeNode::array_of(TypeNode::Tuple(vec![
        TypeNode::Uint { width: 1 },
        TypeNode::Address,
    ]))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthAddressList {
    items: Vec<AuthAddress>,
}

impl AuthAddressList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[AuthAddress] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<AuthAddress> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append. Duplicates are kept.
    pub fn push(&mut self, item: AuthAddress) {
        self.items.push(item);
    }

    /// First index holding `addr`.
    pub fn position(&self, addr: &Address) -> Option<usize> {
        self.items.iter().position(|item| &item.addr == addr)
    }

    /// Swap-and-pop the element at `index`, which must hold `addr`.
    pub fn remove_at(&mut self, index: usize, addr: &Address) -> AuthAddressResult<AuthAddress> {
        match self.items.get(index) {
            Some(item) if &item.addr == addr => Ok(self.items.swap_remove(index)),
            _ => Err(AuthAddressError::InvalidIndex {
                index,
                len: self.items.len(),
            }),
        }
    }

    /// Swap-and-pop the first element holding `addr`.
    pub fn remove(&mut self, addr: &Address) -> AuthAddressResult<AuthAddress> {
        let index = self
            .position(addr)
            .ok_or_else(|| AuthAddressError::AddressNotFound(fmt_address(addr)))?;
        Ok(self.items.swap_remove(index))
    }

    /// ABI encoding of the list. An empty list encodes to no bytes, which
    /// clears the stored tag.
    pub fn encode(&self) -> AuthAddressResult<Vec<u8>> {
        if self.items.is_empty() {
            return Ok(Vec::new());
        }
        let value = AbiValue::Array(
            self.items
                .iter()
                .map(|item| {
                    AbiValue::Tuple(vec![
                        AbiValue::Uint(U256::from(item.algorithm)),
                        AbiValue::Address(item.addr),
                    ])
                })
                .collect(),
        );
        Ok(abi_encode(&list_type(), &value)?)
    }

    /// Decode stored bytes. Empty input is an empty list.
    pub fn decode(raw: &[u8]) -> AuthAddressResult<Self> {
        if raw.is_empty() {
            return Ok(Self::new());
        }
        let mismatch = || AbiError::TypeMismatch {
            expected: list_type().to_string(),
        };

        let value = abi_decode(&list_type(), raw)?;
        let elements = value.as_items().ok_or_else(mismatch)?;

        let mut items = Vec::with_capacity(elements.len());
        for element in elements {
            let fields = element.as_items().ok_or_else(mismatch)?;
            let (algorithm, addr) = match fields {
                [algorithm, addr] => (
                    algorithm.as_uint().ok_or_else(mismatch)?,
                    addr.as_address().ok_or_else(mismatch)?,
                ),
                _ => return Err(mismatch().into()),
            };
            // uint8 range is enforced by the decoder.
            items.push(AuthAddress {
                algorithm: algorithm.low_u32() as u8,
                addr,
            });
        }
        Ok(Self { items })
    }
}

impl From<Vec<AuthAddress>> for AuthAddressList {
    fn from(items: Vec<AuthAddress>) -> Self {
        Self { items }
    }
}

//! # Auth Address Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, Timestamp, U256};
use std::fmt;
use tr_03_typed_signatures::{StructEncoder, TypedStruct};

/// What a signed request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    Add = 0,
    Remove = 1,
}

impl Action {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Add => f.write_str("Add"),
            Action::Remove => f.write_str("Remove"),
        }
    }
}

/// Signature scheme of an authenticated address. Only ECDSA is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SignatureAlgorithm {
    Ecdsa = 0,
}

impl TryFrom<u8> for SignatureAlgorithm {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SignatureAlgorithm::Ecdsa),
            other => Err(other),
        }
    }
}

/// One list element, `tuple(uint8 algorithm,address addr)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthAddress {
    pub algorithm: u8,
    pub addr: Address,
}

/// Signed add/remove request.
///
/// `algorithm` and `action` stay raw bytes: they are signed as-is and
/// unknown values must still verify before being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthAddressReq {
    pub addr: Address,
    pub algorithm: u8,
    /// Name of the entry whose list is modified.
    pub entry_name: String,
    pub sign_at: Timestamp,
    pub action: u8,
}

impl AuthAddressReq {
    pub fn new(
        action: Action,
        addr: Address,
        entry_name: impl Into<String>,
        sign_at: Timestamp,
    ) -> Self {
        Self {
            addr,
            algorithm: SignatureAlgorithm::Ecdsa as u8,
            entry_name: entry_name.into(),
            sign_at,
            action: action.as_u8(),
        }
    }

    pub fn add(addr: Address, entry_name: impl Into<String>, sign_at: Timestamp) -> Self {
        Self::new(Action::Add, addr, entry_name, sign_at)
    }

    pub fn remove(addr: Address, entry_name: impl Into<String>, sign_at: Timestamp) -> Self {
        Self::new(Action::Remove, addr, entry_name, sign_at)
    }

    pub fn with_algorithm(mut self, algorithm: u8) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_action(mut self, action: u8) -> Self {
        self.action = action;
        self
    }
}

impl TypedStruct for AuthAddressReq {
    // The entry name is signed under the field label `domain`.
    const TYPE_STRING: &'static str =
        "AuthAddressReq(address addr,uint8 algorithm,string domain,uint256 signAt,uint8 action)";

    fn encode_fields(&self, encoder: StructEncoder) -> StructEncoder {
        encoder
            .address(&self.addr)
            .uint(U256::from(self.algorithm))
            .string(&self.entry_name)
            .uint(U256::from(self.sign_at))
            .uint(U256::from(self.action))
    }

    fn sign_at(&self) -> Timestamp {
        self.sign_at
    }
}

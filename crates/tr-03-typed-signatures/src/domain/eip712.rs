//! # Typed Structured Data Hashing (EIP-712)
//!
//! ```text
//! domainSeparator = keccak256(typeHash(EIP712Domain) ‖ keccak(name) ‖ keccak(version)
//!                             ‖ chainId ‖ verifyingContract)
//! structHash      = keccak256(typeHash(T) ‖ encodeData(fields...))
//! digest          = keccak256(0x19 ‖ 0x01 ‖ domainSeparator ‖ structHash)
//! ```
//!
//! Every field encodes to one 32-byte word: atomic values are left-padded,
//! `string`/`bytes` are replaced by their keccak hash, nested structs by their
//! struct hash.

use serde::{Deserialize, Serialize};
use shared_crypto::{keccak256, KeccakHasher};
use shared_types::{Address, Hash, Timestamp, U256};

/// Type string of the domain struct.
pub const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// The verifying context a signature is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: U256,
    pub verifying_contract: Address,
}

impl Eip712Domain {
    pub fn separator(&self) -> Hash {
        StructEncoder::new(EIP712_DOMAIN_TYPE)
            .string(&self.name)
            .string(&self.version)
            .uint(self.chain_id)
            .address(&self.verifying_contract)
            .finish()
    }
}

/// Incremental `typeHash ‖ encodeData` builder. Fields must be pushed in
/// type-string order.
pub struct StructEncoder {
    hasher: KeccakHasher,
}

impl StructEncoder {
    pub fn new(type_string: &str) -> Self {
        let mut hasher = KeccakHasher::new();
        hasher.update(&keccak256(type_string.as_bytes()));
        Self { hasher }
    }

    fn word(mut self, word: &[u8; 32]) -> Self {
        self.hasher.update(word);
        self
    }

    /// Any `uintN`.
    pub fn uint(self, value: U256) -> Self {
        let mut word = [0u8; 32];
        value.to_big_endian(&mut word);
        self.word(&word)
    }

    pub fn address(self, address: &Address) -> Self {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(address);
        self.word(&word)
    }

    pub fn bool(self, value: bool) -> Self {
        self.uint(U256::from(u8::from(value)))
    }

    pub fn string(self, value: &str) -> Self {
        self.bytes(value.as_bytes())
    }

    /// Dynamic `bytes`.
    pub fn bytes(self, value: &[u8]) -> Self {
        let hash = keccak256(value);
        self.word(&hash)
    }

    /// `bytes32`, or the struct hash of a nested struct.
    pub fn hash(self, value: &Hash) -> Self {
        self.word(value)
    }

    pub fn finish(self) -> Hash {
        self.hasher.finalize()
    }
}

/// A request type that can be signed.
pub trait TypedStruct {
    /// Primary type string followed by referenced types, e.g.
    /// `Mail(Person from,string contents)Person(string name,address wallet)`.
    const TYPE_STRING: &'static str;

    /// Push this value's fields in declaration order.
    fn encode_fields(&self, encoder: StructEncoder) -> StructEncoder;

    /// When the request was signed.
    fn sign_at(&self) -> Timestamp;

    fn type_hash() -> Hash {
        keccak256(Self::TYPE_STRING.as_bytes())
    }

    fn struct_hash(&self) -> Hash {
        self.encode_fields(StructEncoder::new(Self::TYPE_STRING))
            .finish()
    }
}

/// Final digest signed by the client.
pub fn signing_digest(domain_separator: &Hash, struct_hash: &Hash) -> Hash {
    let mut hasher = KeccakHasher::new();
    hasher.update(&[0x19, 0x01]);
    hasher.update(domain_separator);
    hasher.update(struct_hash);
    hasher.finalize()
}

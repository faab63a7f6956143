//! Domain layer: typed-struct hashing and signer recovery.

pub mod eip712;
pub mod errors;
pub mod recovery;

pub use eip712::{signing_digest, Eip712Domain, StructEncoder, TypedStruct, EIP712_DOMAIN_TYPE};
pub use errors::{AuthError, AuthResult, RecoveryFault};
pub use recovery::{recover_signer, SIGNATURE_LENGTH};

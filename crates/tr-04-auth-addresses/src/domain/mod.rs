//! Domain layer: request types, the list and its encoding.

pub mod entities;
pub mod errors;
pub mod list;

pub use entities::{Action, AuthAddress, AuthAddressReq, SignatureAlgorithm};
pub use errors::{AuthAddressError, AuthAddressResult};
pub use list::{list_field_names, AuthAddressList, LIST_DESCRIPTOR};

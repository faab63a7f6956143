//! # Auth Addresses (TR-04)
//!
//! Per-entry lists of authenticated addresses, stored as the
//! `authAddresses` tag (`tuple(uint8 algorithm,address addr)[]`) and written
//! only by [`AuthAddressManager`], the tag's tagger.
//!
//! Adding needs signatures from both the entry owner and the added address;
//! removing needs the owner alone. Removal is swap-and-pop and does not
//! preserve order.

pub mod config;
pub mod domain;
pub mod service;

// Re-export public API
pub use config::{AuthAddressConfig, DEFAULT_TAG_NAME};
pub use domain::{
    list_field_names, Action, AuthAddress, AuthAddressError, AuthAddressList, AuthAddressReq,
    AuthAddressResult, SignatureAlgorithm, LIST_DESCRIPTOR,
};
pub use service::AuthAddressManager;

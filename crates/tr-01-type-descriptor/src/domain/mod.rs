//! Domain layer: descriptor grammar and ABI value codec. Pure logic, no I/O.

pub mod abi;
pub mod decoder;
pub mod errors;
pub mod type_node;

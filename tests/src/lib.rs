//! # Tagged Name Registry Test Suite
//!
//! Unified test crate for flows that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-crate flows
//!     └── flows.rs      # Registry → tags → signatures → auth addresses
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tr-tests
//!
//! # With logs
//! RUST_LOG=debug cargo test -p tr-tests -- --nocapture
//! ```

pub mod integration;

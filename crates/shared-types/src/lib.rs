//! # Shared Types Crate
//!
//! Identifiers, hierarchical name helpers and the clock port shared by every
//! registry subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-subsystem primitives are defined here.
//! - **Externally Supplied Time**: nothing in the registry reads the wall clock;
//!   time arrives through [`Clock`].

pub mod clock;
pub mod entities;
pub mod errors;
pub mod names;

pub use clock::{Clock, ManualClock};
pub use entities::*;
pub use errors::*;
pub use names::{ancestors, entry_id, is_within_namespace, parent, ROOT_NAMESPACE};

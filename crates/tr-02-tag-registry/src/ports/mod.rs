//! Ports layer: the registry API and the collaborators it depends on.

pub mod inbound;
pub mod outbound;

//! Ports for the Anchor Registry subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::AnchorRegistryApi;
pub use outbound::{BatchOperation, KeyValueStore};

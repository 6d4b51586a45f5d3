//! Adapters layer

mod misbehavior;
mod registry_reader;

pub use misbehavior::{NoMisbehaviorDetector, RepeatedFailureDetector};
pub use registry_reader::RegistryAnchorReader;

//! Domain layer for the Anchor Registry subsystem

mod error;
mod head;
pub(crate) mod keys;

pub use error::*;
pub use head::*;

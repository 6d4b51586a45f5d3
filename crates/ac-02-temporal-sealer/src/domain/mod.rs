//! Domain layer for the Temporal Sealer subsystem

mod chain;
mod error;
mod seal;

pub use chain::*;
pub use error::*;
pub use seal::*;

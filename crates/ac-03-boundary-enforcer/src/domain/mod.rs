//! Domain layer for the Boundary Enforcer subsystem

mod check;
mod error;

pub use check::*;
pub use error::*;

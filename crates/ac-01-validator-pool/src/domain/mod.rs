//! Domain layer for the Validator Pool subsystem

mod config;
mod error;
mod registry;
mod signing;
mod validator;

pub use config::*;
pub use error::*;
pub use registry::*;
pub use signing::*;
pub use validator::*;

mod entry;
mod error;

pub use entry::*;
pub use error::*;

//! Domain layer for the Consensus subsystem

mod config;
mod error;
mod tally;
mod vote_book;

pub use config::*;
pub use error::*;
pub use tally::*;
pub use vote_book::*;

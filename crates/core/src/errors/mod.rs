//! Error types and classification for strata operations

mod builders;
mod display;
mod types;

pub use types::{Error, ErrorKind, Result};

//! Core domain types, errors, and constants for the `strata` application.
//!
//! This crate establishes the foundational data structures and error handling
//! mechanisms used throughout the entire codebase. It has no I/O of its own.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum, the `ErrorKind`
//!   classification that drives aggregation and retry policy, and the
//!   `Result` type alias.
//! - **`types`**: Domain types for stack-based provisioning: `StackName`,
//!   `StackStatus`, `StackDescriptor`, the capability set, and the
//!   event-stream records returned by the provisioning API.
//! - **`constants`**: Shared defaults such as polling intervals and
//!   environment variable names.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, ErrorKind, Result},
    types::*,
};

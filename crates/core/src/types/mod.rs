//! Domain types for stack-based provisioning

mod descriptor;
mod events;
mod stack;

pub use descriptor::{Capability, StackDescriptor};
pub use events::{ResourceEventStatus, ResourceFailure, StackEvent};
pub use stack::{StackName, StackStatus};

//! Task-dependency execution engine.
//!
//! A [`TaskTree`] declares "do A and B in parallel, then C" across
//! heterogeneous units of work; [`execute`] walks the tree, respects the
//! sequential/parallel marker at every level, propagates cancellation, and
//! aggregates every error encountered into one recursive [`TaskResult`].
//!
//! Trees are built bottom-up by the orchestration driver and are immutable
//! once handed to the executor; each leaf [`Task`] runs exactly once.

mod executor;
mod result;
mod task;
mod tree;

pub use executor::execute;
pub use result::{TaskFailure, TaskResult};
pub use task::Task;
pub use tree::{TaskNode, TaskTree};

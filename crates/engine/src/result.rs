//! Recursive execution results
//!
//! Failures keep the nested shape of the tree they came from, so topology
//! is recoverable from the result alone. Flattening for display is a
//! presentation-layer concern.

use strata_core::{Error, ErrorKind};

/// Outcome of executing a task tree or any node within one.
#[derive(Debug)]
pub enum TaskResult {
    Success,
    Failure(TaskFailure),
}

impl TaskResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Success)
    }

    /// The failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&TaskFailure> {
        match self {
            TaskResult::Success => None,
            TaskResult::Failure(failure) => Some(failure),
        }
    }
}

/// A failure with the concurrent sibling failures discovered in the same
/// run.
///
/// A leaf carries the task's typed error; a node carries the failures of
/// its children. A node's failure is a single value to its own parent, so
/// deep causes surface to the top without being flattened or lost.
#[derive(Debug)]
pub enum TaskFailure {
    Leaf {
        description: String,
        error: Error,
    },
    Node {
        description: String,
        failures: Vec<TaskFailure>,
    },
}

impl TaskFailure {
    #[must_use]
    pub fn leaf(description: impl Into<String>, error: Error) -> Self {
        TaskFailure::Leaf {
            description: description.into(),
            error,
        }
    }

    #[must_use]
    pub fn node(description: impl Into<String>, failures: Vec<TaskFailure>) -> Self {
        TaskFailure::Node {
            description: description.into(),
            failures,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            TaskFailure::Leaf { description, .. } | TaskFailure::Node { description, .. } => {
                description
            }
        }
    }

    /// The most severe kind among this failure and everything nested
    /// under it.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskFailure::Leaf { error, .. } => error.kind(),
            TaskFailure::Node { failures, .. } => failures
                .iter()
                .map(TaskFailure::kind)
                .max()
                .unwrap_or(ErrorKind::RemoteFailed),
        }
    }

    /// Concurrent sibling failures from a parallel group; empty for a
    /// leaf.
    #[must_use]
    pub fn nested(&self) -> &[TaskFailure] {
        match self {
            TaskFailure::Leaf { .. } => &[],
            TaskFailure::Node { failures, .. } => failures,
        }
    }

    /// The typed error, when this failure is a leaf.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match self {
            TaskFailure::Leaf { error, .. } => Some(error),
            TaskFailure::Node { .. } => None,
        }
    }

    /// Number of independent leaf causes under this failure.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            TaskFailure::Leaf { .. } => 1,
            TaskFailure::Node { failures, .. } => failures.iter().map(TaskFailure::leaf_count).sum(),
        }
    }
}

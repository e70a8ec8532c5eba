//! Stack naming and lifecycle status

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical name of a stack, unique per target environment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackName(String);

impl StackName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StackName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for StackName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Lifecycle status of a stack as reported by the provisioning API.
///
/// Transitions are driven entirely by the remote side; local code only
/// observes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StackStatus {
    NotFound,
    CreateInProgress,
    CreateComplete,
    CreateFailed,
    UpdateInProgress,
    UpdateComplete,
    UpdateFailed,
    RollbackInProgress,
    RollbackComplete,
    RollbackFailed,
    DeleteInProgress,
    DeleteComplete,
    DeleteFailed,
}

impl StackStatus {
    /// A terminal status never transitions further without new caller action.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.is_complete() || self.is_failed()
    }

    /// Successful terminal statuses.
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(
            self,
            StackStatus::CreateComplete
                | StackStatus::UpdateComplete
                | StackStatus::RollbackComplete
                | StackStatus::DeleteComplete
        )
    }

    /// Failed terminal statuses. A completed rollback still means the
    /// requested operation did not succeed, so it does not count here.
    #[must_use]
    pub fn is_failed(self) -> bool {
        matches!(
            self,
            StackStatus::CreateFailed
                | StackStatus::UpdateFailed
                | StackStatus::RollbackFailed
                | StackStatus::DeleteFailed
        )
    }

    /// Whether the stack is mid-rollback or has rolled back.
    #[must_use]
    pub fn is_rollback(self) -> bool {
        matches!(
            self,
            StackStatus::RollbackInProgress
                | StackStatus::RollbackComplete
                | StackStatus::RollbackFailed
        )
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StackStatus::NotFound => "NOT_FOUND",
            StackStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            StackStatus::CreateComplete => "CREATE_COMPLETE",
            StackStatus::CreateFailed => "CREATE_FAILED",
            StackStatus::UpdateInProgress => "UPDATE_IN_PROGRESS",
            StackStatus::UpdateComplete => "UPDATE_COMPLETE",
            StackStatus::UpdateFailed => "UPDATE_FAILED",
            StackStatus::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            StackStatus::RollbackComplete => "ROLLBACK_COMPLETE",
            StackStatus::RollbackFailed => "ROLLBACK_FAILED",
            StackStatus::DeleteInProgress => "DELETE_IN_PROGRESS",
            StackStatus::DeleteComplete => "DELETE_COMPLETE",
            StackStatus::DeleteFailed => "DELETE_FAILED",
        };
        f.write_str(label)
    }
}

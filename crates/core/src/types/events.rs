//! Event-stream records returned by the provisioning API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-resource status carried on a stack event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceEventStatus {
    CreateInProgress,
    CreateComplete,
    CreateFailed,
    UpdateInProgress,
    UpdateComplete,
    UpdateFailed,
    DeleteInProgress,
    DeleteComplete,
    DeleteFailed,
}

impl ResourceEventStatus {
    /// Failure-class events carry the reasons surfaced in diagnostics.
    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            ResourceEventStatus::CreateFailed
                | ResourceEventStatus::UpdateFailed
                | ResourceEventStatus::DeleteFailed
        )
    }
}

impl fmt::Display for ResourceEventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceEventStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            ResourceEventStatus::CreateComplete => "CREATE_COMPLETE",
            ResourceEventStatus::CreateFailed => "CREATE_FAILED",
            ResourceEventStatus::UpdateInProgress => "UPDATE_IN_PROGRESS",
            ResourceEventStatus::UpdateComplete => "UPDATE_COMPLETE",
            ResourceEventStatus::UpdateFailed => "UPDATE_FAILED",
            ResourceEventStatus::DeleteInProgress => "DELETE_IN_PROGRESS",
            ResourceEventStatus::DeleteComplete => "DELETE_COMPLETE",
            ResourceEventStatus::DeleteFailed => "DELETE_FAILED",
        };
        f.write_str(label)
    }
}

/// A single entry in a stack's event stream.
///
/// The provisioning API returns events in chronological order; consumers
/// must process them in return order. Simultaneous timestamps tie-break by
/// return order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEvent {
    pub resource_id: String,
    pub status: ResourceEventStatus,
    pub reason: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl StackEvent {
    #[must_use]
    pub fn new(
        resource_id: impl Into<String>,
        status: ResourceEventStatus,
        reason: Option<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            status,
            reason,
            timestamp,
        }
    }
}

/// The distilled reason a resource blocked or failed an operation,
/// extracted from the event stream for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFailure {
    pub resource_id: String,
    pub status: ResourceEventStatus,
    pub reason: String,
}

impl fmt::Display for ResourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.resource_id, self.status, self.reason)
    }
}

//! Builder methods for creating errors with context

use super::types::Error;
use crate::types::{ResourceFailure, StackName, StackStatus};
use std::path::PathBuf;
use std::time::Duration;

// Helper methods for creating errors with context
impl Error {
    /// Create a pre-flight validation error
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Create a conflict error for a stack in an unexpected state
    #[must_use]
    pub fn conflict(stack: StackName, message: impl Into<String>) -> Self {
        Error::Conflict {
            stack,
            message: message.into(),
        }
    }

    /// Create a remote failure carrying the per-resource reasons extracted
    /// from the provisioning event stream
    #[must_use]
    pub fn remote(stack: StackName, status: StackStatus, reasons: Vec<ResourceFailure>) -> Self {
        Error::Remote {
            stack,
            status,
            reasons,
        }
    }

    /// Create a transient unavailability error
    #[must_use]
    pub fn unavailable(
        operation: impl Into<String>,
        message: impl Into<String>,
        attempts: usize,
    ) -> Self {
        Error::Unavailable {
            operation: operation.into(),
            message: message.into(),
            attempts,
        }
    }

    /// Create a polling timeout error carrying the last observed status
    #[must_use]
    pub fn timeout(
        operation: impl Into<String>,
        timeout: Duration,
        last_status: Option<String>,
    ) -> Self {
        Error::Timeout {
            operation: operation.into(),
            timeout,
            last_status,
        }
    }

    /// Create a cancellation error
    #[must_use]
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Error::Cancelled {
            operation: operation.into(),
        }
    }

    /// Create an informational error for a best-effort diagnostic step
    #[must_use]
    pub fn informational(message: impl Into<String>) -> Self {
        Error::Informational {
            message: message.into(),
        }
    }

    /// Create a JSON error with context
    #[must_use]
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Json {
            message: message.into(),
            source,
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}

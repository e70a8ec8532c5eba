//! Core error type definitions

use crate::types::{ResourceFailure, StackName, StackStatus};
use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for strata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for strata operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Local pre-flight validation failed; no remote call was made
    Validation { message: String },

    /// A remote resource exists in a state the operation cannot reconcile
    Conflict { stack: StackName, message: String },

    /// A stack reached a terminal failed or rollback status
    Remote {
        stack: StackName,
        status: StackStatus,
        reasons: Vec<ResourceFailure>,
    },

    /// Transient remote unavailability that outlived its retry budget
    Unavailable {
        operation: String,
        message: String,
        attempts: usize,
    },

    /// Polling exceeded its wall-clock budget
    Timeout {
        operation: String,
        timeout: Duration,
        last_status: Option<String>,
    },

    /// The caller cancelled the operation
    Cancelled { operation: String },

    /// A best-effort diagnostic step failed; never fails its parent
    Informational { message: String },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// File system operations (configuration loading)
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Classification of an [`Error`], ordered by increasing severity.
///
/// The ordering is load-bearing: a composite failure aggregating several
/// concurrent causes reports the most severe kind among them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// Best-effort sub-task failed; does not fail its parent
    Informational,
    /// Caller-initiated cancellation
    Cancelled,
    /// Transient, retried then surfaced
    Unavailable,
    /// Polling exceeded its budget
    Timeout,
    /// Terminal failed/rollback status reported by the remote API
    RemoteFailed,
    /// Remote resource exists in an unexpected state
    Conflict,
    /// Local pre-flight failure, no remote call made
    ValidationFailed,
}

impl Error {
    /// Classify this error for aggregation and retry decisions.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } | Error::Json { .. } | Error::FileSystem { .. } => {
                ErrorKind::ValidationFailed
            }
            Error::Conflict { .. } => ErrorKind::Conflict,
            Error::Remote { .. } => ErrorKind::RemoteFailed,
            Error::Unavailable { .. } => ErrorKind::Unavailable,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Cancelled { .. } => ErrorKind::Cancelled,
            Error::Informational { .. } => ErrorKind::Informational,
        }
    }

    /// Whether retrying the failed call may succeed without caller action.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Unavailable { .. })
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::Informational => "Informational",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::Unavailable => "Unavailable",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::RemoteFailed => "RemoteFailed",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::ValidationFailed => "ValidationFailed",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_severity_ordering() {
        assert!(ErrorKind::Informational < ErrorKind::Cancelled);
        assert!(ErrorKind::Unavailable < ErrorKind::RemoteFailed);
        assert!(ErrorKind::RemoteFailed < ErrorKind::Conflict);
        assert!(ErrorKind::Conflict < ErrorKind::ValidationFailed);
    }

    #[test]
    fn only_unavailable_is_transient() {
        assert!(Error::unavailable("describe_stack", "throttled", 1).is_transient());
        assert!(!Error::validation("bad capability").is_transient());
        assert!(!Error::cancelled("create_stack").is_transient());
    }
}

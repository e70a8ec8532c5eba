//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation { message } => {
                write!(f, "validation failed: {message}")
            }
            Error::Conflict { stack, message } => {
                write!(f, "conflict on stack '{stack}': {message}")
            }
            Error::Remote {
                stack,
                status,
                reasons,
            } => {
                write!(f, "stack '{stack}' reached {status}")?;
                if reasons.is_empty() {
                    return Ok(());
                }
                write!(f, ": ")?;
                let mut first = true;
                for reason in reasons {
                    if !first {
                        write!(f, "; ")?;
                    }
                    first = false;
                    write!(f, "{} {} ({})", reason.resource_id, reason.status, reason.reason)?;
                }
                Ok(())
            }
            Error::Unavailable {
                operation,
                message,
                attempts,
            } => {
                write!(
                    f,
                    "'{operation}' unavailable after {attempts} attempt(s): {message}"
                )
            }
            Error::Timeout {
                operation,
                timeout,
                last_status,
            } => match last_status {
                Some(status) => write!(
                    f,
                    "'{operation}' timed out after {timeout:?}, last observed status {status}"
                ),
                None => write!(f, "'{operation}' timed out after {timeout:?}"),
            },
            Error::Cancelled { operation } => {
                write!(f, "'{operation}' was cancelled")
            }
            Error::Informational { message } => {
                write!(f, "diagnostic step failed: {message}")
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
        }
    }
}

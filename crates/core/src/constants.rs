/// Constants used throughout the strata codebase
// Environment variable names
pub const STRATA_LOG_VAR: &str = "STRATA_LOG";

// Polling defaults for stack lifecycle operations
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 25 * 60;

// Consecutive transient check failures tolerated before a poll surfaces
// an Unavailable error
pub const DEFAULT_MAX_TRANSIENT_FAILURES: usize = 5;

// Bounded retry applied to individual provisioning API calls
pub const DEFAULT_API_RETRY_ATTEMPTS: usize = 3;
pub const DEFAULT_API_RETRY_DELAY_MS: u64 = 500;

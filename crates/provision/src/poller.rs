//! Bounded, cancellable polling and retry/backoff
//!
//! Converts an eventually-consistent remote status into a terminal local
//! result. The wait between checks is the only intentional suspension
//! point inside a leaf task, and it races the cancellation signal.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use strata_core::{
    Error, Result, DEFAULT_MAX_TRANSIENT_FAILURES, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_POLL_TIMEOUT_SECS,
};
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

/// Delay policy between successive checks.
#[derive(Debug, Clone, Copy)]
pub enum Backoff {
    /// Every wait is the configured interval
    Fixed,
    /// Interval doubles per attempt up to the cap
    Exponential { cap: Duration },
}

/// Configuration for a polling loop.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Base delay between checks
    pub interval: Duration,
    /// Wall-clock budget for the whole loop
    pub timeout: Duration,
    pub backoff: Backoff,
    /// Consecutive transient check failures tolerated before the loop
    /// surfaces the error
    pub max_transient_failures: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            backoff: Backoff::Fixed,
            max_transient_failures: DEFAULT_MAX_TRANSIENT_FAILURES,
        }
    }
}

impl PollConfig {
    /// Delay before the check following `attempt` completed waits.
    #[must_use]
    pub fn delay_for(&self, attempt: usize) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.interval,
            Backoff::Exponential { cap } => {
                let doubled = self
                    .interval
                    .saturating_mul(2u32.saturating_pow(attempt.min(16) as u32));
                doubled.min(cap)
            }
        }
    }
}

/// Poll `check` until `is_terminal` accepts its result, the timeout
/// elapses, or the caller cancels.
///
/// The first check runs immediately. A transient error from `check` does
/// not abort the loop; it is retried up to the configured bound before
/// being surfaced. Non-transient errors abort immediately. On timeout the
/// returned error carries the last observed non-terminal status.
pub async fn poll<S, F, Fut, P>(
    operation: &str,
    config: &PollConfig,
    cancel: &CancellationToken,
    mut check: F,
    is_terminal: P,
) -> Result<S>
where
    S: fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S>>,
    P: Fn(&S) -> bool,
{
    let deadline = Instant::now() + config.timeout;
    let mut last_status: Option<String> = None;
    let mut consecutive_transient = 0usize;
    let mut attempt = 0usize;

    loop {
        if cancel.is_cancelled() {
            return Err(Error::cancelled(operation));
        }
        match check().await {
            Ok(status) if is_terminal(&status) => {
                tracing::debug!(operation, %status, "terminal status observed");
                return Ok(status);
            }
            Ok(status) => {
                tracing::debug!(operation, %status, "status not yet terminal");
                consecutive_transient = 0;
                last_status = Some(status.to_string());
            }
            Err(error) if error.is_transient() => {
                consecutive_transient += 1;
                if consecutive_transient > config.max_transient_failures {
                    tracing::warn!(
                        operation,
                        failures = consecutive_transient,
                        "transient check failures exhausted their budget"
                    );
                    return Err(error);
                }
                tracing::warn!(operation, %error, "transient check failure, retrying");
            }
            Err(error) => return Err(error),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(Error::timeout(operation, config.timeout, last_status));
        }
        let wait = config.delay_for(attempt).min(deadline - now);
        attempt += 1;
        tokio::select! {
            () = cancel.cancelled() => return Err(Error::cancelled(operation)),
            () = sleep(wait) => {}
        }
        if Instant::now() >= deadline {
            return Err(Error::timeout(operation, config.timeout, last_status));
        }
    }
}

/// Execute a provisioning API call with bounded retry on transient
/// failures, so a duplicate call after a network blip cannot double
/// provision (the API deduplicates on the request's client token).
pub async fn retry_transient<T, F, Fut>(
    operation: &str,
    attempts: usize,
    delay: Duration,
    cancel: &CancellationToken,
    mut call: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0usize;
    loop {
        if cancel.is_cancelled() {
            return Err(Error::cancelled(operation));
        }
        match call().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!(operation, attempt, "call succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) if error.is_transient() && attempt + 1 < attempts => {
                attempt += 1;
                tracing::warn!(operation, attempt, %error, "transient call failure, retrying");
                tokio::select! {
                    () = cancel.cancelled() => return Err(Error::cancelled(operation)),
                    () = sleep(delay) => {}
                }
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use strata_core::{ErrorKind, StackStatus};

    fn fast_config() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(10),
            timeout: Duration::from_secs(5),
            backoff: Backoff::Fixed,
            max_transient_failures: 2,
        }
    }

    #[tokio::test]
    async fn first_check_terminal_returns_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let status = poll(
            "describe_stack",
            &fast_config(),
            &CancellationToken::new(),
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(StackStatus::CreateComplete)
                }
            },
            |status: &StackStatus| status.is_terminal(),
        )
        .await
        .unwrap();
        assert_eq!(status, StackStatus::CreateComplete);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_shorter_than_interval_checks_at_most_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = PollConfig {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(1),
            backoff: Backoff::Fixed,
            max_transient_failures: 2,
        };
        let err = poll(
            "describe_stack",
            &config,
            &CancellationToken::new(),
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(StackStatus::CreateInProgress)
                }
            },
            |status: &StackStatus| status.is_terminal(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        match err {
            Error::Timeout { last_status, .. } => {
                assert_eq!(last_status.as_deref(), Some("CREATE_IN_PROGRESS"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_within_budget_keep_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let status = poll(
            "describe_stack",
            &fast_config(),
            &CancellationToken::new(),
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    let call = counter.fetch_add(1, Ordering::SeqCst);
                    if call < 2 {
                        Err(Error::unavailable("describe_stack", "rate exceeded", 1))
                    } else {
                        Ok(StackStatus::DeleteComplete)
                    }
                }
            },
            |status: &StackStatus| status.is_terminal(),
        )
        .await
        .unwrap();
        assert_eq!(status, StackStatus::DeleteComplete);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_beyond_budget_surface_unavailable() {
        let err = poll(
            "describe_stack",
            &fast_config(),
            &CancellationToken::new(),
            || async { Err::<StackStatus, _>(Error::unavailable("describe_stack", "rate exceeded", 1)) },
            |status: &StackStatus| status.is_terminal(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn non_transient_error_aborts_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let err = poll(
            "describe_stack",
            &fast_config(),
            &CancellationToken::new(),
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<StackStatus, _>(Error::validation("access denied"))
                }
            },
            |status: &StackStatus| status.is_terminal(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancellation_inside_the_wait_returns_promptly() {
        let cancel = CancellationToken::new();
        let handle = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                poll(
                    "describe_stack",
                    &PollConfig {
                        interval: Duration::from_secs(60),
                        timeout: Duration::from_secs(300),
                        backoff: Backoff::Fixed,
                        max_transient_failures: 2,
                    },
                    &cancel,
                    || async { Ok(StackStatus::CreateInProgress) },
                    |status: &StackStatus| status.is_terminal(),
                )
                .await
            })
        };
        cancel.cancel();
        let err = handle.await.unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn exponential_backoff_doubles_and_caps() {
        let config = PollConfig {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(600),
            backoff: Backoff::Exponential {
                cap: Duration::from_secs(30),
            },
            max_transient_failures: 2,
        };
        assert_eq!(config.delay_for(0), Duration::from_secs(2));
        assert_eq!(config.delay_for(1), Duration::from_secs(4));
        assert_eq!(config.delay_for(3), Duration::from_secs(16));
        assert_eq!(config.delay_for(10), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_transient_recovers_then_gives_up() {
        let cancel = CancellationToken::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let value = retry_transient("create_stack", 3, Duration::from_millis(10), &cancel, move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(Error::unavailable("create_stack", "rate exceeded", 1))
                } else {
                    Ok(42)
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(value, 42);

        let err = retry_transient("create_stack", 2, Duration::from_millis(10), &cancel, || async {
            Err::<(), _>(Error::unavailable("create_stack", "rate exceeded", 1))
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }
}

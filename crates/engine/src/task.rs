//! The atomic unit of orchestrated work

use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use strata_core::{Error, Result};
use tokio_util::sync::CancellationToken;

type TaskFn = Box<dyn FnOnce(CancellationToken) -> BoxFuture<'static, Result<()>> + Send>;

/// A named, describable, cancellable unit of work.
///
/// Constructed by the orchestration driver, executed exactly once by the
/// tree executor, immutable after construction. Leaf tasks wrap either a
/// stack lifecycle call or a direct API call; the tree treats both
/// uniformly.
pub struct Task {
    description: String,
    informational: bool,
    work: TaskFn,
}

impl Task {
    /// Create a task whose failure is fatal to its parent node.
    pub fn new<F, Fut>(description: impl Into<String>, work: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            description: description.into(),
            informational: false,
            work: Box::new(move |cancel| work(cancel).boxed()),
        }
    }

    /// Create a best-effort diagnostic task. Its failure is reported but
    /// never changes the parent node's verdict.
    pub fn informational<F, Fut>(description: impl Into<String>, work: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            informational: true,
            ..Self::new(description, work)
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn is_informational(&self) -> bool {
        self.informational
    }

    /// Run the unit of work. Checks the cancellation signal before
    /// starting; tasks with internal wait loops are expected to check it
    /// again at their own safe points.
    pub(crate) async fn run(self, cancel: CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(Error::cancelled(self.description));
        }
        (self.work)(cancel).await
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("description", &self.description)
            .field("informational", &self.informational)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let task = Task::new("never runs", |_| async { Ok(()) });
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = task.run(cancel).await.unwrap_err();
        assert_eq!(err.kind(), strata_core::ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn work_receives_the_token() {
        let task = Task::new("observes token", |cancel: CancellationToken| async move {
            assert!(!cancel.is_cancelled());
            Ok(())
        });
        task.run(CancellationToken::new()).await.unwrap();
    }
}

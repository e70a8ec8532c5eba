//! Tree executor: walks a task tree, honouring the sequential/parallel
//! marker at every level, and aggregates every error encountered.

use crate::result::{TaskFailure, TaskResult};
use crate::task::Task;
use crate::tree::{TaskNode, TaskTree};
use futures::future::BoxFuture;
use futures::FutureExt;
use strata_core::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Execute a task tree to completion.
///
/// The cancellation token threads through the whole invocation; tasks
/// check it at safe points and return promptly once it fires. Cancellation
/// never rolls back leaves that already completed; cleanup after
/// cancellation is the caller's responsibility.
pub async fn execute(tree: TaskTree, cancel: CancellationToken) -> TaskResult {
    tracing::info!(tasks = tree.len(), "starting task tree execution");
    let result = run_tree(tree, cancel).await;
    match &result {
        TaskResult::Success => tracing::info!("task tree completed successfully"),
        TaskResult::Failure(failure) => {
            tracing::warn!(
                causes = failure.leaf_count(),
                kind = %failure.kind(),
                "task tree failed"
            );
        }
    }
    result
}

fn run_node(node: TaskNode, cancel: CancellationToken) -> BoxFuture<'static, TaskResult> {
    match node {
        TaskNode::Leaf(task) => run_leaf(task, cancel).boxed(),
        TaskNode::Tree(tree) => run_tree(tree, cancel).boxed(),
    }
}

async fn run_tree(tree: TaskTree, cancel: CancellationToken) -> TaskResult {
    // An empty node is a no-op success
    if tree.is_empty() {
        return TaskResult::Success;
    }
    if tree.is_parallel() {
        run_parallel(tree, cancel).await
    } else {
        run_sequential(tree, cancel).await
    }
}

/// Children run in order; the first fatal failure skips the remaining
/// siblings and propagates unchanged to the parent.
async fn run_sequential(tree: TaskTree, cancel: CancellationToken) -> TaskResult {
    for child in tree.children {
        if let TaskResult::Failure(failure) = run_node(child, cancel.clone()).await {
            return TaskResult::Failure(failure);
        }
    }
    TaskResult::Success
}

/// All children start concurrently and the node joins every one of them
/// before completing; individual failures never cancel still-running
/// siblings. The node's failure carries the full list of child failures,
/// ordered by child position.
async fn run_parallel(tree: TaskTree, cancel: CancellationToken) -> TaskResult {
    let headline = tree.headline();
    let mut join_set = JoinSet::new();
    for (index, child) in tree.children.into_iter().enumerate() {
        let cancel = cancel.clone();
        join_set.spawn(async move { (index, run_node(child, cancel).await) });
    }

    let mut failures: Vec<(usize, TaskFailure)> = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((_, TaskResult::Success)) => {}
            Ok((index, TaskResult::Failure(failure))) => failures.push((index, failure)),
            Err(join_error) => {
                tracing::error!(%join_error, "parallel child aborted abnormally");
                let error = if join_error.is_cancelled() {
                    Error::cancelled("parallel child")
                } else {
                    Error::validation(format!("task panicked: {join_error}"))
                };
                failures.push((usize::MAX, TaskFailure::leaf("parallel child", error)));
            }
        }
    }

    if failures.is_empty() {
        return TaskResult::Success;
    }
    failures.sort_by_key(|(index, _)| *index);
    let failures = failures.into_iter().map(|(_, failure)| failure).collect();
    TaskResult::Failure(TaskFailure::node(headline, failures))
}

async fn run_leaf(task: Task, cancel: CancellationToken) -> TaskResult {
    let description = task.description().to_owned();
    let informational = task.is_informational();
    let span = tracing::info_span!("task", task = %description);
    match task.run(cancel).instrument(span).await {
        Ok(()) => {
            tracing::debug!(task = %description, "task completed");
            TaskResult::Success
        }
        Err(error) if informational => {
            // Reported, but never flips the parent's verdict
            tracing::warn!(task = %description, %error, "best-effort task failed, continuing");
            TaskResult::Success
        }
        Err(error) => {
            tracing::warn!(task = %description, %error, "task failed");
            TaskResult::Failure(TaskFailure::leaf(description, error))
        }
    }
}

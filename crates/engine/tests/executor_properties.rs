//! Property tests over randomly shaped task trees

use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use strata_core::Error;
use strata_engine::{execute, Task, TaskNode, TaskTree};
use tokio_util::sync::CancellationToken;

/// Abstract tree shape: leaves know whether they fail.
#[derive(Debug, Clone)]
enum Shape {
    Leaf { fails: bool },
    Tree { parallel: bool, children: Vec<Shape> },
}

impl Shape {
    fn leaf_count(&self) -> usize {
        match self {
            Shape::Leaf { .. } => 1,
            Shape::Tree { children, .. } => children.iter().map(Shape::leaf_count).sum(),
        }
    }
}

fn succeeding_shapes() -> impl Strategy<Value = Shape> {
    let leaf = Just(Shape::Leaf { fails: false });
    leaf.prop_recursive(4, 48, 6, |inner| {
        (any::<bool>(), prop::collection::vec(inner, 0..6))
            .prop_map(|(parallel, children)| Shape::Tree { parallel, children })
    })
}

fn build(shape: Shape, ran: &Arc<AtomicUsize>) -> TaskNode {
    match shape {
        Shape::Leaf { fails } => {
            let ran = Arc::clone(ran);
            TaskNode::from(Task::new("leaf", move |_| async move {
                ran.fetch_add(1, Ordering::SeqCst);
                if fails {
                    Err(Error::validation("synthetic failure"))
                } else {
                    Ok(())
                }
            }))
        }
        Shape::Tree { parallel, children } => {
            let mut tree = if parallel {
                TaskTree::parallel()
            } else {
                TaskTree::sequential()
            };
            for child in children {
                tree.append(build(child, ran));
            }
            TaskNode::from(tree)
        }
    }
}

fn run(tree: TaskTree) -> strata_engine::TaskResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    runtime.block_on(execute(tree, CancellationToken::new()))
}

proptest! {
    /// A tree with no failing leaves succeeds regardless of nesting depth
    /// or parallel/sequential mix, and every leaf runs exactly once.
    #[test]
    fn all_success_trees_succeed(shape in succeeding_shapes()) {
        let leaves = shape.leaf_count();
        let ran = Arc::new(AtomicUsize::new(0));
        let tree = match build(shape, &ran) {
            TaskNode::Tree(tree) => tree,
            TaskNode::Leaf(task) => TaskTree::sequential().with(task),
        };

        let result = run(tree);
        prop_assert!(result.is_success());
        prop_assert_eq!(ran.load(Ordering::SeqCst), leaves);
    }

    /// A parallel node with k failing children out of n still invokes all
    /// n, and its failure carries exactly k entries.
    #[test]
    fn parallel_nodes_aggregate_every_failure(outcomes in prop::collection::vec(any::<bool>(), 1..12)) {
        let ran = Arc::new(AtomicUsize::new(0));
        let mut tree = TaskTree::parallel();
        for fails in &outcomes {
            tree.append(build(Shape::Leaf { fails: *fails }, &ran));
        }

        let expected_failures = outcomes.iter().filter(|fails| **fails).count();
        let result = run(tree);

        prop_assert_eq!(ran.load(Ordering::SeqCst), outcomes.len());
        if expected_failures == 0 {
            prop_assert!(result.is_success());
        } else {
            let failure = result.failure().expect("failure expected");
            prop_assert_eq!(failure.nested().len(), expected_failures);
        }
    }
}

//! Composite task trees with explicit sequential/parallel policy

use crate::task::Task;

/// A node is either an atomic task or a nested tree; the two are
/// polymorphic over the same run capability, so trees nest to arbitrary
/// depth.
#[derive(Debug)]
pub enum TaskNode {
    Leaf(Task),
    Tree(TaskTree),
}

impl TaskNode {
    /// Check if this node is a leaf task
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, TaskNode::Leaf(_))
    }

    /// One-line description of this node, used in plan and failure output.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            TaskNode::Leaf(task) => task.description().to_owned(),
            TaskNode::Tree(tree) => tree.headline(),
        }
    }

    fn describe_into(&self, depth: usize, out: &mut String) {
        let indent = "    ".repeat(depth);
        match self {
            TaskNode::Leaf(task) => {
                out.push_str(&indent);
                out.push_str(task.description());
                if task.is_informational() {
                    out.push_str(" (best-effort)");
                }
                out.push('\n');
            }
            TaskNode::Tree(tree) => {
                out.push_str(&indent);
                out.push_str(&tree.headline());
                out.push('\n');
                for child in &tree.children {
                    child.describe_into(depth + 1, out);
                }
            }
        }
    }
}

impl From<Task> for TaskNode {
    fn from(task: Task) -> Self {
        TaskNode::Leaf(task)
    }
}

impl From<TaskTree> for TaskNode {
    fn from(tree: TaskTree) -> Self {
        TaskNode::Tree(tree)
    }
}

/// An ordered sequence of child nodes executed sequentially or in
/// parallel.
///
/// Built bottom-up, never mutated once handed to the executor. A tree
/// with zero children is a no-op success.
#[derive(Debug, Default)]
pub struct TaskTree {
    pub(crate) children: Vec<TaskNode>,
    pub(crate) parallel: bool,
}

impl TaskTree {
    /// Children run strictly in order; the node stops at the first child
    /// that returns a fatal error.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            children: Vec::new(),
            parallel: false,
        }
    }

    /// Children run concurrently; the node completes only when all of
    /// them finish, and its failure aggregates every child failure.
    #[must_use]
    pub fn parallel() -> Self {
        Self {
            children: Vec::new(),
            parallel: true,
        }
    }

    pub fn append(&mut self, node: impl Into<TaskNode>) {
        self.children.push(node.into());
    }

    /// Builder-style [`append`](Self::append).
    #[must_use]
    pub fn with(mut self, node: impl Into<TaskNode>) -> Self {
        self.append(node);
        self
    }

    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Render the tree as an indented plan, one line per node, without
    /// executing anything. Used for dry-run output.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.headline());
        out.push('\n');
        for child in &self.children {
            child.describe_into(1, &mut out);
        }
        out
    }

    pub(crate) fn headline(&self) -> String {
        let mode = if self.parallel {
            "parallel"
        } else {
            "sequential"
        };
        format!("{} {} sub-task(s)", self.children.len(), mode)
    }
}

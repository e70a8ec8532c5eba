//! Failure rendering for interactive consumers
//!
//! One line per failing node, indented by nesting, derived directly from
//! the recursive task result. Even a run where dozens of parallel
//! operations failed stays readable.

use strata_engine::TaskFailure;

#[must_use]
pub fn render(failure: &TaskFailure) -> String {
    let mut out = String::new();
    render_into(failure, 0, &mut out);
    out
}

fn render_into(failure: &TaskFailure, depth: usize, out: &mut String) {
    let indent = "    ".repeat(depth);
    match failure.error() {
        Some(error) => {
            out.push_str(&format!(
                "{indent}{} [{}]: {error}\n",
                failure.description(),
                failure.kind()
            ));
        }
        None => {
            out.push_str(&format!(
                "{indent}{} [{}]\n",
                failure.description(),
                failure.kind()
            ));
            for nested in failure.nested() {
                render_into(nested, depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Error;

    #[test]
    fn nested_failures_render_one_line_per_cause() {
        let failure = TaskFailure::node(
            "2 parallel sub-task(s)",
            vec![
                TaskFailure::leaf(
                    "create stack \"a\"",
                    Error::remote("a".into(), strata_core::StackStatus::CreateFailed, vec![]),
                ),
                TaskFailure::leaf("delete role binding \"b\"", Error::cancelled("delete")),
            ],
        );

        let rendered = render(&failure);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("2 parallel sub-task(s)"));
        assert!(lines[1].starts_with("    create stack \"a\" [RemoteFailed]"));
        assert!(lines[2].starts_with("    delete role binding \"b\" [Cancelled]"));
    }
}

//! Mock Solver for tests and examples.
//!
//! Returns scripted results per call, so whole plan-execute-replan runs can
//! be driven without an LLM. A failing mode exercises the Executor's
//! absorb-into-record path.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::solver::Solver;

/// Mock Solver: one scripted result per solve() call, sticking on the last.
///
/// **Interaction**: Implements `Solver`; used by the Executor in tests and
/// the mock examples.
pub struct MockSolver {
    results: Vec<String>,
    call_count: AtomicUsize,
    error: Option<String>,
}

impl MockSolver {
    /// Creates a mock returning the same result for every call.
    pub fn with_result(result: impl Into<String>) -> Self {
        Self {
            results: vec![result.into()],
            call_count: AtomicUsize::new(0),
            error: None,
        }
    }

    /// Creates a mock returning `results[n]` for call n, sticking on the last.
    pub fn with_results(results: Vec<impl Into<String>>) -> Self {
        Self {
            results: results.into_iter().map(Into::into).collect(),
            call_count: AtomicUsize::new(0),
            error: None,
        }
    }

    /// Creates a mock whose every solve() fails with `ExecutionFailed(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            results: vec![],
            call_count: AtomicUsize::new(0),
            error: Some(message.into()),
        }
    }
}

#[async_trait]
impl Solver for MockSolver {
    async fn solve(&self, _task: &str) -> Result<String, AgentError> {
        if let Some(message) = &self.error {
            return Err(AgentError::ExecutionFailed(message.clone()));
        }
        let n = self.call_count.fetch_add(1, Ordering::SeqCst);
        let idx = n.min(self.results.len().saturating_sub(1));
        Ok(self.results.get(idx).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: with_results returns entries in order and sticks on the last.
    #[tokio::test]
    async fn mock_solver_with_results_in_order_then_sticks() {
        let solver = MockSolver::with_results(vec!["one", "two"]);
        assert_eq!(solver.solve("t").await.unwrap(), "one");
        assert_eq!(solver.solve("t").await.unwrap(), "two");
        assert_eq!(solver.solve("t").await.unwrap(), "two");
    }

    /// **Scenario**: failing() returns ExecutionFailed with the configured message.
    #[tokio::test]
    async fn mock_solver_failing_returns_execution_failed() {
        let solver = MockSolver::failing("tool backend down");
        let err = solver.solve("t").await.unwrap_err();
        assert!(err.to_string().contains("tool backend down"));
    }
}

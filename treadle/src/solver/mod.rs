//! Solver abstraction: the tool-augmented reasoning capability behind the Executor.
//!
//! The Executor depends on `Solver` instead of a concrete reasoning loop;
//! implementations include `ReactSolver` (LLM + websearch) and `MockSolver`
//! (scripted results for tests).

mod mock;
mod react;

pub use mock::MockSolver;
pub use react::{ReactSolver, MAX_SOLVER_TURNS, SOLVER_SYSTEM_PROMPT};

use async_trait::async_trait;

use crate::error::AgentError;

/// Reasoning capability: one task text in, one final answer text out.
///
/// The task may carry embedded context (temporal preamble, a delimited
/// artifact block); the solver treats it as opaque input. How the answer is
/// produced (tool calls, number of reasoning turns) is the implementation's
/// concern.
///
/// **Interaction**: Used by `Executor::execute`; failures are absorbed there
/// into execution records rather than aborting the run.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Solve one task: return the final textual result.
    async fn solve(&self, task: &str) -> Result<String, AgentError>;
}

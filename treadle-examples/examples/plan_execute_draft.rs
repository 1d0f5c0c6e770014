//! Example: document objective with mocks, showing the draft artifact.
//!
//! Cycle 1 writes the initial draft, cycle 2 revises it; each revision
//! replaces the draft wholesale, so the final artifact is exactly the last
//! step's output. Prints the history and the final draft.
//!
//! Run: `cargo run -p treadle-examples --example plan_execute_draft -- "Write a short welcome note for new contributors"`

use std::sync::Arc;

use treadle::{MockLlm, MockSolver, PlanExecuteRunner, RunnerOptions};

const FIRST_DRAFT: &str = "Welcome to the project! Start with the issues labeled good-first-issue.";
const REVISED_DRAFT: &str = "Welcome to the project! Start with the issues labeled \
good-first-issue, and say hello in the discussion board so we know you're around.";

#[tokio::main]
async fn main() {
    let objective = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Write a short welcome note for new contributors".to_string());

    let runner = PlanExecuteRunner::new(RunnerOptions {
        planner_llm: Some(Arc::new(MockLlm::with_no_tool_calls(
            r#"{"steps": ["Write a first draft of the welcome note", "Review the draft and make it warmer"]}"#,
        ))),
        replanner_llm: Some(Arc::new(MockLlm::with_sequence(vec![
            r#"{"action": "continue", "plan": ["Review the draft and make it warmer"]}"#.to_string(),
            format!(r#"{{"action": "finish", "response": "{}"}}"#, REVISED_DRAFT),
        ]))),
        solver: Some(Arc::new(MockSolver::with_results(vec![
            FIRST_DRAFT,
            REVISED_DRAFT,
        ]))),
        ..Default::default()
    });

    let state = runner.invoke(&objective).await.expect("invoke");

    for (i, record) in state.history.iter().enumerate() {
        println!("step {}: {}", i + 1, record.task);
        println!("  -> {}", record.result);
    }
    println!();
    println!("final draft:\n{}", state.artifact.as_deref().unwrap_or("(none)"));
}

//! Example: full plan → execute → replan run with scripted mocks (no network).
//!
//! The planner emits a two-step plan, the solver returns one scripted result
//! per step, and the replanner first trims the plan to the remaining step,
//! then finishes. Prints the execution history and the final response.
//!
//! Run: `cargo run -p treadle-examples --example plan_execute_mock -- "Compare the boiling points of water and ethanol"`

use std::sync::Arc;

use treadle::{MockLlm, MockSolver, PlanExecuteRunner, RunnerOptions};

#[tokio::main]
async fn main() {
    let objective = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Compare the boiling points of water and ethanol".to_string());

    let runner = PlanExecuteRunner::new(RunnerOptions {
        planner_llm: Some(Arc::new(MockLlm::with_no_tool_calls(
            r#"{"steps": ["Look up the boiling point of water", "Look up the boiling point of ethanol and compare"]}"#,
        ))),
        replanner_llm: Some(Arc::new(MockLlm::with_sequence(vec![
            r#"{"action": "continue", "plan": ["Look up the boiling point of ethanol and compare"]}"#,
            r#"{"action": "finish", "response": "Water boils at 100 °C and ethanol at 78.4 °C, so ethanol boils about 22 °C lower."}"#,
        ]))),
        solver: Some(Arc::new(MockSolver::with_results(vec![
            "Water boils at 100 °C at standard pressure.",
            "Ethanol boils at 78.4 °C, about 22 °C below water.",
        ]))),
        ..Default::default()
    });

    let state = runner.invoke(&objective).await.expect("invoke");

    println!("objective: {}", state.objective);
    for (i, record) in state.history.iter().enumerate() {
        println!("step {}: {}", i + 1, record.task);
        println!("  -> {}", record.result);
    }
    println!();
    println!(
        "response: {}",
        state.final_response().unwrap_or("(no response)")
    );
}

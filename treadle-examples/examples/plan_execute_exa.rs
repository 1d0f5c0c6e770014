//! Example: real plan → execute → replan run over OpenAI + Exa web search.
//!
//! Builds the runner from environment variables and drives one objective end
//! to end. Without `EXA_API_KEY` the solver runs without the websearch tool
//! and answers from model knowledge only.
//!
//! ## Usage
//!
//! ```bash
//! export OPENAI_API_KEY="sk-xxx"
//! export EXA_API_KEY="exa-xxx"
//! cargo run -p treadle-examples --example plan_execute_exa -- "What is the latest stable Rust release?"
//! ```
//!
//! ## Environment
//!
//! - `OPENAI_API_KEY`: **Required**. OpenAI-compatible API key (do NOT commit).
//! - `OPENAI_BASE_URL`: Optional. OpenAI-compatible endpoint override.
//! - `MODEL`: Optional. Default `gpt-4o-mini`.
//! - `EXA_API_KEY`: Optional. Enables the websearch tool for the solver.
//! - `MAX_CYCLES`: Optional. Execute-replan cycle cap, default 12.
//!
//! Use `.env` in the workspace root (gitignored) or export before running.

use treadle::PlanExecuteRunner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let objective = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What is the latest stable Rust release?".to_string());

    let runner = PlanExecuteRunner::from_env().await.map_err(|e| {
        format!("{}. Set keys via environment or .env in the workspace root.", e)
    })?;

    let state = runner.invoke(&objective).await?;

    for (i, record) in state.history.iter().enumerate() {
        println!("step {}: {}", i + 1, record.task);
        println!("  -> {}", record.result);
    }
    println!();
    match state.final_response() {
        Some(response) => println!("response: {}", response),
        None => println!("(run ended without a final response)"),
    }
    Ok(())
}

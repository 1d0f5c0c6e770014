//! ReAct solver: think → act loop over an LlmClient and a ToolSource.
//!
//! Each turn invokes the LLM with the conversation so far; tool calls are
//! executed and their results appended as User messages for the next turn.
//! The loop ends when the model answers without tool calls or the turn cap
//! is reached.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::agent::truncate_for_log;
use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::solver::Solver;
use crate::tool_source::ToolSource;

/// Maximum number of reasoning turns before forcing a final answer.
pub const MAX_SOLVER_TURNS: u32 = 10;

/// Default system prompt for the solver.
pub const SOLVER_SYSTEM_PROMPT: &str = r#"You are a helpful assistant. Execute the current step of the plan.

Rules:
- Use the websearch tool when the step needs current or external information; otherwise answer from your own knowledge.
- After reading tool results, either search again with a refined query or produce the final answer for this step.
- Your last message must be the complete textual result of the step, not a description of what you did.
"#;

/// Parses ToolCall.arguments string to JSON Value. Logs a warning on parse failure.
fn parse_tool_arguments(arguments: &str) -> Value {
    let raw = if arguments.trim().is_empty() {
        serde_json::json!({})
    } else {
        match serde_json::from_str(arguments) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, arguments = %arguments, "tool arguments JSON parse failed, using empty object");
                serde_json::json!({})
            }
        }
    };
    if let Some(s) = raw.as_str() {
        serde_json::from_str(s).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "nested tool arguments JSON parse failed");
            raw
        })
    } else {
        raw
    }
}

/// ReAct solver: LLM reasoning with tool execution between turns.
///
/// Tool call failures do not abort the task; the error text is fed back into
/// the conversation so the model can retry, rephrase, or report the failure
/// in its final answer. Only LLM transport failures surface as errors.
///
/// **Interaction**: Implements `Solver`; built from the same `ToolSource`
/// that was used to declare tools on the `LlmClient`.
pub struct ReactSolver {
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
}

impl ReactSolver {
    /// Creates a solver over the given LLM and tool source.
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<dyn ToolSource>) -> Self {
        Self { llm, tools }
    }
}

#[async_trait]
impl Solver for ReactSolver {
    async fn solve(&self, task: &str) -> Result<String, AgentError> {
        debug!(
            task_preview = %truncate_for_log(task, 200),
            "solver start"
        );
        let mut messages = vec![
            Message::system(SOLVER_SYSTEM_PROMPT),
            Message::user(task.to_string()),
        ];
        let mut last_content = String::new();

        for turn in 0..MAX_SOLVER_TURNS {
            let response = self.llm.invoke(&messages).await?;
            if !response.content.is_empty() {
                messages.push(Message::assistant(response.content.clone()));
                last_content = response.content;
            }
            if response.tool_calls.is_empty() {
                break;
            }

            for tc in &response.tool_calls {
                let args = parse_tool_arguments(&tc.arguments);
                debug!(turn = turn, tool = %tc.name, args = ?args, "Calling tool");
                match self.tools.call_tool(&tc.name, args).await {
                    Ok(content) => {
                        trace!(
                            tool = %tc.name,
                            result_len = content.text.len(),
                            result_preview = %truncate_for_log(&content.text, 200),
                            "Tool returned"
                        );
                        messages.push(Message::User(format!(
                            "Tool {} returned: {}",
                            tc.name, content.text
                        )));
                    }
                    Err(e) => {
                        warn!(tool = %tc.name, error = %e, "Tool call failed");
                        messages.push(Message::User(format!("Tool {} failed: {}", tc.name, e)));
                    }
                }
            }
        }

        if last_content.is_empty() {
            last_content =
                "No text response from the model. Please try again or check the API.".to_string();
        }
        trace!(result_preview = %truncate_for_log(&last_content, 200), "solver done");
        Ok(last_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::tool_source::MockToolSource;

    /// **Scenario**: direct answer without tool calls returns the model's content after one turn.
    #[tokio::test]
    async fn react_solver_direct_answer_returns_content() {
        let solver = ReactSolver::new(
            Arc::new(MockLlm::with_no_tool_calls("Paris")),
            Arc::new(MockToolSource::web_search_example()),
        );
        let result = solver.solve("What is the capital of France?").await.unwrap();
        assert_eq!(result, "Paris");
    }

    /// **Scenario**: one search round (tools then end) returns the second-turn content.
    #[tokio::test]
    async fn react_solver_tool_round_then_answer() {
        let solver = ReactSolver::new(
            Arc::new(MockLlm::first_tools_then_end()),
            Arc::new(MockToolSource::web_search_example()),
        );
        let result = solver.solve("Find recent news").await.unwrap();
        assert_eq!(result, "The search results are above.");
    }

    /// **Scenario**: a failing tool does not abort; the loop continues and the
    /// model's next answer is returned.
    #[tokio::test]
    async fn react_solver_tool_failure_is_fed_back_not_fatal() {
        let solver = ReactSolver::new(
            Arc::new(MockLlm::first_tools_then_end()),
            Arc::new(MockToolSource::failing("backend down")),
        );
        let result = solver.solve("Find recent news").await.unwrap();
        assert_eq!(result, "The search results are above.");
    }

    /// **Scenario**: an LLM failure propagates as AgentError.
    #[tokio::test]
    async fn react_solver_llm_failure_propagates() {
        let solver = ReactSolver::new(
            Arc::new(MockLlm::failing("provider down")),
            Arc::new(MockToolSource::web_search_example()),
        );
        let err = solver.solve("anything").await.unwrap_err();
        assert!(err.to_string().contains("provider down"));
    }

    /// **Scenario**: empty model output with no tool calls yields the fallback text.
    #[tokio::test]
    async fn react_solver_empty_output_yields_fallback() {
        let solver = ReactSolver::new(
            Arc::new(MockLlm::with_no_tool_calls("")),
            Arc::new(MockToolSource::web_search_example()),
        );
        let result = solver.solve("anything").await.unwrap();
        assert!(
            result.contains("No text response"),
            "expected fallback text: {}",
            result
        );
    }

    /// **Scenario**: parse_tool_arguments falls back to an empty object on bad JSON
    /// and unwraps nested JSON strings.
    #[test]
    fn parse_tool_arguments_handles_empty_bad_and_nested() {
        assert_eq!(parse_tool_arguments(""), serde_json::json!({}));
        assert_eq!(parse_tool_arguments("not json"), serde_json::json!({}));
        assert_eq!(
            parse_tool_arguments(r#"{"query":"x"}"#),
            serde_json::json!({"query":"x"})
        );
        assert_eq!(
            parse_tool_arguments(r#""{\"query\":\"x\"}""#),
            serde_json::json!({"query":"x"})
        );
    }
}

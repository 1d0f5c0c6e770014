//! Planner stage: LLM turns the objective into the initial step list.

use std::sync::Arc;

use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::temporal::TemporalContext;

use super::prompt::PLANNER_SYSTEM;
use super::state::PlannerOutput;
use super::{extract_json, strip_code_fence, truncate_for_log};

/// Planner stage: one LLM call per run, producing the initial plan.
///
/// **Interaction**: `PlanExecuteRunner` calls [`Planner::plan`] exactly once,
/// before the first execution cycle. After that the plan belongs to the
/// Replanner.
pub struct Planner {
    llm: Arc<dyn LlmClient>,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Produces the initial plan for the objective.
    ///
    /// Fails on an empty objective. Unparseable LLM output degrades to an
    /// empty plan, which the runner's safety check turns into a terminal
    /// diagnostic.
    pub async fn plan(
        &self,
        objective: &str,
        temporal: &TemporalContext,
    ) -> Result<PlannerOutput, AgentError> {
        if objective.trim().is_empty() {
            return Err(AgentError::ExecutionFailed(
                "objective must not be empty".to_string(),
            ));
        }

        let messages = vec![
            Message::system(PLANNER_SYSTEM),
            Message::user(format!(
                "{}\n\nObjective: {}",
                temporal.prompt_preamble(),
                objective
            )),
        ];
        let response = self.llm.invoke(&messages).await?;
        let steps = parse_steps(response.content.trim());
        tracing::debug!(step_count = steps.len(), "planner produced initial plan");
        Ok(PlannerOutput { steps })
    }
}

/// Parses the planner reply into a step list. Accepts a bare JSON object,
/// optionally wrapped in a markdown code fence or surrounding prose.
/// Malformed output or a missing `steps` array yields an empty plan; blank
/// steps are dropped.
fn parse_steps(raw: &str) -> Vec<String> {
    #[derive(serde::Deserialize)]
    struct RawPlan {
        steps: Option<Vec<String>>,
    }

    if let Ok(parsed) = serde_json::from_str::<RawPlan>(extract_json(strip_code_fence(raw))) {
        if let Some(steps) = parsed.steps {
            return steps
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }
    tracing::warn!(
        raw = %truncate_for_log(raw, 200),
        "planner output is not a step list, treating as empty plan"
    );
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;

    fn fixed_clock() -> TemporalContext {
        TemporalContext::fixed("2025-03-14", "09:26:53", "2025")
    }

    /// **Scenario**: well-formed planner JSON becomes the initial plan, in order.
    #[tokio::test]
    async fn plan_parses_step_list() {
        let llm = Arc::new(MockLlm::with_no_tool_calls(
            r#"{"steps": ["find the 2024 Australian Open winner", "answer with the name"]}"#,
        ));
        let planner = Planner::new(llm);
        let out = planner
            .plan("who won the 2024 Australian Open?", &fixed_clock())
            .await
            .unwrap();
        assert_eq!(
            out.steps,
            vec!["find the 2024 Australian Open winner", "answer with the name"]
        );
    }

    /// **Scenario**: a code-fenced reply still parses.
    #[tokio::test]
    async fn plan_strips_markdown_fence() {
        let llm = Arc::new(MockLlm::with_no_tool_calls(
            "```json\n{\"steps\": [\"compute 2+2\"]}\n```",
        ));
        let planner = Planner::new(llm);
        let out = planner.plan("What is 2+2?", &fixed_clock()).await.unwrap();
        assert_eq!(out.steps, vec!["compute 2+2"]);
    }

    /// **Scenario**: a reply that wraps the JSON in prose still parses.
    #[tokio::test]
    async fn plan_extracts_json_from_prose() {
        let llm = Arc::new(MockLlm::with_no_tool_calls(
            "Here is your plan:\n\n{\"steps\": [\"find the boiling point of water\"]}\n\nGood luck!",
        ));
        let planner = Planner::new(llm);
        let out = planner
            .plan("what is the boiling point of water?", &fixed_clock())
            .await
            .unwrap();
        assert_eq!(out.steps, vec!["find the boiling point of water"]);
    }

    /// **Scenario**: prose instead of JSON degrades to an empty plan rather than an error.
    #[tokio::test]
    async fn malformed_output_yields_empty_plan() {
        let llm = Arc::new(MockLlm::with_no_tool_calls(
            "Sure! Here is my plan: first I will...",
        ));
        let planner = Planner::new(llm);
        let out = planner.plan("objective", &fixed_clock()).await.unwrap();
        assert!(out.steps.is_empty());
    }

    /// **Scenario**: blank and whitespace-only steps are dropped.
    #[tokio::test]
    async fn blank_steps_are_filtered() {
        let llm = Arc::new(MockLlm::with_no_tool_calls(
            r#"{"steps": ["  ", "real task", ""]}"#,
        ));
        let planner = Planner::new(llm);
        let out = planner.plan("objective", &fixed_clock()).await.unwrap();
        assert_eq!(out.steps, vec!["real task"]);
    }

    /// **Scenario**: an empty objective is rejected before any LLM call.
    #[tokio::test]
    async fn empty_objective_is_rejected() {
        let llm = Arc::new(MockLlm::with_no_tool_calls(r#"{"steps": ["x"]}"#));
        let planner = Planner::new(llm);
        let err = planner.plan("   ", &fixed_clock()).await.unwrap_err();
        assert!(err.to_string().contains("objective"));
    }

    /// **Scenario**: an LLM failure propagates as a stage error.
    #[tokio::test]
    async fn llm_error_propagates() {
        let llm = Arc::new(MockLlm::failing("connection refused"));
        let planner = Planner::new(llm);
        let err = planner.plan("objective", &fixed_clock()).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}

//! Replanner stage: revise the remaining plan or finish the run.
//!
//! Sole writer of the plan after the first cycle. Classifies the LLM reply
//! into a [`Decision`] and enforces the anti-stagnation rule: a failed task
//! is never re-issued byte-identical.

use std::sync::Arc;

use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::temporal::TemporalContext;

use super::prompt::REPLANNER_SYSTEM;
use super::state::{Decision, ExecutionRecord, PlanExecuteState};
use super::{extract_json, strip_code_fence, truncate_for_log};

/// Textual markers that flag an execution result as a failure.
///
/// Matched case-insensitively as substrings. Deliberately loose: a false
/// positive only forbids repeating one task verbatim, a false negative lets
/// the model retry a task it believes can still work.
const FAILURE_MARKERS: &[&str] = &[
    "error",
    "failed",
    "unable",
    "cannot",
    "can't",
    "timed out",
    "no result",
];

/// Replanner stage error.
#[derive(Debug, thiserror::Error)]
pub enum ReplanError {
    /// LLM reply matched neither decision variant. Carries the raw reply for
    /// the terminal diagnostic.
    #[error("replanner decision could not be classified: {raw}")]
    Unclassified { raw: String },
    /// The LLM call itself failed.
    #[error("execution failed: {0}")]
    Agent(#[from] AgentError),
}

/// Replanner stage: one LLM call per cycle, after each execution.
///
/// **Interaction**: `PlanExecuteRunner` calls [`Replanner::replan`] with the
/// merged state; the returned decision is folded in with
/// `PlanExecuteState::apply_decision`, or (for `Unclassified`) turned into a
/// terminal diagnostic.
pub struct Replanner {
    llm: Arc<dyn LlmClient>,
}

impl Replanner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Decides what happens after an execution: continue with a revised plan
    /// or finish with the final response.
    ///
    /// The full state is rendered into the prompt: objective, previous plan,
    /// execution feedback, and the current draft. A `Continue` decision is
    /// post-processed by the anti-stagnation rule before it is returned.
    pub async fn replan(
        &self,
        state: &PlanExecuteState,
        temporal: &TemporalContext,
    ) -> Result<Decision, ReplanError> {
        let messages = vec![
            Message::system(REPLANNER_SYSTEM),
            Message::user(build_replan_prompt(state, temporal)),
        ];
        let response = self.llm.invoke(&messages).await?;
        let raw = response.content.trim();

        let decision = match parse_decision(raw) {
            Some(decision) => decision,
            None => {
                return Err(ReplanError::Unclassified {
                    raw: truncate_for_log(raw, 200),
                })
            }
        };

        Ok(match decision {
            Decision::Continue(plan) => {
                let plan = strip_repeated_failed_task(plan, state.history.last());
                tracing::debug!(step_count = plan.len(), "replanner continues");
                Decision::Continue(plan)
            }
            Decision::Finish(response) => {
                tracing::debug!(
                    response = %truncate_for_log(&response, 120),
                    "replanner finishes"
                );
                Decision::Finish(response)
            }
        })
    }
}

/// Renders the replan prompt: temporal preamble, objective, previous plan,
/// execution feedback, and the current draft.
fn build_replan_prompt(state: &PlanExecuteState, temporal: &TemporalContext) -> String {
    format!(
        "{}\n\nObjective: {}\n\nPrevious plan:\n{}\n\nFeedback from execution:\n{}\n\nCurrent draft:\n{}",
        temporal.prompt_preamble(),
        state.objective,
        format_plan(&state.plan),
        format_history(&state.history),
        state.artifact.as_deref().unwrap_or("(no draft yet)"),
    )
}

fn format_plan(plan: &[String]) -> String {
    if plan.is_empty() {
        return "(empty)".to_string();
    }
    plan.iter()
        .enumerate()
        .map(|(i, task)| format!("{}. {}", i + 1, task))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_history(history: &[ExecutionRecord]) -> String {
    if history.is_empty() {
        return "(none)".to_string();
    }
    history
        .iter()
        .enumerate()
        .map(|(i, record)| {
            format!("{}. task: {}\n   result: {}", i + 1, record.task, record.result)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Classifies the LLM reply into a [`Decision`].
///
/// Accepts the action-tagged schema, optionally inside a code fence or
/// surrounding prose, and, as a fallback, a bare `{"plan"}` or `{"response"}`
/// object (a non-blank response wins when both are present). Returns `None`
/// when the reply matches neither variant: unparseable JSON, an unknown
/// action tag, or `finish` without a response.
fn parse_decision(raw: &str) -> Option<Decision> {
    #[derive(serde::Deserialize)]
    struct RawDecision {
        action: Option<String>,
        plan: Option<Vec<String>>,
        response: Option<String>,
    }

    let parsed = serde_json::from_str::<RawDecision>(extract_json(strip_code_fence(raw))).ok()?;
    let plan = |steps: Option<Vec<String>>| -> Vec<String> {
        steps
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };
    let response = parsed.response.filter(|r| !r.trim().is_empty());

    match parsed.action.as_deref().map(str::to_lowercase).as_deref() {
        Some("continue") => Some(Decision::Continue(plan(parsed.plan))),
        Some("finish") => response.map(Decision::Finish),
        Some(_) => None,
        None => match (response, parsed.plan) {
            (Some(response), _) => Some(Decision::Finish(response)),
            (None, Some(steps)) => Some(Decision::Continue(plan(Some(steps)))),
            (None, None) => None,
        },
    }
}

/// Returns true when a result text reads like a failure report.
fn result_indicates_failure(result: &str) -> bool {
    let result = result.to_lowercase();
    FAILURE_MARKERS.iter().any(|marker| result.contains(marker))
}

/// Anti-stagnation rule: when the previous execution failed, drop every plan
/// entry byte-identical to the failed task. Stripping may empty the plan; the
/// runner's safety check then ends the run instead of stalling on it.
fn strip_repeated_failed_task(
    mut plan: Vec<String>,
    last_record: Option<&ExecutionRecord>,
) -> Vec<String> {
    let Some(record) = last_record else {
        return plan;
    };
    if record.task.is_empty() || !result_indicates_failure(&record.result) {
        return plan;
    }
    let before = plan.len();
    plan.retain(|task| task != &record.task);
    if plan.len() < before {
        tracing::warn!(
            task = %truncate_for_log(&record.task, 120),
            stripped = before - plan.len(),
            "dropped verbatim repeat of a failed task from the new plan"
        );
    }
    plan
}

//! Executor stage: runs the head of the plan through the solver.
//!
//! The solver may search the web zero or more times before answering; this
//! stage only prepares the task text and routes the result into the record
//! and, for document steps, the draft.

use std::sync::Arc;

use crate::solver::Solver;
use crate::temporal::TemporalContext;

use super::classify::is_document_task;
use super::state::{ExecutionRecord, ExecutorOutput};
use super::truncate_for_log;

/// Marks the start of the embedded draft in an augmented task.
pub const ARTIFACT_BLOCK_START: &str = "--- CURRENT DRAFT ---";
/// Marks the end of the embedded draft in an augmented task.
pub const ARTIFACT_BLOCK_END: &str = "--- END DRAFT ---";

/// Executor stage: one solver call per cycle.
///
/// Never returns an error: an empty plan becomes a placeholder record and a
/// solver failure becomes its textual explanation in the record, leaving
/// recovery to the Replanner.
///
/// **Interaction**: `PlanExecuteRunner` calls [`Executor::execute`] with the
/// plan head and the current draft; the returned delta is folded into the
/// shared state with `PlanExecuteState::apply_execution`.
pub struct Executor {
    solver: Arc<dyn Solver>,
}

impl Executor {
    pub fn new(solver: Arc<dyn Solver>) -> Self {
        Self { solver }
    }

    /// Executes one task: classify, augment, solve, route the result.
    ///
    /// `task` is the head of the plan (`None` when the plan is empty) and
    /// `artifact` the current draft. The record always carries the original
    /// task text, not the augmented prompt. Only document-classified tasks
    /// produce a new draft, and only when the solver succeeds.
    pub async fn execute(
        &self,
        task: Option<&str>,
        temporal: &TemporalContext,
        artifact: Option<&str>,
    ) -> ExecutorOutput {
        let Some(task) = task else {
            tracing::warn!("executor invoked with an empty plan");
            return ExecutorOutput {
                record: ExecutionRecord::new("", "no task to execute"),
                artifact: None,
            };
        };

        let document = is_document_task(task);
        let prompt = build_task_prompt(task, temporal, artifact, document);
        tracing::debug!(
            task = %truncate_for_log(task, 120),
            document,
            has_draft = artifact.is_some(),
            "executing task"
        );

        match self.solver.solve(&prompt).await {
            Ok(result) => {
                tracing::debug!(
                    result = %truncate_for_log(&result, 120),
                    "task executed"
                );
                let artifact = document.then(|| result.clone());
                ExecutorOutput {
                    record: ExecutionRecord::new(task, result),
                    artifact,
                }
            }
            Err(err) => {
                // Recorded as an ordinary result; the Replanner's failure
                // analysis is the recovery point.
                tracing::warn!(error = %err, "solver failed, recording the error as the result");
                ExecutorOutput {
                    record: ExecutionRecord::new(task, err.to_string()),
                    artifact: None,
                }
            }
        }
    }
}

/// Builds the solver input: temporal preamble, the task, and for document
/// tasks either the delimited current draft or a note that none exists yet.
fn build_task_prompt(
    task: &str,
    temporal: &TemporalContext,
    artifact: Option<&str>,
    document: bool,
) -> String {
    let preamble = temporal.prompt_preamble();
    if !document {
        return format!("{}\n\n{}", preamble, task);
    }
    match artifact {
        Some(draft) => format!(
            "{}\n\n{}\n\nThe current draft is provided below. Operate on this given content; revise or extend it rather than regenerating it from scratch. Return the complete updated draft.\n\n{}\n{}\n{}",
            preamble, task, ARTIFACT_BLOCK_START, draft, ARTIFACT_BLOCK_END
        ),
        None => format!(
            "{}\n\n{}\n\nThere is no existing draft yet. Your result will be treated as the initial draft, so return the complete document text.",
            preamble, task
        ),
    }
}

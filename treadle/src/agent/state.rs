//! Plan-execute state: the shared record threaded through every cycle.
//!
//! Stages return deltas (`PlannerOutput`, `ExecutorOutput`, `Decision`) and
//! the runner folds them in through the `apply_*` methods, so each field of
//! `PlanExecuteState` has exactly one merge rule and one writer.

use serde::{Deserialize, Serialize};

/// One completed execution step: the task as dispatched and the textual
/// result the solver produced for it (answer text or failure report).
///
/// Written once by the Executor, never modified afterwards. Read by the
/// Replanner as execution feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// The plan step that was dispatched, verbatim.
    pub task: String,
    /// What came back: the step's answer, or a description of its failure.
    pub result: String,
}

impl ExecutionRecord {
    pub fn new(task: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            result: result.into(),
        }
    }
}

/// Planner delta: the initial plan for the run.
///
/// Produced by `Planner::plan` from LLM output. Folded in with
/// [`PlanExecuteState::apply_plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerOutput {
    /// Ordered tasks; the head is executed first.
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Executor delta: the record to append and, for document steps, the new draft.
///
/// There is deliberately no plan field here: after the first cycle only the
/// Replanner's [`Decision`] can rewrite the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorOutput {
    /// The (task, result) pair for this cycle.
    pub record: ExecutionRecord,
    /// Replacement draft content when the step was document work; `None`
    /// leaves the existing draft untouched.
    pub artifact: Option<String>,
}

/// Replanner delta: either the remaining plan or the final response.
///
/// Produced by `Replanner::replan` from LLM output. Folded in with
/// [`PlanExecuteState::apply_decision`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Replace the plan wholesale and run another cycle.
    Continue(Vec<String>),
    /// End the run with this response text.
    Finish(String),
}

/// Shared state for one plan-execute-replan run.
///
/// Merge rules, one per field:
/// - `objective`: written once at construction, never changed.
/// - `plan`: replaced wholesale by `apply_plan` and `Decision::Continue`.
/// - `history`: append-only, one record per execution cycle.
/// - `artifact`: replaced when an executor delta carries a draft, kept otherwise.
/// - `response`: set by `Decision::Finish` or `fail_terminal`; non-empty means
///   the run is over, and the plan is cleared in the same step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanExecuteState {
    /// The user's goal, verbatim. Immutable for the whole run.
    pub objective: String,
    /// Remaining tasks; the head is the next one to execute.
    #[serde(default)]
    pub plan: Vec<String>,
    /// Every (task, result) pair so far, in execution order.
    #[serde(default)]
    pub history: Vec<ExecutionRecord>,
    /// The working document draft, when one exists.
    #[serde(default)]
    pub artifact: Option<String>,
    /// The final answer; `Some` with non-empty text ends the run.
    #[serde(default)]
    pub response: Option<String>,
}

impl PlanExecuteState {
    /// Initial state for a run: objective set, everything else empty.
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            ..Self::default()
        }
    }

    /// Folds the Planner delta in: the plan is replaced wholesale.
    pub fn apply_plan(&mut self, output: PlannerOutput) {
        self.plan = output.steps;
    }

    /// Folds an Executor delta in: the record is appended to the history and,
    /// when the delta carries a draft, the artifact is replaced. The plan is
    /// not touched here; consuming the executed step is the Replanner's job.
    pub fn apply_execution(&mut self, output: ExecutorOutput) {
        self.history.push(output.record);
        if let Some(artifact) = output.artifact {
            self.artifact = Some(artifact);
        }
    }

    /// Folds the Replanner decision in. `Continue` replaces the plan and keeps
    /// the run going; `Finish` clears the plan and sets the final response, so
    /// a state never carries both signals at once.
    pub fn apply_decision(&mut self, decision: Decision) {
        match decision {
            Decision::Continue(plan) => {
                self.plan = plan;
                self.response = None;
            }
            Decision::Finish(response) => {
                self.plan.clear();
                self.response = Some(response);
            }
        }
    }

    /// Ends the run with a diagnostic response, clearing any remaining plan.
    pub fn fail_terminal(&mut self, diagnostic: impl Into<String>) {
        self.plan.clear();
        self.response = Some(diagnostic.into());
    }

    /// True once a non-empty final response is set.
    pub fn is_terminal(&self) -> bool {
        matches!(self.response.as_deref(), Some(r) if !r.is_empty())
    }

    /// The next task to execute: the head of the plan, if any.
    pub fn next_task(&self) -> Option<&str> {
        self.plan.first().map(String::as_str)
    }

    /// The final response once the run has ended.
    pub fn final_response(&self) -> Option<&str> {
        self.response.as_deref()
    }
}

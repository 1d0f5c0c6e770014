//! Plan-execute runner: the cyclic state machine driving the three stages.
//!
//! Phases: PLANNING → EXECUTING → REPLANNING → {EXECUTING | TERMINAL}.
//! [`advance`] is the pure transition function; the runner performs the stage
//! calls, builds a fresh temporal context per call, and folds each delta in.

use std::sync::Arc;
use std::time::Duration;

use crate::error::AgentError;
use crate::llm::{LlmClient, MockLlm};
use crate::solver::{MockSolver, Solver};
use crate::temporal::TemporalContext;

use super::executor::Executor;
use super::planner::Planner;
use super::replanner::{ReplanError, Replanner};
use super::state::{Decision, ExecutionRecord, ExecutorOutput, PlanExecuteState, PlannerOutput};
use super::truncate_for_log;

/// Default maximum number of execute-replan cycles per run.
pub const DEFAULT_MAX_CYCLES: u32 = 12;

/// Orchestration phase of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial plan is being produced. Entered once per run.
    Planning,
    /// The head of the plan is being executed.
    Executing,
    /// The plan is being revised or the run finished.
    Replanning,
    /// The run is over; the state carries the final response, if any.
    Terminal,
}

/// One stage's delta, fed to [`advance`].
#[derive(Debug, Clone)]
pub enum StageOutput {
    /// Planner finished: the initial plan.
    Planned(PlannerOutput),
    /// Executor finished: a record and an optional new draft.
    Executed(ExecutorOutput),
    /// Replanner finished: continue or finish.
    Replanned(Decision),
    /// A stage produced something the run cannot act on; ends the run with
    /// this diagnostic as the response.
    Failed(String),
}

/// Pure transition function: folds one stage delta into the state and returns
/// the next phase.
///
/// `Planned` always moves to Executing (an empty plan is handled there) and
/// `Executed` always moves to Replanning. `Replanned` ends the run on a
/// `Finish` decision, and as an independent safety check also when the
/// resulting plan is empty or headed by a blank task; otherwise the loop goes
/// back to Executing. `Failed` ends the run with a diagnostic response.
pub fn advance(mut state: PlanExecuteState, output: StageOutput) -> (Phase, PlanExecuteState) {
    match output {
        StageOutput::Planned(output) => {
            state.apply_plan(output);
            (Phase::Executing, state)
        }
        StageOutput::Executed(output) => {
            state.apply_execution(output);
            (Phase::Replanning, state)
        }
        StageOutput::Replanned(decision) => {
            state.apply_decision(decision);
            if state.is_terminal() {
                (Phase::Terminal, state)
            } else if !plan_is_actionable(&state.plan) {
                tracing::warn!("no actionable next task after replanning, ending the run");
                (Phase::Terminal, state)
            } else {
                (Phase::Executing, state)
            }
        }
        StageOutput::Failed(diagnostic) => {
            state.fail_terminal(diagnostic);
            (Phase::Terminal, state)
        }
    }
}

/// A plan can be executed when it has a head and the head is not blank.
fn plan_is_actionable(plan: &[String]) -> bool {
    plan.first().is_some_and(|task| !task.trim().is_empty())
}

/// Error type for runner operations.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("execution failed: {0}")]
    Agent(#[from] AgentError),
    #[error("{stage} stage timed out")]
    StageTimeout { stage: &'static str },
    #[error("cycle limit reached after {0} cycles")]
    CycleLimit(u32),
    #[error("run ended without a final response")]
    NoResponse,
}

/// Options for building a [`PlanExecuteRunner`].
///
/// Every unset field falls back to a mock, so tests and demos can build a
/// runner that never touches the network.
#[derive(Default)]
pub struct RunnerOptions {
    /// LLM for the Planner. Default: a MockLlm emitting a one-step plan.
    pub planner_llm: Option<Arc<dyn LlmClient>>,
    /// LLM for the Replanner. Default: a MockLlm that finishes with "done".
    pub replanner_llm: Option<Arc<dyn LlmClient>>,
    /// Solver for the Executor. Default: a MockSolver answering "done".
    pub solver: Option<Arc<dyn Solver>>,
    /// Execute-replan cycle cap. Default: [`DEFAULT_MAX_CYCLES`].
    pub max_cycles: Option<u32>,
    /// Per-stage timeout. Default: none (stages wait indefinitely).
    pub stage_timeout: Option<Duration>,
}

/// The Orchestrator: owns the three stages and drives one run at a time
/// through the phase loop.
///
/// State is run-scoped: `invoke` builds a fresh `PlanExecuteState` per call
/// and the runner itself is never mutated, so distinct runs may be driven
/// concurrently from one runner. Dropping the returned future abandons the
/// run at its current stage call.
pub struct PlanExecuteRunner {
    planner: Planner,
    executor: Executor,
    replanner: Replanner,
    max_cycles: u32,
    stage_timeout: Option<Duration>,
}

impl PlanExecuteRunner {
    /// Creates a runner from options, substituting mocks for unset stages.
    pub fn new(options: RunnerOptions) -> Self {
        let planner_llm = options.planner_llm.unwrap_or_else(|| {
            Arc::new(MockLlm::with_no_tool_calls(
                r#"{"steps": ["address the objective"]}"#,
            ))
        });
        let replanner_llm = options.replanner_llm.unwrap_or_else(|| {
            Arc::new(MockLlm::with_no_tool_calls(
                r#"{"action": "finish", "response": "done"}"#,
            ))
        });
        let solver = options
            .solver
            .unwrap_or_else(|| Arc::new(MockSolver::with_result("done")));

        Self {
            planner: Planner::new(planner_llm),
            executor: Executor::new(solver),
            replanner: Replanner::new(replanner_llm),
            max_cycles: options.max_cycles.unwrap_or(DEFAULT_MAX_CYCLES),
            stage_timeout: options.stage_timeout,
        }
    }

    /// Creates a runner from environment variables: `OPENAI_API_KEY` (and
    /// optionally `OPENAI_BASE_URL`, `MODEL`) for the stage LLMs,
    /// `EXA_API_KEY` for the web-search tool, `MAX_CYCLES` for the cycle cap.
    pub async fn from_env() -> Result<Self, crate::build::BuildError> {
        let config = crate::config::BuildConfig::from_env();
        crate::build::build_runner(&config).await
    }

    /// Drives one run to its terminal state and returns the full final state.
    ///
    /// Stage failures follow the loop's failure semantics: solver errors and
    /// executor timeouts become history records, an unclassifiable replanner
    /// decision becomes a terminal diagnostic response. Only hard stage
    /// failures (LLM call failed, planner/replanner timeout, cycle limit)
    /// surface as `Err`.
    pub async fn invoke(&self, objective: &str) -> Result<PlanExecuteState, RunError> {
        let mut state = PlanExecuteState::new(objective);
        let mut phase = Phase::Planning;
        let mut cycles = 0u32;
        tracing::info!(objective = %truncate_for_log(objective, 120), "run started");

        loop {
            match phase {
                Phase::Planning => {
                    let temporal = TemporalContext::now();
                    let output = with_stage_timeout(
                        self.stage_timeout,
                        "planner",
                        self.planner.plan(&state.objective, &temporal),
                    )
                    .await??;
                    (phase, state) = advance(state, StageOutput::Planned(output));
                }
                Phase::Executing => {
                    if cycles >= self.max_cycles {
                        tracing::warn!(cycles, "cycle limit reached, aborting the run");
                        return Err(RunError::CycleLimit(self.max_cycles));
                    }
                    cycles += 1;
                    let temporal = TemporalContext::now();
                    let task = state.next_task();
                    let output = match with_stage_timeout(
                        self.stage_timeout,
                        "executor",
                        self.executor.execute(task, &temporal, state.artifact.as_deref()),
                    )
                    .await
                    {
                        Ok(output) => output,
                        // An executor overrun is a task failure, not a run failure.
                        Err(_) => ExecutorOutput {
                            record: ExecutionRecord::new(
                                task.unwrap_or(""),
                                "execution timed out",
                            ),
                            artifact: None,
                        },
                    };
                    (phase, state) = advance(state, StageOutput::Executed(output));
                }
                Phase::Replanning => {
                    let temporal = TemporalContext::now();
                    let result = with_stage_timeout(
                        self.stage_timeout,
                        "replanner",
                        self.replanner.replan(&state, &temporal),
                    )
                    .await?;
                    let output = match result {
                        Ok(decision) => StageOutput::Replanned(decision),
                        Err(ReplanError::Unclassified { raw }) => StageOutput::Failed(format!(
                            "run ended: replanner decision could not be classified: {}",
                            raw
                        )),
                        Err(ReplanError::Agent(err)) => return Err(err.into()),
                    };
                    (phase, state) = advance(state, output);
                }
                Phase::Terminal => {
                    tracing::info!(
                        cycles,
                        has_response = state.is_terminal(),
                        "run finished"
                    );
                    return Ok(state);
                }
            }
        }
    }

    /// Drives one run and returns the terminal response text.
    ///
    /// A run that terminates without a response (the safety check fired)
    /// yields [`RunError::NoResponse`].
    pub async fn run(&self, objective: &str) -> Result<String, RunError> {
        let state = self.invoke(objective).await?;
        match state.final_response() {
            Some(response) if !response.is_empty() => Ok(response.to_string()),
            _ => Err(RunError::NoResponse),
        }
    }
}

/// Wraps a stage call in the optional per-stage timeout.
async fn with_stage_timeout<T>(
    limit: Option<Duration>,
    stage: &'static str,
    fut: impl std::future::Future<Output = T>,
) -> Result<T, RunError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| RunError::StageTimeout { stage }),
        None => Ok(fut.await),
    }
}

//! # Treadle
//!
//! A plan-execute-replan agent loop in Rust. One shared state record flows
//! through three LLM-backed stages: a **Planner** drafts an ordered step
//! list, an **Executor** runs one step per cycle through a tool-augmented
//! solver, and a **Replanner** revises the remaining plan or finishes the run
//! with a final response.
//!
//! ## Design principles
//!
//! - **State in, delta out**: stages never mutate shared state; each returns
//!   a typed delta ([`PlannerOutput`], [`ExecutorOutput`], [`Decision`]) and
//!   the runner folds it in through one merge rule per field (plan: replace,
//!   history: append, draft: replace-if-present, response: finish-only).
//! - **One plan writer**: after the first cycle only the Replanner's decision
//!   can rewrite the plan; the Executor's delta has no plan field at all.
//! - **Failures stay in the loop**: solver errors, empty plans, and executor
//!   timeouts become history records; an unclassifiable replanner decision
//!   ends the run with a diagnostic response. Only hard stage failures
//!   surface as [`RunError`].
//! - **Explicit phases**: the orchestrator is an enum-tagged state machine
//!   ([`Phase`]) with a pure transition function ([`advance`]), so cycle caps
//!   and timeouts are injected from outside the transition logic.
//!
//! ## Main modules
//!
//! - [`agent`]: the loop stages [`Planner`], [`Executor`], [`Replanner`],
//!   [`PlanExecuteRunner`], [`PlanExecuteState`], [`advance`] and [`Phase`].
//! - [`llm`]: [`LlmClient`] trait, [`MockLlm`], OpenAI-compatible [`ChatOpenAI`].
//! - [`solver`]: [`Solver`] trait, [`ReactSolver`] (think/act loop), [`MockSolver`].
//! - [`tool_source`]: [`ToolSource`], [`ToolSpec`]; Exa-backed
//!   [`WebSearchToolsSource`], [`MockToolSource`].
//! - [`temporal`]: [`TemporalContext`] snapshot embedded in every stage prompt.
//! - [`config`] / [`build`]: [`BuildConfig::from_env`] and the component builders.
//! - [`message`]: [`Message`] (System / User / Assistant).
//! - [`error`]: [`AgentError`].
//!
//! Key types are re-exported at crate root:
//! `use treadle::{PlanExecuteRunner, RunnerOptions, Decision, Message};`.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use treadle::{MockLlm, MockSolver, PlanExecuteRunner, RunnerOptions};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let runner = PlanExecuteRunner::new(RunnerOptions {
//!     planner_llm: Some(Arc::new(MockLlm::with_no_tool_calls(
//!         r#"{"steps": ["compute 2+2 and state the result"]}"#,
//!     ))),
//!     replanner_llm: Some(Arc::new(MockLlm::with_no_tool_calls(
//!         r#"{"action": "finish", "response": "4"}"#,
//!     ))),
//!     solver: Some(Arc::new(MockSolver::with_result("4"))),
//!     ..Default::default()
//! });
//!
//! let answer = runner.run("What is 2+2?").await.unwrap();
//! assert_eq!(answer, "4");
//! # }
//! ```
//!
//! Against real backends, set `OPENAI_API_KEY` (and optionally `EXA_API_KEY`
//! for web search) and build with `PlanExecuteRunner::from_env()`.
//!
//! ## Examples
//!
//! See the `treadle-examples` crate: `plan_execute_mock`, `plan_execute_draft`,
//! `plan_execute_exa`.

pub mod agent;
pub mod build;
pub mod config;
pub mod error;
pub mod llm;
pub mod message;
pub mod solver;
pub mod temporal;
pub mod tool_source;

pub use agent::{
    advance, is_document_task, Decision, ExecutionRecord, Executor, ExecutorOutput, Phase,
    PlanExecuteRunner, PlanExecuteState, Planner, PlannerOutput, ReplanError, Replanner, RunError,
    RunnerOptions, StageOutput, ARTIFACT_BLOCK_END, ARTIFACT_BLOCK_START, DEFAULT_MAX_CYCLES,
    PLANNER_SYSTEM, REPLANNER_SYSTEM,
};
pub use build::{build_runner, build_solver, build_stage_llm, build_tool_source, BuildError};
pub use config::BuildConfig;
pub use error::AgentError;
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm, ToolCall, ToolChoiceMode};
pub use message::Message;
pub use solver::{MockSolver, ReactSolver, Solver, MAX_SOLVER_TURNS, SOLVER_SYSTEM_PROMPT};
pub use temporal::TemporalContext;
pub use tool_source::{
    MockToolSource, ToolCallContent, ToolSource, ToolSourceError, ToolSpec, WebSearchToolsSource,
    TOOL_WEB_SEARCH,
};

//! Plan-execute-replan agent: stages, shared state, and the runner.
//!
//! Objective → Planner (initial plan) → Executor (one task per cycle) →
//! Replanner (revise or finish) → back to Executor or terminal. The Replanner
//! owns the plan after the first cycle; every stage failure is absorbed into
//! the state per the loop's failure semantics.

mod classify;
mod executor;
mod planner;
mod prompt;
mod replanner;
mod runner;
mod state;

pub use classify::is_document_task;
pub use executor::{Executor, ARTIFACT_BLOCK_END, ARTIFACT_BLOCK_START};
pub use planner::Planner;
pub use prompt::{PLANNER_SYSTEM, REPLANNER_SYSTEM};
pub use replanner::{ReplanError, Replanner};
pub use runner::{
    advance, Phase, PlanExecuteRunner, RunError, RunnerOptions, StageOutput, DEFAULT_MAX_CYCLES,
};
pub use state::{
    Decision, ExecutionRecord, ExecutorOutput, PlanExecuteState, PlannerOutput,
};

/// Truncates stage text for log lines.
pub(crate) fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Strips a surrounding markdown code fence (``` or ```json) from LLM output.
/// Returns the trimmed input when no fence is present.
pub(crate) fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let mut rest = trimmed.get(3..).unwrap_or("").trim_start();
    if rest.to_lowercase().starts_with("json") {
        rest = rest.get(4..).unwrap_or("").trim_start();
    }
    match rest.find("```") {
        Some(close) => rest.get(..close).unwrap_or(rest).trim(),
        None => rest.trim(),
    }
}

/// Extracts the outermost JSON object or array from LLM output that wraps it
/// in prose. Scans to the first `{` or `[` and returns the slice through its
/// balanced close, ignoring brackets inside string literals. Returns the
/// input unchanged when no opener or no balanced close is found.
pub(crate) fn extract_json(raw: &str) -> &str {
    let open = match raw.find(|c| c == '{' || c == '[') {
        Some(i) => i,
        None => return raw,
    };
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in raw[open..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => depth += 1,
            '}' | ']' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return &raw[open..open + i + c.len_utf8()];
                }
            }
            _ => {}
        }
    }
    raw
}

//! Planner and Replanner prompts: instruct the LLM to emit plan JSON.

/// System prompt for the Planner: decompose the objective into an ordered step list.
///
/// The LLM must respond with valid JSON: `{"steps": ["first task", "second task"]}`.
/// Steps are dispatched one per cycle, strictly in order.
pub const PLANNER_SYSTEM: &str = r#"For the given objective, come up with a simple step by step plan. This plan should involve individual tasks, that if executed correctly will help achieve the objective. Do not add any superfluous pre and post descriptive text.

Rules:
- Output ONLY valid JSON, no markdown or explanation.
- Format: {"steps": ["first task", "second task"]}
- Steps are executed one at a time, in order, by an assistant that can use a websearch tool.
- Each step must be self-contained and actionable; do not reference information that is not yet available.
- Keep the plan minimal: a trivial objective needs only one step.
- The result of the final step must be the final answer to the objective.
"#;

/// System prompt for the Replanner: revise the remaining plan or finish the run.
///
/// The LLM must respond with exactly one of
/// `{"action": "continue", "plan": ["next task"]}` (run another cycle) or
/// `{"action": "finish", "response": "final answer"}` (end the run).
pub const REPLANNER_SYSTEM: &str = r#"For the given objective, previous plan, and feedback from execution, update the plan or finish with the final response. Do not add any superfluous pre and post descriptive text.

Rules:
- Output ONLY valid JSON, no markdown or explanation.
- To continue: {"action": "continue", "plan": ["next task", "..."]} listing ONLY the steps that still need to be done. Never include already completed steps.
- To finish: {"action": "finish", "response": "final answer"}. Finish as soon as the execution feedback answers the objective.
- If the objective asked for a document, finish with the complete draft text as the response, not a summary of it.
- If the latest result reports an error or an inability to proceed, do not repeat that task word for word: break it into smaller steps, gather the missing information with websearch, or create the missing draft first.
- When a draft exists, phrase steps as revisions of the existing draft, not as writing it from scratch.
"#;

//! Document-task classification: decides which execution results feed the draft.

/// Keywords that mark a plan step as document work.
const DOCUMENT_KEYWORDS: &[&str] = &[
    "draft",
    "report",
    "summarize",
    "write",
    "review",
    "refine",
    "organize",
    "compile",
    "structure",
    "generate",
    "add to",
    "create",
];

/// Returns true when the task text reads like work on the document draft.
///
/// Case-insensitive substring match over a fixed keyword list. A false
/// positive overwrites the draft with unrelated text; a false negative leaves
/// a document result only in the history. The planner prompts steer step
/// wording toward these verbs.
///
/// **Interaction**: Called by `Executor` to route the solver result into the
/// draft, and to decide whether the draft is attached to the task prompt.
pub fn is_document_task(task: &str) -> bool {
    let task = task.to_lowercase();
    DOCUMENT_KEYWORDS
        .iter()
        .any(|keyword| task.contains(keyword))
}

//! Mock LLM for tests and examples.
//!
//! Returns fixed assistant messages and optional fixed ToolCalls (e.g. a
//! websearch call); configurable "no tool_calls" to test the direct-answer
//! path. Optional stateful modes: two-phase (tools then end) for solver
//! round-trips, and a scripted sequence for whole plan-execute-replan runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, ToolCall};
use crate::message::Message;

/// Mock LLM: fixed assistant text and optional tool_calls.
///
/// Configurable to return one fixed ToolCall (e.g. websearch) or no
/// tool_calls, so the solver can run one round (think → act → answer) or
/// answer directly. Stateful modes: `first_tools_then_end` for two-phase
/// solver tests, `with_sequence` to script one content per invoke for
/// multi-stage loop tests, `failing` to exercise error paths.
///
/// **Interaction**: Implements `LlmClient`; used by the stages and
/// `ReactSolver` in tests and examples.
pub struct MockLlm {
    /// Assistant message content to return (or first call when stateful).
    content: String,
    /// Tool calls to return (or first call when stateful).
    tool_calls: Vec<ToolCall>,
    /// Invoke counter for the stateful modes.
    call_count: Option<AtomicUsize>,
    /// Second response content (two-phase mode).
    second_content: Option<String>,
    /// When Some, invoke() n returns sequence[n] (sticking on the last entry).
    sequence: Option<Vec<String>>,
    /// When Some, every invoke() fails with this message.
    error: Option<String>,
}

impl MockLlm {
    /// Creates a mock that returns one assistant message and one tool call (websearch).
    pub fn with_web_search_call() -> Self {
        Self {
            content: "I'll search for that.".to_string(),
            tool_calls: vec![ToolCall {
                name: "websearch".to_string(),
                arguments: r#"{"query":"example"}"#.to_string(),
                id: Some("call-1".to_string()),
            }],
            call_count: None,
            second_content: None,
            sequence: None,
            error: None,
        }
    }

    /// Creates a mock that returns assistant text and no tool_calls (direct answer).
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: vec![],
            call_count: None,
            second_content: None,
            sequence: None,
            error: None,
        }
    }

    /// Creates a mock with custom content and tool_calls.
    pub fn new(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
            call_count: None,
            second_content: None,
            sequence: None,
            error: None,
        }
    }

    /// Creates a stateful mock: first invoke() returns a websearch tool_call,
    /// second returns no tool_calls. Used for two-phase solver tests.
    pub fn first_tools_then_end() -> Self {
        Self {
            content: "I'll search for that.".to_string(),
            tool_calls: vec![ToolCall {
                name: "websearch".to_string(),
                arguments: r#"{"query":"example"}"#.to_string(),
                id: Some("call-1".to_string()),
            }],
            call_count: Some(AtomicUsize::new(0)),
            second_content: Some("The search results are above.".to_string()),
            sequence: None,
            error: None,
        }
    }

    /// Creates a stateful mock like [`MockLlm::first_tools_then_end`] with a
    /// custom second response.
    pub fn first_tools_then(second_content: impl Into<String>) -> Self {
        Self {
            second_content: Some(second_content.into()),
            ..Self::first_tools_then_end()
        }
    }

    /// Creates a scripted mock: invoke() n returns `contents[n]`, sticking on
    /// the last entry once the script runs out. No tool_calls are returned.
    ///
    /// Scripts whole runs: one entry per stage invocation in order
    /// (plan, execute turn(s), replan, ...).
    pub fn with_sequence(contents: Vec<impl Into<String>>) -> Self {
        Self {
            content: String::new(),
            tool_calls: vec![],
            call_count: Some(AtomicUsize::new(0)),
            second_content: None,
            sequence: Some(contents.into_iter().map(Into::into).collect()),
            error: None,
        }
    }

    /// Creates a mock whose every invoke() fails with `ExecutionFailed(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            tool_calls: vec![],
            call_count: None,
            second_content: None,
            sequence: None,
            error: Some(message.into()),
        }
    }

    /// Set content (builder).
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set tool_calls (builder).
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = tool_calls;
        self
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, _messages: &[Message]) -> Result<LlmResponse, AgentError> {
        if let Some(message) = &self.error {
            return Err(AgentError::ExecutionFailed(message.clone()));
        }
        if let Some(seq) = &self.sequence {
            let n = self
                .call_count
                .as_ref()
                .map(|c| c.fetch_add(1, Ordering::SeqCst))
                .unwrap_or(0);
            let idx = n.min(seq.len().saturating_sub(1));
            return Ok(LlmResponse {
                content: seq.get(idx).cloned().unwrap_or_default(),
                tool_calls: vec![],
                usage: None,
            });
        }
        let (content, tool_calls) = match &self.call_count {
            Some(c) => {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    (self.content.clone(), self.tool_calls.clone())
                } else {
                    (
                        self.second_content
                            .as_deref()
                            .unwrap_or(&self.content)
                            .to_string(),
                        vec![],
                    )
                }
            }
            None => (self.content.clone(), self.tool_calls.clone()),
        };
        Ok(LlmResponse {
            content,
            tool_calls,
            usage: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: with_web_search_call returns content and a single websearch ToolCall.
    #[tokio::test]
    async fn mock_llm_with_web_search_call_returns_tool_call() {
        let llm = MockLlm::with_web_search_call();
        let resp = llm.invoke(&[Message::user("hi")]).await.unwrap();
        assert_eq!(resp.content, "I'll search for that.");
        assert_eq!(resp.tool_calls.len(), 1);
        assert_eq!(resp.tool_calls[0].name, "websearch");
    }

    /// **Scenario**: with_no_tool_calls returns content only.
    #[tokio::test]
    async fn mock_llm_with_no_tool_calls_returns_content_only() {
        let llm = MockLlm::with_no_tool_calls("done");
        let resp = llm.invoke(&[]).await.unwrap();
        assert_eq!(resp.content, "done");
        assert!(resp.tool_calls.is_empty());
    }

    /// **Scenario**: first_tools_then_end returns tool_calls on the first
    /// invoke and none on the second.
    #[tokio::test]
    async fn mock_llm_first_tools_then_end_is_stateful() {
        let llm = MockLlm::first_tools_then_end();
        let first = llm.invoke(&[]).await.unwrap();
        assert_eq!(first.tool_calls.len(), 1);
        let second = llm.invoke(&[]).await.unwrap();
        assert!(second.tool_calls.is_empty());
        assert_eq!(second.content, "The search results are above.");
    }

    /// **Scenario**: with_sequence returns entries in order and sticks on the last.
    #[tokio::test]
    async fn mock_llm_with_sequence_returns_in_order_then_sticks() {
        let llm = MockLlm::with_sequence(vec!["a", "b"]);
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "a");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "b");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "b");
    }

    /// **Scenario**: failing() returns ExecutionFailed with the configured message.
    #[tokio::test]
    async fn mock_llm_failing_returns_execution_failed() {
        let llm = MockLlm::failing("provider down");
        let err = llm.invoke(&[]).await.unwrap_err();
        assert!(
            err.to_string().contains("provider down"),
            "error should carry the message: {}",
            err
        );
    }
}

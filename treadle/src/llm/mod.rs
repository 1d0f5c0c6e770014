//! LLM client abstraction shared by the stages and the solver.
//!
//! Planner, Replanner and the ReAct solver all depend on a callable that
//! returns assistant text and optional tool_calls; this module defines the
//! trait, the mock implementation and the OpenAI-compatible client.

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;

/// Tool choice mode for chat completions: when tools are present, controls whether
/// the model may choose (auto), must not use (none), or must use (required).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToolChoiceMode {
    /// Model can pick between message or tool calls. Default when tools are present.
    #[default]
    Auto,
    /// Model will not call any tool.
    None,
    /// Model must call one or more tools.
    Required,
}

impl std::str::FromStr for ToolChoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" => Ok(Self::None),
            "required" => Ok(Self::Required),
            _ => Err(format!(
                "unknown tool_choice: {} (use auto, none, or required)",
                s
            )),
        }
    }
}

/// A single tool invocation produced by the LLM and consumed by the solver's
/// act step.
///
/// `name` and `arguments` (JSON string) address a tool in a `ToolSource`.
/// Optional `id` correlates the call with its result message.
///
/// **Interaction**: Written by `ReactSolver` from LLM output; read back when
/// calling `ToolSource::call_tool(name, arguments)`.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ToolCall {
    /// Tool name as listed by the ToolSource.
    pub name: String,
    /// Arguments as JSON string; parsed when calling the tool.
    pub arguments: String,
    /// Optional id to echo back alongside the tool result.
    pub id: Option<String>,
}

/// Token usage for one LLM call (prompt + completion).
///
/// **Interaction**: Optional part of `LlmResponse`; logged by the stages at
/// debug level for cost accounting.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    /// Tokens in the prompt (input).
    pub prompt_tokens: u32,
    /// Tokens in the completion (output).
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

/// Response from an LLM completion: assistant message text and optional tool calls.
///
/// **Interaction**: Returned by `LlmClient::invoke()`; the stages parse
/// `content` as structured JSON, the solver routes `tool_calls` to its
/// ToolSource.
#[derive(Debug)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
    /// Tool calls from this turn; empty means the model answered directly.
    pub tool_calls: Vec<ToolCall>,
    /// Token usage for this call, when available (e.g. OpenAI returns this).
    pub usage: Option<LlmUsage>,
}

/// LLM client: given messages, returns assistant text and optional tool_calls.
///
/// Planner and Replanner call this once per stage invocation; the ReAct
/// solver calls it once per reasoning turn. Implementations: `MockLlm`
/// (scripted responses), `ChatOpenAI` (real API).
///
/// **Interaction**: Used by `Planner`, `Replanner` and `ReactSolver`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages, return assistant content and optional tool_calls.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;
}

//! Tool source abstraction: list tools and call a tool.
//!
//! The ReAct solver depends on `ToolSource` instead of a concrete tool
//! registry; implementations include `MockToolSource` (tests) and
//! `WebSearchToolsSource` (Exa web search).

mod mock;
mod web_search_tools_source;

pub use mock::MockToolSource;
pub use web_search_tools_source::{WebSearchToolsSource, TOOL_WEB_SEARCH};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Tool specification: name, description and argument schema.
///
/// Used by the solver to build tool descriptions for the LLM.
///
/// **Interaction**: Returned by `ToolSource::list_tools()`; consumed by
/// `ChatOpenAI::with_tools` to enable tool_calls.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    /// Tool name (addressed by `ToolSource::call_tool`).
    pub name: String,
    /// Human-readable description for the LLM.
    pub description: Option<String>,
    /// JSON Schema for arguments.
    pub input_schema: Value,
}

/// Result of a single tool call.
///
/// **Interaction**: Returned by `ToolSource::call_tool()`; the solver renders
/// `text` into a User message for the next reasoning turn.
#[derive(Debug, Clone)]
pub struct ToolCallContent {
    /// Result text.
    pub text: String,
}

/// Errors from listing or calling tools.
///
/// **Interaction**: Returned by `ToolSource::list_tools()` and `call_tool()`;
/// the solver maps these to result text so task execution keeps going.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Tool source: list tools and call a tool.
///
/// The solver depends on this instead of a concrete registry: `list_tools()`
/// feeds the LLM's tool declarations, `call_tool(name, args)` executes one
/// call. Implementations: `MockToolSource` (tests), `WebSearchToolsSource`.
///
/// **Interaction**: Used by `ReactSolver` (both methods) and by
/// `ChatOpenAI::new_with_tool_source` (list only).
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// List available tools.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Call a tool by name with JSON arguments.
    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError>;
}

//! Mock ToolSource for tests and examples.
//!
//! Returns a fixed tool list and a fixed call result (no network). The
//! failing mode returns a transport error from every call so tool-failure
//! handling can be tested deterministically.

use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

/// Mock ToolSource: fixed tool list, fixed call result.
///
/// `call_tool` ignores the tool name and returns the configured text, so a
/// single instance serves any scripted conversation. The failing variant
/// keeps the tool list intact but fails every call, which is how a dead
/// search backend looks to the solver.
///
/// **Interaction**: Implements `ToolSource`; used by `ReactSolver` in tests
/// and examples.
pub struct MockToolSource {
    tools: Vec<ToolSpec>,
    call_result: String,
    call_error: Option<String>,
}

impl MockToolSource {
    /// Creates a mock with one `websearch` tool and a canned result snippet.
    pub fn web_search_example() -> Self {
        Self {
            tools: vec![ToolSpec {
                name: "websearch".to_string(),
                description: Some(
                    "Search the web for a query. Returns up to 3 result snippets.".to_string(),
                ),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": { "type": "string", "description": "The search query." }
                    },
                    "required": ["query"]
                }),
            }],
            call_result: "[1] Example result\n  URL: https://example.com/".to_string(),
            call_error: None,
        }
    }

    /// Creates a mock with custom tools and a fixed call result.
    pub fn new(tools: Vec<ToolSpec>, call_result: String) -> Self {
        Self {
            tools,
            call_result,
            call_error: None,
        }
    }

    /// Creates a mock whose list_tools() works but whose every call_tool()
    /// fails with a transport error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            call_error: Some(message.into()),
            ..Self::web_search_example()
        }
    }

    /// Set the fixed call result (builder).
    pub fn with_call_result(mut self, call_result: String) -> Self {
        self.call_result = call_result;
        self
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        _name: &str,
        _arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        if let Some(message) = &self.call_error {
            return Err(ToolSourceError::Transport(message.clone()));
        }
        Ok(ToolCallContent {
            text: self.call_result.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// **Scenario**: web_search_example lists one websearch tool with a query schema.
    #[tokio::test]
    async fn mock_tool_source_list_tools_returns_web_search_example() {
        let source = MockToolSource::web_search_example();
        let tools = source.list_tools().await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "websearch");
        assert!(tools[0]
            .description
            .as_deref()
            .unwrap_or("")
            .contains("Search the web"));
    }

    /// **Scenario**: call_tool returns the fixed text for any tool name.
    #[tokio::test]
    async fn mock_tool_source_call_tool_any_name_returns_same_result() {
        let source = MockToolSource::web_search_example();
        let r1 = source.call_tool("websearch", json!({})).await.unwrap();
        let r2 = source
            .call_tool("other_tool", json!({"x":1}))
            .await
            .unwrap();
        assert_eq!(r1.text, r2.text);
        assert!(r1.text.contains("Example result"));
    }

    /// **Scenario**: with_call_result overrides the canned text.
    #[tokio::test]
    async fn mock_tool_source_custom_call_result() {
        let source =
            MockToolSource::web_search_example().with_call_result("custom result".to_string());
        let result = source.call_tool("websearch", json!({})).await.unwrap();
        assert_eq!(result.text, "custom result");
    }

    /// **Scenario**: failing() lists tools normally but every call returns a transport error.
    #[tokio::test]
    async fn mock_tool_source_failing_lists_but_fails_calls() {
        let source = MockToolSource::failing("backend down");
        let tools = source.list_tools().await.unwrap();
        assert_eq!(tools.len(), 1);
        let err = source.call_tool("websearch", json!({})).await.unwrap_err();
        assert!(
            matches!(err, ToolSourceError::Transport(_)),
            "expected Transport: {:?}",
            err
        );
        assert!(err.to_string().contains("backend down"));
    }
}

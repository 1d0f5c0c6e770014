//! Exa search integration test over the real API: calls `websearch` through
//! `WebSearchToolsSource` with a minimal query.
//!
//! Loads `EXA_API_KEY` from `.env` or environment. Run with:
//!
//! ```bash
//! cargo test -p treadle exa_live -- --ignored
//! ```


use treadle::{ToolSource, WebSearchToolsSource, TOOL_WEB_SEARCH};

/// Lists the websearch tool and runs one real search.
#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires EXA_API_KEY and network; run with: cargo test -p treadle exa_live -- --ignored"]
async fn exa_live_web_search() {
    dotenv::dotenv().ok();
    let key = std::env::var("EXA_API_KEY")
        .expect("EXA_API_KEY must be set in .env or env for exa_live tests");

    let source = WebSearchToolsSource::new(key);

    let tools = source.list_tools().await.expect("list_tools");
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, TOOL_WEB_SEARCH);

    let args = serde_json::json!({ "query": "Rust programming language" });
    let content = source
        .call_tool(TOOL_WEB_SEARCH, args)
        .await
        .expect("call_tool websearch");
    assert!(!content.text.is_empty(), "expected non-empty tool result");
}

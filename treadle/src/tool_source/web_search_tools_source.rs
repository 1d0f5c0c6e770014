//! Web search tools source: Exa search as one tool (`websearch`).
//!
//! The search contract is deliberately small: a query string in, a bounded
//! number of result snippets out. Result count is clamped to
//! [`NUM_RESULTS_CAP`] regardless of what the caller asks for.

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

/// Tool name: search the web for a query.
pub const TOOL_WEB_SEARCH: &str = "websearch";

const EXA_SEARCH_URL: &str = "https://api.exa.ai/search";
/// Upper bound on result snippets per search.
const NUM_RESULTS_CAP: u64 = 3;

fn exa_search_url() -> String {
    std::env::var("EXA_SEARCH_URL").unwrap_or_else(|_| EXA_SEARCH_URL.to_string())
}

/// Parameters for a single Exa search request (aligned with Exa API).
struct ExaSearchParams {
    query: String,
    num_results: u64,
    text_max_chars: u64,
    request_highlights: bool,
    highlights_max_chars: Option<u64>,
}

impl ExaSearchParams {
    fn build_body(&self) -> serde_json::Value {
        let mut contents = serde_json::map::Map::new();
        contents.insert(
            "text".to_string(),
            json!({ "maxCharacters": self.text_max_chars }),
        );
        if self.request_highlights {
            let mut hi = serde_json::map::Map::new();
            hi.insert(
                "maxCharacters".to_string(),
                json!(self.highlights_max_chars.unwrap_or(2000)),
            );
            contents.insert("highlights".to_string(), json!(hi));
        }

        serde_json::json!({
            "query": self.query,
            "numResults": self.num_results.min(NUM_RESULTS_CAP),
            "type": "auto",
            "contents": contents,
        })
    }
}

async fn exa_search_request(
    api_key: &str,
    params: ExaSearchParams,
) -> Result<serde_json::Value, ToolSourceError> {
    let body = params.build_body();
    let client = reqwest::Client::new();
    let res = client
        .post(exa_search_url())
        .header("x-api-key", api_key)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| ToolSourceError::Transport(e.to_string()))?;
    if !res.status().is_success() {
        let status = res.status();
        let err_body = res.text().await.unwrap_or_default();
        return Err(ToolSourceError::Transport(format!(
            "Exa API error {}: {}",
            status, err_body
        )));
    }
    let out: serde_json::Value = res
        .json()
        .await
        .map_err(|e| ToolSourceError::Transport(e.to_string()))?;
    Ok(out)
}

/// Cuts `s` to at most `max_bytes`, backing up to a char boundary, and marks
/// the cut with "...". Inputs within budget pass through unchanged.
fn truncate_excerpt(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

fn format_results(value: &serde_json::Value, text_max_per_result: usize) -> String {
    let results: &[serde_json::Value] = value
        .get("results")
        .and_then(|r| r.as_array())
        .map(|v| v.as_slice())
        .unwrap_or(&[]);
    let mut s = String::new();
    for (i, r) in results.iter().enumerate() {
        let title = r
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or("(no title)");
        let url = r.get("url").and_then(|u| u.as_str()).unwrap_or("");
        s.push_str(&format!("[{}] {}\n  URL: {}\n", i + 1, title, url));

        // Prefer highlights (LLM-selected snippets) when present
        let highlights = r
            .get("highlights")
            .and_then(|h| h.as_array())
            .map(|a| a.iter().filter_map(|v| v.as_str()).collect::<Vec<_>>())
            .unwrap_or_default();
        if !highlights.is_empty() {
            for line in &highlights {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    s.push_str(&format!("  • {}\n", trimmed.replace('\n', " ")));
                }
            }
        } else if let Some(summary) = r.get("summary").and_then(|v| v.as_str()) {
            let summary = summary.trim();
            if !summary.is_empty() {
                let excerpt = truncate_excerpt(summary, text_max_per_result);
                s.push_str(&format!("  {}\n", excerpt.replace('\n', " ")));
            }
        } else {
            let text = r.get("text").and_then(|t| t.as_str()).unwrap_or("");
            if !text.is_empty() {
                let excerpt = truncate_excerpt(text, text_max_per_result);
                s.push_str(&format!("  {}\n", excerpt.replace('\n', " ")));
            }
        }
        s.push('\n');
    }
    if s.is_empty() {
        s = "No results.".to_string();
    }
    s
}

/// Tool source that exposes Exa web search as one tool: `websearch`.
///
/// Result count is clamped to [`NUM_RESULTS_CAP`] snippets so tool output
/// stays small enough to feed back into a reasoning turn verbatim.
///
/// **Interaction**: Implements `ToolSource`; passed to `ReactSolver` and to
/// `ChatOpenAI::new_with_tool_source` so the LLM and execution see the same
/// tool.
pub struct WebSearchToolsSource {
    api_key: String,
}

impl WebSearchToolsSource {
    /// Creates a web search tools source with the given Exa API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    fn spec() -> ToolSpec {
        ToolSpec {
            name: TOOL_WEB_SEARCH.to_string(),
            description: Some(
                "Search the web using Exa. Use for current events and up-to-date information. \
                 Today's date should be used when searching for recent information. Returns up \
                 to 3 result snippets."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query." },
                    "numResults": { "type": "integer", "description": "Max results (1-3, default 3).", "default": 3 }
                },
                "required": ["query"]
            }),
        }
    }
}

#[async_trait]
impl ToolSource for WebSearchToolsSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(vec![Self::spec()])
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        if name != TOOL_WEB_SEARCH {
            return Err(ToolSourceError::NotFound(name.to_string()));
        }
        let query = arguments
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing query".to_string()))?
            .to_string();
        let num_results = arguments
            .get("numResults")
            .and_then(|v| v.as_u64())
            .unwrap_or(NUM_RESULTS_CAP);

        let params = ExaSearchParams {
            query,
            num_results,
            text_max_chars: 6000,
            request_highlights: true,
            highlights_max_chars: Some(2000),
        };
        let out = exa_search_request(&self.api_key, params).await?;
        Ok(ToolCallContent {
            text: format_results(&out, 1500),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    async fn read_http_body(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut tmp = [0u8; 1024];
        loop {
            let n = stream.read(&mut tmp).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&tmp[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let header_end = pos + 4;
                let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
                let content_length = headers
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    })
                    .unwrap_or(0);
                let mut body = buf[header_end..].to_vec();
                while body.len() < content_length {
                    let m = stream.read(&mut tmp).await.unwrap();
                    if m == 0 {
                        break;
                    }
                    body.extend_from_slice(&tmp[..m]);
                }
                return String::from_utf8_lossy(&body[..content_length]).to_string();
            }
        }
        String::new()
    }

    async fn write_http_response(stream: &mut TcpStream, status: &str, body: &str) {
        let resp = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(resp.as_bytes()).await.unwrap();
    }

    /// **Scenario**: build_body clamps numResults to the cap and carries the contents block.
    #[test]
    fn exa_search_params_build_body_clamps_num_results() {
        let params = ExaSearchParams {
            query: "rust".to_string(),
            num_results: 500,
            text_max_chars: 1234,
            request_highlights: true,
            highlights_max_chars: Some(456),
        };
        let body = params.build_body();
        assert_eq!(body["query"], "rust");
        assert_eq!(body["numResults"], NUM_RESULTS_CAP);
        assert_eq!(body["type"], "auto");
        assert_eq!(body["contents"]["text"]["maxCharacters"], 1234);
        assert_eq!(body["contents"]["highlights"]["maxCharacters"], 456);
    }

    /// **Scenario**: format_results prefers highlights, then summary, then text; empty input
    /// yields "No results.".
    #[test]
    fn format_results_covers_fallbacks() {
        let formatted = format_results(
            &json!({
                "results": [
                    {
                        "title": "T1",
                        "url": "https://a.com",
                        "highlights": ["line 1", "line 2"]
                    },
                    {
                        "title": "T2",
                        "url": "https://b.com",
                        "summary": "short summary"
                    },
                    {
                        "title": "T3",
                        "url": "https://c.com",
                        "text": "full text body"
                    }
                ]
            }),
            20,
        );
        assert!(formatted.contains("line 1"));
        assert!(formatted.contains("short summary"));
        assert!(formatted.contains("full text body"));

        assert_eq!(format_results(&json!({"results": []}), 20), "No results.");
    }

    /// **Scenario**: over-budget summaries and texts are cut on a char
    /// boundary, so multibyte content near the budget still formats.
    #[test]
    fn format_results_cuts_excerpts_on_char_boundaries() {
        assert_eq!(truncate_excerpt("short", 10), "short");
        assert_eq!(truncate_excerpt("aééé", 4), "aé...");

        // 1601 bytes; the 1500-byte budget lands inside a two-byte char.
        let summary = format!("a{}", "é".repeat(800));
        let formatted = format_results(
            &json!({
                "results": [{"title": "T", "url": "https://a.com", "summary": summary}]
            }),
            1500,
        );
        assert!(formatted.contains(&format!("a{}...", "é".repeat(749))));

        let text = format!("x{}", "ö".repeat(800));
        let formatted = format_results(
            &json!({
                "results": [{"title": "T", "url": "https://a.com", "text": text}]
            }),
            1500,
        );
        assert!(formatted.contains(&format!("x{}...", "ö".repeat(749))));
    }

    /// **Scenario**: list_tools returns one websearch tool; missing query and wrong name error.
    #[tokio::test]
    async fn web_search_tools_source_spec_and_input_errors() {
        let source = WebSearchToolsSource::new("k");
        let tools = source.list_tools().await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, TOOL_WEB_SEARCH);

        let err = source.call_tool(TOOL_WEB_SEARCH, json!({})).await.unwrap_err();
        assert!(err.to_string().to_lowercase().contains("missing query"));

        let err = source
            .call_tool("other_tool", json!({"query":"x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolSourceError::NotFound(_)));
    }

    /// **Scenario**: call_tool against an EXA_SEARCH_URL-overridden mock server formats
    /// success results and surfaces non-2xx responses as transport errors.
    #[tokio::test]
    async fn web_search_uses_overridden_url_for_success_and_error_paths() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            for _ in 0..2 {
                let (mut stream, _) = listener.accept().await.unwrap();
                let body = read_http_body(&mut stream).await;
                let req: serde_json::Value =
                    serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
                let query = req.get("query").and_then(|v| v.as_str()).unwrap_or("");
                match query {
                    "ok" => {
                        assert_eq!(req["numResults"], 3);
                        let out = json!({
                            "results":[{"title":"Web","url":"https://w","highlights":["h1"]}]
                        })
                        .to_string();
                        write_http_response(&mut stream, "200 OK", &out).await;
                    }
                    "err" => {
                        write_http_response(
                            &mut stream,
                            "500 Internal Server Error",
                            r#"{"error":"boom"}"#,
                        )
                        .await;
                    }
                    other => panic!("unexpected query: {}", other),
                }
            }
        });

        let old = std::env::var("EXA_SEARCH_URL").ok();
        std::env::set_var("EXA_SEARCH_URL", format!("http://{}", addr));

        let source = WebSearchToolsSource::new("k");
        let ok = source
            .call_tool(TOOL_WEB_SEARCH, json!({"query":"ok","numResults":50}))
            .await
            .unwrap();
        assert!(ok.text.contains("Web"));
        assert!(ok.text.contains("h1"));

        let err = source
            .call_tool(TOOL_WEB_SEARCH, json!({"query":"err"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Exa API error"));

        if let Some(v) = old {
            std::env::set_var("EXA_SEARCH_URL", v);
        } else {
            std::env::remove_var("EXA_SEARCH_URL");
        }
        server.await.unwrap();
    }
}

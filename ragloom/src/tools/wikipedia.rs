use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::r#trait::Tool;

use super::{query_arg, query_schema};

/// Tool name for the general-knowledge lookup.
pub const TOOL_WIKIPEDIA: &str = "wikipedia";

/// Most pages summarized per lookup.
pub const WIKIPEDIA_MAX_RESULTS: usize = 3;

/// Result text is cut to this many characters.
pub const WIKIPEDIA_MAX_CHARS: usize = 4000;

/// Result text when the search matches no page.
pub const NO_WIKIPEDIA_RESULT: &str = "No good Wikipedia Search Result was found";

const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    /// Search rank (1 = best).
    #[serde(default)]
    index: u32,
    #[serde(default)]
    extract: String,
}

/// General-knowledge tool: top Wikipedia pages for a query with their intro summaries.
///
/// Uses the MediaWiki search generator with plain-text intro extracts in one request.
pub struct WikipediaTool {
    client: reqwest::Client,
    base_url: String,
}

impl Default for WikipediaTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WikipediaTool {
    /// Tool against English Wikipedia.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Tool against another MediaWiki host (e.g. a local test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ragloom/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn format_pages(mut pages: Vec<Page>) -> String {
        pages.sort_by_key(|p| p.index);
        let text = pages
            .into_iter()
            .take(WIKIPEDIA_MAX_RESULTS)
            .filter(|p| !p.extract.trim().is_empty())
            .map(|p| format!("Page: {}\nSummary: {}", p.title, p.extract.trim()))
            .collect::<Vec<_>>()
            .join("\n\n");
        if text.is_empty() {
            return NO_WIKIPEDIA_RESULT.to_string();
        }
        text.chars().take(WIKIPEDIA_MAX_CHARS).collect()
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        TOOL_WIKIPEDIA
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_WIKIPEDIA.to_string(),
            description: Some("Search Wikipedia for general knowledge.".to_string()),
            input_schema: query_schema("Search terms for a Wikipedia lookup."),
        }
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let query = query_arg(&args)?;
        let limit = WIKIPEDIA_MAX_RESULTS.to_string();
        let url = format!("{}/w/api.php", self.base_url);
        tracing::debug!(tool = TOOL_WIKIPEDIA, query, "wikipedia lookup");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("generator", "search"),
                ("gsrsearch", query),
                ("gsrlimit", limit.as_str()),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
            ])
            .send()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("wikipedia request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolSourceError::Transport(format!(
                "wikipedia returned HTTP {}",
                status
            )));
        }
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("wikipedia response: {}", e)))?;

        let pages = body.query.map(|q| q.pages).unwrap_or_default();
        Ok(ToolCallContent {
            text: Self::format_pages(pages),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    async fn read_request_line(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut tmp = [0u8; 1024];
        loop {
            let n = stream.read(&mut tmp).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&tmp[..n]);
            if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        String::from_utf8_lossy(&buf)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
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

    async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let line = read_request_line(&mut stream).await;
            write_http_response(&mut stream, status, &body).await;
            line
        });
        (format!("http://{}", addr), server)
    }

    /// **Scenario**: Pages are ordered by search rank and capped at three.
    #[tokio::test]
    async fn call_formats_top_three_pages() {
        let body = serde_json::json!({
            "query": {"pages": [
                {"pageid": 4, "title": "D", "index": 4, "extract": "fourth"},
                {"pageid": 2, "title": "B", "index": 2, "extract": "second"},
                {"pageid": 1, "title": "A", "index": 1, "extract": "first"},
                {"pageid": 3, "title": "C", "index": 3, "extract": "third"}
            ]}
        })
        .to_string();
        let (base, server) = serve_once("200 OK", body).await;
        let tool = WikipediaTool::with_base_url(base);
        let out = tool
            .call(serde_json::json!({"query": "Rust language"}))
            .await
            .unwrap();
        assert_eq!(
            out.text,
            "Page: A\nSummary: first\n\nPage: B\nSummary: second\n\nPage: C\nSummary: third"
        );
        let line = server.await.unwrap();
        assert!(line.starts_with("GET /w/api.php?"), "{}", line);
        assert!(line.contains("gsrsearch=Rust+language"), "{}", line);
        assert!(line.contains("gsrlimit=3"), "{}", line);
    }

    /// **Scenario**: A search with no pages returns the fixed no-result text.
    #[tokio::test]
    async fn call_without_pages_returns_no_result_text() {
        let (base, server) = serve_once("200 OK", r#"{"batchcomplete":true}"#.to_string()).await;
        let out = WikipediaTool::with_base_url(base)
            .call(serde_json::json!({"query": "zzzz"}))
            .await
            .unwrap();
        assert_eq!(out.text, NO_WIKIPEDIA_RESULT);
        server.await.unwrap();
    }

    /// **Scenario**: HTTP errors become transport errors.
    #[tokio::test]
    async fn call_maps_http_error_to_transport() {
        let (base, server) = serve_once("503 Service Unavailable", "{}".to_string()).await;
        let err = WikipediaTool::with_base_url(base)
            .call(serde_json::json!({"query": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolSourceError::Transport(m) if m.contains("503")));
        server.await.unwrap();
    }

    #[test]
    fn long_results_are_truncated() {
        let pages = vec![Page {
            title: "Long".into(),
            index: 1,
            extract: "x".repeat(WIKIPEDIA_MAX_CHARS * 2),
        }];
        assert_eq!(
            WikipediaTool::format_pages(pages).chars().count(),
            WIKIPEDIA_MAX_CHARS
        );
    }

    #[tokio::test]
    #[ignore = "Requires network access to en.wikipedia.org"]
    async fn live_lookup_returns_pages() {
        let out = WikipediaTool::new()
            .call(serde_json::json!({"query": "Rust programming language"}))
            .await
            .unwrap();
        assert!(out.text.starts_with("Page: "), "{}", out.text);
    }
}

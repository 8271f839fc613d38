//! Source loading: web pages via reqwest, `.txt` files and directories from disk.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::state::{METADATA_SOURCE, METADATA_TITLE};

use super::{has_txt_extension, Document, IngestError, SourceKind};

static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static RE_INVISIBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>|<noscript\b[^>]*>.*?</noscript>|<head\b[^>]*>.*?</head>|<!--.*?-->")
        .expect("valid invisible-block regex")
});
static RE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(p|div|br|li|ul|ol|h[1-6]|tr|table|section|article|header|footer|pre|blockquote)\b[^>]*>")
        .expect("valid block-tag regex")
});
static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\r\f\v]+").expect("valid space regex"));

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Text of the page's `<title>`, whitespace-collapsed; `None` when absent or empty.
pub fn html_title(html: &str) -> Option<String> {
    let raw = RE_TITLE.captures(html)?.get(1)?.as_str();
    let title = RE_SPACES
        .replace_all(&decode_entities(raw), " ")
        .trim()
        .to_string();
    (!title.is_empty()).then_some(title)
}

/// Visible text of an HTML page: scripts, styles and `<head>` dropped, block
/// elements become line breaks, runs of blank lines collapse to one.
pub fn html_to_text(html: &str) -> String {
    let text = RE_INVISIBLE.replace_all(html, " ");
    let text = RE_BLOCK.replace_all(&text, "\n");
    let text = RE_TAG.replace_all(&text, " ");
    let text = decode_entities(&text);

    let mut out: Vec<String> = Vec::new();
    let mut blank = false;
    for line in text.lines() {
        let line = RE_SPACES.replace_all(line, " ").trim().to_string();
        if line.is_empty() {
            if !out.is_empty() && !blank {
                out.push(String::new());
            }
            blank = true;
        } else {
            out.push(line);
            blank = false;
        }
    }
    while out.last().map(String::is_empty).unwrap_or(false) {
        out.pop();
    }
    out.join("\n")
}

/// Loads sources into [`Document`]s, in source order.
pub struct DocumentLoader {
    client: reqwest::Client,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ragloom/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Loads every source. The first unsupported or unreadable source fails the whole load.
    pub async fn load(&self, sources: &[String]) -> Result<Vec<Document>, IngestError> {
        let mut docs = Vec::new();
        for source in sources {
            let kind = SourceKind::classify(source)?;
            tracing::debug!(source = %source, kind = ?kind, "loading source");
            match kind {
                SourceKind::Url(url) => docs.push(self.load_url(&url).await?),
                SourceKind::TextFile(path) => docs.push(load_text_file(&path).await?),
                SourceKind::Directory(dir) => docs.extend(load_text_dir(&dir).await?),
            }
        }
        tracing::info!(sources = sources.len(), documents = docs.len(), "sources loaded");
        Ok(docs)
    }

    /// Fetches a web page and reduces it to text; `title` comes from `<title>`.
    pub async fn load_url(&self, url: &str) -> Result<Document, IngestError> {
        let fetch_err = |message: String| IngestError::Fetch {
            url: url.to_string(),
            message,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {}", status)));
        }
        let html = response.text().await.map_err(|e| fetch_err(e.to_string()))?;

        let mut metadata = BTreeMap::new();
        metadata.insert(METADATA_SOURCE.to_string(), url.to_string());
        if let Some(title) = html_title(&html) {
            metadata.insert(METADATA_TITLE.to_string(), title);
        }
        Ok(Document {
            content: html_to_text(&html),
            metadata,
        })
    }
}

async fn load_text_file(path: &Path) -> Result<Document, IngestError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let mut metadata = BTreeMap::new();
    metadata.insert(METADATA_SOURCE.to_string(), path.display().to_string());
    Ok(Document { content, metadata })
}

/// Every `.txt` file directly inside `dir`, sorted by file name.
async fn load_text_dir(dir: &Path) -> Result<Vec<Document>, IngestError> {
    let io_err = |source| IngestError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        if path.is_file() && has_txt_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        docs.push(load_text_file(&path).await?);
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const PAGE: &str = "<html><head><title> LLM Powered  Agents </title><style>p{}</style></head>\
        <body><script>var x = 1;</script><h1>Agents</h1><p>Planning &amp; memory.</p>\
        <!-- note --><div>Tool <b>use</b></div></body></html>";

    #[test]
    fn html_title_and_text() {
        assert_eq!(html_title(PAGE).as_deref(), Some("LLM Powered Agents"));
        assert_eq!(html_to_text(PAGE), "Agents\n\nPlanning & memory.\n\nTool use");
        assert_eq!(html_title("<p>no title</p>"), None);
    }

    /// **Scenario**: Directory load reads only .txt files, sorted, non-recursive.
    #[tokio::test]
    async fn load_directory_reads_sorted_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "second").unwrap();
        std::fs::write(dir.path().join("a.txt"), "first").unwrap();
        std::fs::write(dir.path().join("skip.md"), "nope").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.txt"), "deep").unwrap();

        let docs = DocumentLoader::new()
            .load(&[dir.path().display().to_string()])
            .await
            .unwrap();
        let contents: Vec<&str> = docs.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert!(docs[0].metadata[METADATA_SOURCE].ends_with("a.txt"));
    }

    /// **Scenario**: An unsupported source fails the whole load.
    #[tokio::test]
    async fn load_fails_on_unsupported_source() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("ok.txt");
        std::fs::write(&txt, "fine").unwrap();
        let err = DocumentLoader::new()
            .load(&[txt.display().to_string(), "report.pdf".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedSource(s) if s == "report.pdf"));
    }

    /// **Scenario**: A URL is fetched, reduced to text, and tagged with source and title.
    #[tokio::test]
    async fn load_url_from_local_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf).await.unwrap();
            let resp = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{}",
                PAGE.len(),
                PAGE
            );
            stream.write_all(resp.as_bytes()).await.unwrap();
        });

        let url = format!("http://{}/posts/agents/", addr);
        let docs = DocumentLoader::new().load(&[url.clone()]).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata[METADATA_SOURCE], url);
        assert_eq!(docs[0].metadata[METADATA_TITLE], "LLM Powered Agents");
        assert!(docs[0].content.contains("Planning & memory."));
        server.await.unwrap();
    }
}

//! Plain-text rendering of answers for the terminal.

use ragloom::Chunk;

use crate::AskResult;

/// Source chunks printed under an answer.
pub const SOURCES_SHOWN: usize = 3;

/// Characters of each source chunk printed.
pub const SOURCE_PREVIEW_CHARS: usize = 300;

/// Truncates `s` to at most `max` chars; appends "..." when truncated. UTF-8 safe.
pub fn truncate_display(s: &str, max: usize) -> String {
    const SUFFIX: &str = "...";
    let suffix_len = 3;
    if max <= suffix_len {
        return s.chars().take(max).collect();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    format!(
        "{}{}",
        s.chars().take(max - suffix_len).collect::<String>(),
        SUFFIX
    )
}

fn format_source(i: usize, chunk: &Chunk) -> String {
    let label = chunk.label().unwrap_or("untitled");
    format!(
        "Document {} ({})\n{}",
        i,
        label,
        truncate_display(chunk.content.trim(), SOURCE_PREVIEW_CHARS)
    )
}

/// Answer, then up to three source previews, then the elapsed time.
///
/// With no retrieved chunks the sources block says so instead of being empty.
pub fn render_answer(result: &AskResult) -> String {
    let mut out = format!("Answer\n{}\n", result.answer.trim_end());
    if result.retrieved_chunks.is_empty() {
        out.push_str("\nNo relevant source documents were retrieved.\n");
    } else {
        out.push_str("\nSource Documents\n");
        for (i, chunk) in result
            .retrieved_chunks
            .iter()
            .take(SOURCES_SHOWN)
            .enumerate()
        {
            out.push_str(&format_source(i + 1, chunk));
            out.push('\n');
        }
    }
    out.push_str(&format!(
        "\nResponse time: {:.2} seconds",
        result.elapsed.as_secs_f64()
    ));
    out
}

/// Startup line after a successful initialization.
pub fn render_ready(num_chunks: usize) -> String {
    format!("System ready! ({} document chunks loaded)", num_chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn result(chunks: Vec<Chunk>) -> AskResult {
        AskResult {
            question: "q".into(),
            answer: "Paris.".into(),
            retrieved_chunks: chunks,
            elapsed: Duration::from_millis(1234),
        }
    }

    #[test]
    fn truncate_display_limits() {
        assert_eq!(truncate_display("hello", 10), "hello");
        let cut = truncate_display(&"é".repeat(400), 300);
        assert_eq!(cut.chars().count(), 300);
        assert!(cut.ends_with("..."));
    }

    /// **Scenario**: At most three sources are shown, each cut to 300 characters.
    #[test]
    fn render_answer_with_sources() {
        let chunks = (1..=5)
            .map(|i| Chunk::new("y".repeat(400)).with_metadata("title", format!("T{}", i)))
            .collect();
        let text = render_answer(&result(chunks));
        assert!(text.starts_with("Answer\nParis.\n"));
        assert!(text.contains("Document 3 (T3)"));
        assert!(!text.contains("Document 4"));
        assert!(text.contains(&format!("{}...", "y".repeat(297))));
        assert!(text.ends_with("Response time: 1.23 seconds"));
    }

    /// **Scenario**: No chunks is reported as such, not as an error.
    #[test]
    fn render_answer_without_sources() {
        let text = render_answer(&result(vec![]));
        assert!(text.contains("No relevant source documents were retrieved."));
        assert!(!text.to_lowercase().contains("error"));
    }

    #[test]
    fn ready_line_reports_chunk_count() {
        assert_eq!(render_ready(42), "System ready! (42 document chunks loaded)");
    }
}

//! Searches made in this session, most recent last.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::display::truncate_display;
use crate::AskResult;

/// Number of recent searches shown after each answer.
pub const HISTORY_SHOWN: usize = 3;

/// Answer length kept for display in the history list.
const HISTORY_ANSWER_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    pub elapsed: Duration,
    pub asked_at: DateTime<Local>,
}

#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: &AskResult) {
        self.entries.push(HistoryEntry {
            question: result.question.clone(),
            answer: result.answer.clone(),
            elapsed: result.elapsed,
            asked_at: Local::now(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `n` entries, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev().take(n)
    }

    /// "Recent Searches" block: newest first, answers cut to 200 characters.
    pub fn render(&self) -> String {
        let mut out = String::from("Recent Searches");
        for entry in self.recent(HISTORY_SHOWN) {
            out.push_str(&format!(
                "\n  Q: {}\n  A: {}\n  Time: {:.2}s ({})\n",
                entry.question,
                truncate_display(&entry.answer, HISTORY_ANSWER_CHARS),
                entry.elapsed.as_secs_f64(),
                entry.asked_at.format("%H:%M:%S"),
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(q: &str, answer: &str) -> AskResult {
        AskResult {
            question: q.into(),
            answer: answer.into(),
            retrieved_chunks: vec![],
            elapsed: Duration::from_millis(250),
        }
    }

    /// **Scenario**: Only the three newest searches are listed, newest first.
    #[test]
    fn render_shows_three_newest() {
        let mut h = History::new();
        for i in 1..=5 {
            h.push(&result(&format!("q{}", i), "a"));
        }
        assert_eq!(h.len(), 5);
        let questions: Vec<&str> = h.recent(HISTORY_SHOWN).map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["q5", "q4", "q3"]);

        let text = h.render();
        assert!(text.contains("Q: q5") && text.contains("Q: q3"));
        assert!(!text.contains("Q: q2"));
        assert!(text.contains("Time: 0.25s"));
    }

    #[test]
    fn long_answers_are_cut() {
        let mut h = History::new();
        h.push(&result("q", &"x".repeat(500)));
        let line = h
            .render()
            .lines()
            .find(|l| l.trim_start().starts_with("A: "))
            .unwrap()
            .to_string();
        assert_eq!(line.trim_start().trim_start_matches("A: ").chars().count(), 200);
    }
}

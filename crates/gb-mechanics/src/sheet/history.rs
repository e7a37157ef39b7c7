//! Bounded decision history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of history entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// One recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Page the decision was made on.
    pub page_number: u32,
    /// The tail of the page text.
    pub page_text_excerpt: String,
    /// Label of the choice that was made.
    pub choice_made: String,
    /// 1-based index of the choice in the page's list, if it came from it.
    pub choice_index: Option<usize>,
    /// What happened when the choice was carried out.
    pub outcome: Option<String>,
}

/// An append-only history that evicts its oldest entries past `limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// An empty history keeping at most `limit` entries (at least one).
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Maximum number of entries kept.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Append an entry, evicting the oldest ones beyond the limit.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The newest entry.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Keep the last `max_chars` characters of `text`, starting at a word.
///
/// Shorter text is returned unchanged; truncated text gets a leading `...`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }
    let tail: String = text.chars().skip(total - max_chars).collect();
    let trimmed = match tail.find(' ') {
        Some(pos) if pos > 0 && pos + 1 < tail.len() => &tail[pos + 1..],
        _ => tail.as_str(),
    };
    format!("...{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(page: u32) -> HistoryEntry {
        HistoryEntry {
            page_number: page,
            page_text_excerpt: format!("page {page}"),
            choice_made: "go on".to_string(),
            choice_index: Some(1),
            outcome: None,
        }
    }

    #[test]
    fn evicts_oldest() {
        let mut history = History::with_limit(3);
        for page in 1..=5 {
            history.push(entry(page));
        }
        assert_eq!(history.len(), 3);
        let pages: Vec<u32> = history.iter().map(|e| e.page_number).collect();
        assert_eq!(pages, vec![3, 4, 5]);
        assert_eq!(history.last().map(|e| e.page_number), Some(5));
    }

    #[test]
    fn zero_limit_keeps_one() {
        let mut history = History::with_limit(0);
        history.push(entry(1));
        history.push(entry(2));
        assert_eq!(history.limit(), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn default_limit() {
        assert_eq!(History::default().limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn excerpt_short_text_unchanged() {
        assert_eq!(excerpt("a short page", 200), "a short page");
    }

    #[test]
    fn excerpt_keeps_whole_words() {
        let text = "alpha beta gamma delta";
        assert_eq!(excerpt(text, 9), "...delta");
    }

    #[test]
    fn excerpt_counts_chars_not_bytes() {
        let text = "ação ação ação ação";
        let out = excerpt(text, 9);
        assert!(out.starts_with("..."));
        assert!(out.ends_with("ação"));
    }
}

//! Journal storage and export.

use serde::{Deserialize, Serialize};

use super::entry::JournalEntry;

/// A chronological log of session events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the journal.
    pub fn append(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    /// Get all entries.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of completed turns recorded.
    pub fn turns(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, JournalEntry::Turn { .. }))
            .count()
    }

    /// Export the journal as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Gamebook Session Journal\n\n");
        for entry in &self.entries {
            match entry {
                JournalEntry::SessionStart {
                    character,
                    player,
                    seed,
                    start_page,
                    timestamp,
                } => {
                    out.push_str(&format!("**Started** {}\n\n", timestamp.format("%Y-%m-%d %H:%M:%S UTC")));
                    out.push_str(&format!("- Character: {character}\n"));
                    out.push_str(&format!("- Player: {player}\n"));
                    out.push_str(&format!("- Seed: {seed}\n"));
                    out.push_str(&format!("- Start page: {start_page}\n\n"));
                }
                JournalEntry::Turn {
                    turn,
                    page,
                    choice,
                    rationale,
                    roll,
                    outcome,
                    next_page,
                    ..
                } => {
                    out.push_str(&format!("## Turn {turn}: page {page}\n\n"));
                    out.push_str(&format!("**Choice**: {choice} *({rationale})*\n"));
                    if let Some(roll) = roll {
                        out.push_str(&format!("**Roll**: {roll}\n"));
                    }
                    out.push_str(&format!("**Outcome**: {outcome}\n"));
                    out.push_str(&format!("**Next**: {}\n\n", page_label(*next_page)));
                }
                JournalEntry::Rejection {
                    page,
                    reason,
                    streak,
                    ..
                } => {
                    out.push_str(&format!(
                        "> Rejected pick on page {page} ({streak} in a row): {reason}\n\n"
                    ));
                }
                JournalEntry::CircuitBreaker {
                    page, rejections, ..
                } => {
                    out.push_str(&format!(
                        "> **Circuit breaker** on page {page} after {rejections} rejected picks\n\n"
                    ));
                }
                JournalEntry::Termination {
                    reason,
                    page,
                    turns,
                    character,
                    ..
                } => {
                    out.push_str(&format!("## End: {reason}\n\n"));
                    out.push_str(&format!("Page {page} after {turns} turns.\n\n"));
                    out.push_str(&format!("{character}\n"));
                }
            }
        }
        out
    }

    /// Export the journal as plain text.
    pub fn export_text(&self) -> String {
        let mut out = String::from("Gamebook Session Journal\n========================\n\n");
        for entry in &self.entries {
            match entry {
                JournalEntry::SessionStart {
                    character,
                    player,
                    seed,
                    start_page,
                    ..
                } => {
                    out.push_str(&format!("Character: {character}\n"));
                    out.push_str(&format!("Player: {player}, seed {seed}, start page {start_page}\n\n"));
                }
                JournalEntry::Turn {
                    turn,
                    page,
                    choice,
                    roll,
                    outcome,
                    next_page,
                    ..
                } => {
                    out.push_str(&format!("[{turn}] Page {page}: {choice}\n"));
                    if let Some(roll) = roll {
                        out.push_str(&format!("  Roll: {roll}\n"));
                    }
                    out.push_str(&format!("  {outcome}\n"));
                    out.push_str(&format!("  -> {}\n\n", page_label(*next_page)));
                }
                JournalEntry::Rejection { page, reason, .. } => {
                    out.push_str(&format!("Rejected on page {page}: {reason}\n\n"));
                }
                JournalEntry::CircuitBreaker {
                    page, rejections, ..
                } => {
                    out.push_str(&format!(
                        "CIRCUIT BREAKER on page {page} after {rejections} rejected picks\n\n"
                    ));
                }
                JournalEntry::Termination {
                    reason,
                    page,
                    turns,
                    character,
                    ..
                } => {
                    out.push_str(&format!("--- End: {reason} (page {page}, {turns} turns) ---\n"));
                    out.push_str(&format!("{character}\n"));
                }
            }
        }
        out
    }
}

fn page_label(page: u32) -> String {
    if page == 0 {
        "the end".to_string()
    } else {
        format!("page {page}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn turn(turn: u32, roll: Option<&str>) -> JournalEntry {
        JournalEntry::Turn {
            turn,
            page: 4,
            choice: "Scramble across the rocks".to_string(),
            rationale: "scripted pick 1".to_string(),
            roll: roll.map(str::to_string),
            outcome: "You slip.".to_string(),
            next_page: 5,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn append_and_count() {
        let mut j = Journal::new();
        assert!(j.is_empty());
        j.append(turn(1, None));
        j.append(JournalEntry::Rejection {
            page: 5,
            reason: "requires occupation Nurse".to_string(),
            streak: 1,
            timestamp: Utc::now(),
        });
        assert_eq!(j.len(), 2);
        assert_eq!(j.turns(), 1);
    }

    #[test]
    fn export_markdown_turn() {
        let mut j = Journal::new();
        j.append(turn(3, Some("DEX: 45 vs 27/13 -> Failure")));
        let md = j.export_markdown();
        assert!(md.starts_with("# Gamebook Session Journal"));
        assert!(md.contains("## Turn 3: page 4"));
        assert!(md.contains("**Roll**: DEX: 45 vs 27/13 -> Failure"));
        assert!(md.contains("**Next**: page 5"));
    }

    #[test]
    fn export_text_circuit_breaker_and_end() {
        let mut j = Journal::new();
        j.append(JournalEntry::CircuitBreaker {
            page: 2,
            rejections: 3,
            timestamp: Utc::now(),
        });
        j.append(JournalEntry::Termination {
            reason: "circuit breaker".to_string(),
            page: 2,
            turns: 1,
            character: "Ana (Nurse) | Healthy".to_string(),
            timestamp: Utc::now(),
        });
        let txt = j.export_text();
        assert!(txt.contains("CIRCUIT BREAKER on page 2 after 3 rejected picks"));
        assert!(txt.contains("--- End: circuit breaker (page 2, 1 turns) ---"));
    }

    #[test]
    fn end_page_label() {
        let mut j = Journal::new();
        j.append(JournalEntry::Turn {
            turn: 1,
            page: 13,
            choice: "The end".to_string(),
            rationale: "resolver".to_string(),
            roll: None,
            outcome: String::new(),
            next_page: 0,
            timestamp: Utc::now(),
        });
        assert!(j.export_text().contains("-> the end"));
    }

    #[test]
    fn journal_serde_roundtrip() {
        let mut j = Journal::new();
        j.append(turn(1, None));
        let json = serde_json::to_string(&j).unwrap();
        let j2: Journal = serde_json::from_str(&json).unwrap();
        assert_eq!(j2.entries(), j.entries());
    }
}

//! Journal entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry in the session journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JournalEntry {
    /// The session began.
    SessionStart {
        /// One-line character summary.
        character: String,
        /// Who is deciding.
        player: String,
        /// Dice seed, for replaying the run.
        seed: u64,
        /// First page.
        start_page: u32,
        /// When the session started.
        timestamp: DateTime<Utc>,
    },
    /// One completed observe-decide-act-record cycle.
    Turn {
        /// Turn number, starting at 1.
        turn: u32,
        /// Page the decision was made on.
        page: u32,
        /// Label of the executed choice.
        choice: String,
        /// Why it was chosen.
        rationale: String,
        /// Roll summary, if dice were rolled.
        roll: Option<String>,
        /// What happened.
        outcome: String,
        /// Page the story moved to; 0 is the end.
        next_page: u32,
        /// When the turn finished.
        timestamp: DateTime<Utc>,
    },
    /// A pick that broke the rules.
    Rejection {
        /// Page the pick was made on.
        page: u32,
        /// Why it was refused.
        reason: String,
        /// Rejections in a row so far.
        streak: u32,
        /// When it was refused.
        timestamp: DateTime<Utc>,
    },
    /// Too many rejections in a row.
    CircuitBreaker {
        /// Page the session stopped on.
        page: u32,
        /// Rejections that tripped it.
        rejections: u32,
        /// When it tripped.
        timestamp: DateTime<Utc>,
    },
    /// The session ended.
    Termination {
        /// Why it ended.
        reason: String,
        /// Last page.
        page: u32,
        /// Completed turns.
        turns: u32,
        /// One-line character summary at the end.
        character: String,
        /// When it ended.
        timestamp: DateTime<Utc>,
    },
}

impl JournalEntry {
    /// When the entry was made.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::SessionStart { timestamp, .. }
            | Self::Turn { timestamp, .. }
            | Self::Rejection { timestamp, .. }
            | Self::CircuitBreaker { timestamp, .. }
            | Self::Termination { timestamp, .. } => *timestamp,
        }
    }
}

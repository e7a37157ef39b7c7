//! Temporary bonus and penalty dice on skills.

use serde::{Deserialize, Serialize};

/// Whether a modifier grants a bonus or a penalty die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    /// An extra tens die, keep the lower.
    BonusDice,
    /// An extra tens die, keep the higher.
    PenaltyDice,
}

impl std::fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BonusDice => write!(f, "bonus_dice"),
            Self::PenaltyDice => write!(f, "penalty_dice"),
        }
    }
}

/// A modifier attached to one skill for a number of rolls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    /// Skill the modifier applies to.
    pub skill: String,
    /// Bonus or penalty.
    #[serde(rename = "type")]
    pub kind: ModifierKind,
    /// Remaining qualifying rolls.
    pub duration: u32,
}

/// Which modifier kinds are active on a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveModifiers {
    /// At least one bonus modifier exists.
    pub bonus: bool,
    /// At least one penalty modifier exists.
    pub penalty: bool,
}

impl ActiveModifiers {
    /// A bonus applies only when no penalty cancels it.
    pub fn net_bonus(self) -> bool {
        self.bonus && !self.penalty
    }

    /// A penalty applies only when no bonus cancels it.
    pub fn net_penalty(self) -> bool {
        self.penalty && !self.bonus
    }

    /// Both kinds are present and cancel out.
    pub fn cancelled(self) -> bool {
        self.bonus && self.penalty
    }

    /// Neither kind is present.
    pub fn is_empty(self) -> bool {
        !self.bonus && !self.penalty
    }
}

/// The ordered collection of active modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Modifiers {
    entries: Vec<Modifier>,
}

impl Modifiers {
    /// Append a modifier. Zero durations are raised to one.
    pub fn add(&mut self, skill: impl Into<String>, kind: ModifierKind, duration: u32) {
        self.entries.push(Modifier {
            skill: skill.into(),
            kind,
            duration: duration.max(1),
        });
    }

    /// Which kinds are active for `skill`.
    pub fn active_for(&self, skill: &str) -> ActiveModifiers {
        let mut active = ActiveModifiers::default();
        for m in self.entries.iter().filter(|m| m.skill == skill) {
            match m.kind {
                ModifierKind::BonusDice => active.bonus = true,
                ModifierKind::PenaltyDice => active.penalty = true,
            }
        }
        active
    }

    /// Use up one roll of the first modifier of `kind` on `skill`.
    ///
    /// Returns the remaining duration (0 when the entry was removed), or
    /// `None` if no such modifier exists.
    pub fn reduce(&mut self, skill: &str, kind: ModifierKind) -> Option<u32> {
        let pos = self
            .entries
            .iter()
            .position(|m| m.skill == skill && m.kind == kind)?;
        let entry = &mut self.entries[pos];
        entry.duration = entry.duration.saturating_sub(1);
        let remaining = entry.duration;
        if remaining == 0 {
            self.entries.remove(pos);
        }
        Some(remaining)
    }

    /// Consume one roll of every kind active on `skill`.
    ///
    /// Cancelled pairs are consumed too: each entry runs out on its own.
    pub fn consume(&mut self, skill: &str) -> ActiveModifiers {
        let active = self.active_for(skill);
        if active.bonus {
            self.reduce(skill, ModifierKind::BonusDice);
        }
        if active.penalty {
            self.reduce(skill, ModifierKind::PenaltyDice);
        }
        active
    }

    /// Remove modifiers for one skill, or all of them. Returns how many went.
    pub fn clear(&mut self, skill: Option<&str>) -> usize {
        let before = self.entries.len();
        match skill {
            Some(name) => self.entries.retain(|m| m.skill != name),
            None => self.entries.clear(),
        }
        before - self.entries.len()
    }

    /// All modifiers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.entries.iter()
    }

    /// Number of modifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no modifiers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

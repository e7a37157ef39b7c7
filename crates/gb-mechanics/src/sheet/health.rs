//! Damage levels.

use serde::{Deserialize, Serialize};

/// The five damage labels, indexed by `min(damage_taken, 4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageLevel {
    /// No damage.
    Healthy,
    /// One point of damage.
    Hurt,
    /// Two points.
    Bloodied,
    /// Three points.
    Down,
    /// Four or more. The character is out of the story.
    Impaired,
}

impl DamageLevel {
    /// All levels in order of increasing damage.
    pub const ALL: [DamageLevel; 5] = [
        Self::Healthy,
        Self::Hurt,
        Self::Bloodied,
        Self::Down,
        Self::Impaired,
    ];

    /// The level for a damage total.
    pub fn from_damage(damage_taken: u32) -> Self {
        let index = damage_taken.min(4) as usize;
        Self::ALL[index]
    }

    /// Whether this is the terminal label.
    pub fn is_terminal(self) -> bool {
        self == Self::Impaired
    }
}

impl std::fmt::Display for DamageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Healthy => "Healthy",
            Self::Hurt => "Hurt",
            Self::Bloodied => "Bloodied",
            Self::Down => "Down",
            Self::Impaired => "Impaired",
        };
        f.write_str(label)
    }
}

/// What a point of damage did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DamageReport {
    /// Damage applied.
    pub amount: u32,
    /// Total damage afterwards.
    pub damage_taken: u32,
    /// Level before the damage.
    pub old_level: DamageLevel,
    /// Level after the damage.
    pub new_level: DamageLevel,
    /// True if this damage moved the character from alive to impaired.
    pub died: bool,
}

/// What healing did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealReport {
    /// Amount asked for.
    pub requested: u32,
    /// Amount actually healed.
    pub healed: u32,
    /// Total damage afterwards.
    pub damage_taken: u32,
    /// True when no damage remains.
    pub fully_healed: bool,
}

/// The damage counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Health {
    damage_taken: u32,
}

impl Health {
    /// Total damage taken.
    pub fn damage_taken(&self) -> u32 {
        self.damage_taken
    }

    /// The current damage label.
    pub fn level(&self) -> DamageLevel {
        DamageLevel::from_damage(self.damage_taken)
    }

    /// Whether the character is still in the story.
    pub fn is_alive(&self) -> bool {
        !self.level().is_terminal()
    }

    /// Add damage.
    pub fn take(&mut self, amount: u32) -> DamageReport {
        let old_level = self.level();
        self.damage_taken = self.damage_taken.saturating_add(amount);
        let new_level = self.level();
        DamageReport {
            amount,
            damage_taken: self.damage_taken,
            old_level,
            new_level,
            died: !old_level.is_terminal() && new_level.is_terminal(),
        }
    }

    /// Remove damage, never going below zero.
    pub fn heal(&mut self, amount: u32) -> HealReport {
        let healed = amount.min(self.damage_taken);
        self.damage_taken -= healed;
        HealReport {
            requested: amount,
            healed,
            damage_taken: self.damage_taken,
            fully_healed: self.damage_taken == 0,
        }
    }
}

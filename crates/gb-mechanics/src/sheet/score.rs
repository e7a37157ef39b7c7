//! Full/half scores for characteristics and skills.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dice::Target;
use crate::error::MechError;

/// A percentile score whose half value always equals `full / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    full: u32,
    half: u32,
}

impl Score {
    /// Create a score; the half value is derived.
    pub fn new(full: u32) -> Self {
        Self {
            full,
            half: full / 2,
        }
    }

    /// The full value.
    pub fn full(self) -> u32 {
        self.full
    }

    /// The half value.
    pub fn half(self) -> u32 {
        self.half
    }

    /// Overwrite the full value and recompute the half value.
    pub fn set(&mut self, full: u32) {
        *self = Self::new(full);
    }

    /// The thresholds a roll against this score uses.
    pub fn target(self) -> Target {
        Target {
            full: self.full,
            half: self.half,
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.full, self.half)
    }
}

/// The five characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    /// Strength.
    #[serde(rename = "STR")]
    Str,
    /// Constitution.
    #[serde(rename = "CON")]
    Con,
    /// Dexterity.
    #[serde(rename = "DEX")]
    Dex,
    /// Intelligence.
    #[serde(rename = "INT")]
    Int,
    /// Power.
    #[serde(rename = "POW")]
    Pow,
}

impl Characteristic {
    /// All characteristics in sheet order.
    pub const ALL: [Characteristic; 5] = [Self::Str, Self::Con, Self::Dex, Self::Int, Self::Pow];

    /// The short upper-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Str => "STR",
            Self::Con => "CON",
            Self::Dex => "DEX",
            Self::Int => "INT",
            Self::Pow => "POW",
        }
    }
}

impl FromStr for Characteristic {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MechError::UnknownCharacteristic(s.to_string()))
    }
}

impl std::fmt::Display for Characteristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three skill categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    /// Everyday skills.
    #[default]
    Common,
    /// Fighting and firearms.
    Combat,
    /// Specialist knowledge.
    Expert,
}

impl SkillCategory {
    /// Categories in the order skill lookups search them.
    pub const ALL: [SkillCategory; 3] = [Self::Common, Self::Combat, Self::Expert];

    /// The lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Combat => "combat",
            Self::Expert => "expert",
        }
    }
}

impl FromStr for SkillCategory {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MechError::UnknownSkillCategory(s.to_string()))
    }
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_is_derived() {
        let score = Score::new(65);
        assert_eq!(score.full(), 65);
        assert_eq!(score.half(), 32);
    }

    #[test]
    fn set_recomputes_half() {
        let mut score = Score::new(40);
        score.set(71);
        assert_eq!(score.half(), 35);
    }

    #[test]
    fn characteristic_parse() {
        assert_eq!("pow".parse::<Characteristic>().unwrap(), Characteristic::Pow);
        assert_eq!(" STR ".parse::<Characteristic>().unwrap(), Characteristic::Str);
        assert!("LUCK".parse::<Characteristic>().is_err());
    }

    #[test]
    fn category_parse_and_display() {
        assert_eq!(
            "Expert".parse::<SkillCategory>().unwrap(),
            SkillCategory::Expert
        );
        assert!("arcane".parse::<SkillCategory>().is_err());
        assert_eq!(SkillCategory::Combat.to_string(), "combat");
    }
}

//! Occupations and their starting presets.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::score::{Characteristic, SkillCategory};
use crate::error::MechError;

/// The occupations a character can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupation {
    /// Police Officer.
    #[serde(rename = "Police Officer")]
    PoliceOfficer,
    /// Social Worker.
    #[serde(rename = "Social Worker")]
    SocialWorker,
    /// Nurse.
    #[serde(rename = "Nurse")]
    Nurse,
}

impl Occupation {
    /// Every occupation.
    pub const ALL: [Occupation; 3] = [Self::PoliceOfficer, Self::SocialWorker, Self::Nurse];

    /// The name content uses for this occupation.
    pub fn name(self) -> &'static str {
        match self {
            Self::PoliceOfficer => "Police Officer",
            Self::SocialWorker => "Social Worker",
            Self::Nurse => "Nurse",
        }
    }

    /// Starting characteristics and skills for this occupation.
    pub fn preset(self) -> &'static Preset {
        match self {
            Self::PoliceOfficer => &POLICE_OFFICER,
            Self::SocialWorker => &SOCIAL_WORKER,
            Self::Nurse => &NURSE,
        }
    }
}

impl FromStr for Occupation {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MechError::UnknownOccupation(s.to_string()))
    }
}

impl std::fmt::Display for Occupation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Starting values applied when an occupation is set.
#[derive(Debug)]
pub struct Preset {
    /// STR, CON, DEX, INT, POW.
    pub characteristics: [(Characteristic, u32); 5],
    /// Skills raised above their base value.
    pub skills: &'static [(SkillCategory, &'static str, u32)],
}

impl Preset {
    /// The POW value, which also sets starting magic points.
    pub fn pow(&self) -> u32 {
        self.characteristics
            .iter()
            .find(|(c, _)| *c == Characteristic::Pow)
            .map_or(0, |&(_, v)| v)
    }
}

/// Base value of every listed skill before presets.
pub const BASE_SKILL: u32 = 30;

/// Skills every character starts with.
pub const BASE_SKILLS: &[(SkillCategory, &str)] = &[
    (SkillCategory::Common, "Athletics"),
    (SkillCategory::Common, "Drive"),
    (SkillCategory::Common, "Navigate"),
    (SkillCategory::Common, "Observation"),
    (SkillCategory::Common, "Read Person"),
    (SkillCategory::Common, "Research"),
    (SkillCategory::Common, "Social"),
    (SkillCategory::Common, "Stealth"),
    (SkillCategory::Combat, "Fighting"),
    (SkillCategory::Combat, "Firearms"),
];

/// Preset for characters without an occupation.
pub static GENERIC: Preset = Preset {
    characteristics: [
        (Characteristic::Str, 55),
        (Characteristic::Con, 55),
        (Characteristic::Dex, 55),
        (Characteristic::Int, 55),
        (Characteristic::Pow, 55),
    ],
    skills: &[],
};

static POLICE_OFFICER: Preset = Preset {
    characteristics: [
        (Characteristic::Str, 65),
        (Characteristic::Con, 60),
        (Characteristic::Dex, 55),
        (Characteristic::Int, 55),
        (Characteristic::Pow, 60),
    ],
    skills: &[
        (SkillCategory::Common, "Athletics", 60),
        (SkillCategory::Common, "Drive", 60),
        (SkillCategory::Common, "Social", 60),
        (SkillCategory::Combat, "Fighting", 60),
        (SkillCategory::Combat, "Firearms", 60),
        (SkillCategory::Expert, "Law", 60),
        (SkillCategory::Expert, "Magic", 60),
    ],
};

static SOCIAL_WORKER: Preset = Preset {
    characteristics: [
        (Characteristic::Str, 50),
        (Characteristic::Con, 55),
        (Characteristic::Dex, 50),
        (Characteristic::Int, 70),
        (Characteristic::Pow, 65),
    ],
    skills: &[
        (SkillCategory::Common, "Observation", 60),
        (SkillCategory::Common, "Research", 60),
        (SkillCategory::Common, "Social", 70),
        (SkillCategory::Expert, "Magic", 60),
    ],
};

static NURSE: Preset = Preset {
    characteristics: [
        (Characteristic::Str, 50),
        (Characteristic::Con, 60),
        (Characteristic::Dex, 60),
        (Characteristic::Int, 65),
        (Characteristic::Pow, 60),
    ],
    skills: &[
        (SkillCategory::Common, "Observation", 70),
        (SkillCategory::Common, "Read Person", 60),
        (SkillCategory::Common, "Social", 60),
        (SkillCategory::Expert, "Medicine", 70),
        (SkillCategory::Expert, "Magic", 60),
    ],
};

//! Success tiers and their thresholds.
//!
//! Tier numbers are ordinal: 5 Critical, 4 Hard Success, 3 Success,
//! 2 Failure, 1 Fumble. Opposed rolls compare these numbers directly, so
//! the derived ordering follows them.

use serde::{Deserialize, Serialize};

/// How well a d100 roll did against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SuccessTier {
    /// A roll of 100.
    Fumble = 1,
    /// Above the full threshold.
    Failure = 2,
    /// At or under the full threshold.
    Success = 3,
    /// At or under the half threshold.
    Hard = 4,
    /// A roll of 01.
    Critical = 5,
}

impl SuccessTier {
    /// All tiers from worst to best.
    pub const ALL: [SuccessTier; 5] = [
        Self::Fumble,
        Self::Failure,
        Self::Success,
        Self::Hard,
        Self::Critical,
    ];

    /// The tier number, 1 through 5.
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Look up a tier by number.
    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.get(usize::from(level).checked_sub(1)?).copied()
    }

    /// Whether the roll succeeded at all.
    pub fn is_success(self) -> bool {
        self >= Self::Success
    }

    /// Tiers strictly below this one, best first.
    pub fn lower(self) -> impl Iterator<Item = SuccessTier> {
        Self::ALL
            .into_iter()
            .rev()
            .filter(move |&tier| tier < self)
    }
}

impl std::fmt::Display for SuccessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fumble => write!(f, "Fumble"),
            Self::Failure => write!(f, "Failure"),
            Self::Success => write!(f, "Success"),
            Self::Hard => write!(f, "Hard Success"),
            Self::Critical => write!(f, "Critical Success"),
        }
    }
}

/// A full/half threshold pair that a roll is classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Regular success threshold.
    pub full: u32,
    /// Hard success threshold.
    pub half: u32,
}

impl Target {
    /// A target whose half threshold is `full / 2`.
    pub fn new(full: u32) -> Self {
        Self {
            full,
            half: full / 2,
        }
    }

    /// Thresholds for a hard check: the half value becomes the target.
    pub fn hard(self) -> Self {
        Self::new(self.half)
    }

    /// Classify a roll against these thresholds.
    pub fn classify(self, roll: u32) -> SuccessTier {
        classify(roll, self.full, self.half)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.full, self.half)
    }
}

/// Classify a d100 roll against a full/half target pair.
///
/// 01 is always Critical and 100 always a Fumble, whatever the targets.
pub fn classify(roll: u32, target_full: u32, target_half: u32) -> SuccessTier {
    match roll {
        1 => SuccessTier::Critical,
        100 => SuccessTier::Fumble,
        r if r <= target_half => SuccessTier::Hard,
        r if r <= target_full => SuccessTier::Success,
        _ => SuccessTier::Failure,
    }
}

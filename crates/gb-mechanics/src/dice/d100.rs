//! The d100 roll.

use serde::{Deserialize, Serialize};

use super::PercentileDice;

/// Which tens die a roll keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TensSelection {
    /// Keep the first tens die.
    #[default]
    Normal,
    /// Keep the lower tens die.
    Bonus,
    /// Keep the higher tens die.
    Penalty,
}

impl TensSelection {
    /// Combine bonus and penalty requests. Both together cancel out.
    pub fn from_flags(bonus: bool, penalty: bool) -> Self {
        match (bonus, penalty) {
            (true, false) => Self::Bonus,
            (false, true) => Self::Penalty,
            _ => Self::Normal,
        }
    }
}

impl std::fmt::Display for TensSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Bonus => write!(f, "bonus die"),
            Self::Penalty => write!(f, "penalty die"),
        }
    }
}

/// A single percentile roll together with the dice that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct D100Roll {
    /// Final value, 1 through 100.
    pub value: u32,
    /// Both tens dice, in draw order.
    pub tens: [u32; 2],
    /// The units die.
    pub units: u32,
    /// Which tens die was kept.
    pub selection: TensSelection,
}

impl D100Roll {
    /// Build a roll from already drawn faces.
    pub fn from_dice(tens: [u32; 2], units: u32, selection: TensSelection) -> Self {
        let kept = match selection {
            TensSelection::Normal => tens[0],
            TensSelection::Bonus => tens[0].min(tens[1]),
            TensSelection::Penalty => tens[0].max(tens[1]),
        };
        Self {
            value: compose(kept, units),
            tens,
            units,
            selection,
        }
    }
}

impl std::fmt::Display for D100Roll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.value)
    }
}

/// Roll d100 with optional bonus and penalty tens dice.
///
/// Draws two tens dice and one units die. Bonus keeps the lower tens die,
/// penalty keeps the higher one, and asking for both cancels out so the
/// first tens die is kept as in a plain roll.
pub fn roll_d100<D: PercentileDice + ?Sized>(dice: &mut D, bonus: bool, penalty: bool) -> D100Roll {
    let first = dice.roll_tens();
    let second = dice.roll_tens();
    let units = dice.roll_units();
    D100Roll::from_dice([first, second], units, TensSelection::from_flags(bonus, penalty))
}

/// Combine a tens face and a units face. 00 + 10 reads as 100.
fn compose(tens: u32, units: u32) -> u32 {
    match (tens, units) {
        (0, 10) => 100,
        (0, u) => u,
        (t, u) => t + u % 10,
    }
}

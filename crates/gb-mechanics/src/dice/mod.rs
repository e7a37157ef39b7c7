//! Percentile dice.
//!
//! A d100 roll is built from two tens dice (faces 00 through 90) and one
//! units die (faces 1 through 10). Bonus and penalty dice choose between the
//! two tens dice; see [`roll_d100`].

pub mod d100;
pub mod tier;

pub use d100::{D100Roll, TensSelection, roll_d100};
pub use tier::{SuccessTier, Target, classify};

use rand::Rng;
use rand::rngs::StdRng;

/// A source of percentile die faces.
pub trait PercentileDice {
    /// Roll a tens die: one of 0, 10, 20, ..., 90.
    fn roll_tens(&mut self) -> u32;

    /// Roll a units die: 1 through 10.
    fn roll_units(&mut self) -> u32;
}

impl PercentileDice for StdRng {
    fn roll_tens(&mut self) -> u32 {
        self.random_range(0..=9u32) * 10
    }

    fn roll_units(&mut self) -> u32 {
        self.random_range(1..=10u32)
    }
}

/// Replays a fixed sequence of die faces, cycling when it runs out.
///
/// Faces are consumed in draw order: each d100 roll takes two tens faces
/// then one units face. Use [`ScriptedDice::from_rolls`] to script whole
/// percentile results instead of individual faces. An empty script rolls
/// tens 0 and units 1 forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: Vec<u32>,
    next: usize,
}

impl ScriptedDice {
    /// Script raw die faces.
    pub fn from_faces(faces: impl Into<Vec<u32>>) -> Self {
        Self {
            faces: faces.into(),
            next: 0,
        }
    }

    /// Script whole d100 results (values outside 1..=100 are clamped).
    ///
    /// Each value becomes the three faces that produce it without any
    /// bonus or penalty die changing the result.
    pub fn from_rolls(rolls: &[u32]) -> Self {
        let faces: Vec<u32> = rolls.iter().flat_map(|&r| faces_for(r)).collect();
        Self::from_faces(faces)
    }

    /// Number of faces drawn so far.
    pub fn drawn(&self) -> usize {
        self.next
    }

    fn draw(&mut self, empty: u32) -> u32 {
        if self.faces.is_empty() {
            return empty;
        }
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        face
    }
}

impl PercentileDice for ScriptedDice {
    fn roll_tens(&mut self) -> u32 {
        self.draw(0)
    }

    fn roll_units(&mut self) -> u32 {
        self.draw(1)
    }
}

/// The tens, tens, units faces that compose `value`.
fn faces_for(value: u32) -> [u32; 3] {
    let value = value.clamp(1, 100);
    let (tens, units) = match value {
        100 => (0, 10),
        1..=9 => (0, value),
        _ => {
            let units = match value % 10 {
                0 => 10,
                u => u,
            };
            (value / 10 * 10, units)
        }
    };
    [tens, tens, units]
}

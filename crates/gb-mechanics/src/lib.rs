//! Game mechanics for the gamebook engine.
//!
//! Provides percentile dice with bonus/penalty tens dice, the five-tier
//! success classification, the character sheet (characteristics, skills,
//! luck and magic, health, modifiers, inventory, decision history) and the
//! declarative effects that mutate it.

pub mod check;
pub mod dice;
pub mod effect;
pub mod error;
pub mod sheet;


pub use check::{CheckRequest, CheckResult, CheckSubject, Difficulty, OpposedOutcome, OpposedResult};
pub use dice::{D100Roll, PercentileDice, ScriptedDice, SuccessTier, Target, classify, roll_d100};
pub use effect::{Effect, EffectOutcome, EffectResult, EffectsReport};
pub use error::{MechError, MechResult};
pub use sheet::{
    Character, Characteristic, DamageLevel, History, HistoryEntry, Inventory, ItemCategory,
    Modifier, ModifierKind, Occupation, Resource, ResourceKind, Score, SkillCategory,
};

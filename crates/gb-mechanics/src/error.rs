//! Error types for the mechanics engine.

use crate::sheet::{ItemCategory, ResourceKind};

/// Errors that can occur during mechanics operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MechError {
    /// A characteristic name is not one of STR, CON, DEX, INT, POW.
    #[error("unknown characteristic: {0}")]
    UnknownCharacteristic(String),

    /// No skill with this name exists in any category.
    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    /// Neither a skill nor a characteristic carries this name.
    #[error("nothing to roll for '{0}'")]
    UnknownRollTarget(String),

    /// A skill category name is not common, combat or expert.
    #[error("unknown skill category: {0}")]
    UnknownSkillCategory(String),

    /// An occupation name is not one of the known occupations.
    #[error("unknown occupation: {0}")]
    UnknownOccupation(String),

    /// A difficulty name is not normal, regular or hard.
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// An inventory category name is not equipment or weapons.
    #[error("unknown inventory category: {0}")]
    UnknownItemCategory(String),

    /// A spend asked for more than the resource currently holds.
    #[error("not enough {resource}: need {requested}, have {available}")]
    InsufficientResource {
        /// Which resource was spent.
        resource: ResourceKind,
        /// Amount requested.
        requested: u32,
        /// Amount available before the spend.
        available: u32,
    },

    /// An item to remove is not carried.
    #[error("item '{item}' not found in inventory")]
    ItemNotFound {
        /// Item name.
        item: String,
        /// Category that was searched, or none for all.
        category: Option<ItemCategory>,
    },

    /// An effect descriptor could not be interpreted.
    #[error("invalid effect: {reason}")]
    InvalidEffect {
        /// The `action` tag, if one was present.
        action: Option<String>,
        /// What was wrong with the descriptor.
        reason: String,
    },
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;

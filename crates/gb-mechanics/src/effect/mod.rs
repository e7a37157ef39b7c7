//! Declarative effects on the character sheet.
//!
//! Content describes effects as JSON objects tagged by `action`. They are
//! converted once into [`Effect`]; descriptors that cannot be interpreted
//! become [`Effect::Invalid`] so that applying them is a reported failure
//! rather than a load error.

mod apply;

pub use apply::{EffectOutcome, EffectResult, EffectsReport};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::sheet::{Characteristic, ItemCategory, ModifierKind, Occupation, SkillCategory};

/// A single change to apply to a character.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum Effect {
    /// Add damage.
    TakeDamage {
        /// Damage points.
        amount: u32,
    },
    /// Remove damage.
    HealDamage {
        /// Damage points.
        amount: u32,
    },
    /// Spend luck; fails if there is not enough.
    SpendLuck {
        /// Luck points.
        amount: u32,
    },
    /// Spend magic points; fails if there are not enough.
    SpendMagic {
        /// Magic points.
        amount: u32,
    },
    /// Restore luck up to its starting value.
    RestoreLuck {
        /// Luck points; zero is a no-op.
        amount: u32,
    },
    /// Restore magic points up to their starting value.
    RestoreMagic {
        /// Magic points; zero is a no-op.
        amount: u32,
    },
    /// Learn a skill at 60/30 if it is not known.
    GainSkill {
        /// Skill name.
        skill: String,
        /// Category to add it to.
        category: SkillCategory,
    },
    /// Attach a penalty or bonus die to a skill.
    Modifier {
        /// Skill name.
        skill: String,
        /// Bonus or penalty.
        kind: ModifierKind,
        /// Number of rolls it lasts, at least one.
        duration: u32,
    },
    /// Overwrite a characteristic (clamped 1..=100).
    SetCharacteristic {
        /// Which characteristic.
        characteristic: Characteristic,
        /// New full value before clamping.
        value: i64,
    },
    /// Overwrite or create a skill (clamped 0..=100).
    SetSkill {
        /// Skill name.
        skill: String,
        /// New full value before clamping.
        value: i64,
        /// Category.
        category: SkillCategory,
    },
    /// Carry an item.
    AddInventory {
        /// Item name.
        item: String,
        /// Equipment or weapons.
        category: ItemCategory,
    },
    /// Drop an item.
    RemoveInventory {
        /// Item name.
        item: String,
        /// Category to search, or all.
        category: Option<ItemCategory>,
    },
    /// Assign an occupation and its preset.
    SetOccupation {
        /// The occupation.
        occupation: Occupation,
    },
    /// A descriptor that could not be interpreted.
    Invalid {
        /// The `action` tag, if present.
        action: Option<String>,
        /// What was wrong.
        reason: String,
    },
}

impl Effect {
    /// The content tag for this effect.
    pub fn action(&self) -> &str {
        match self {
            Self::TakeDamage { .. } => "take_damage",
            Self::HealDamage { .. } => "heal_damage",
            Self::SpendLuck { .. } => "spend_luck",
            Self::SpendMagic { .. } => "spend_magic",
            Self::RestoreLuck { .. } => "restore_luck",
            Self::RestoreMagic { .. } => "restore_magic",
            Self::GainSkill { .. } => "gain_skill",
            Self::Modifier {
                kind: ModifierKind::PenaltyDice,
                ..
            } => "apply_penalty",
            Self::Modifier {
                kind: ModifierKind::BonusDice,
                ..
            } => "apply_bonus",
            Self::SetCharacteristic { .. } => "set_characteristic",
            Self::SetSkill { .. } => "set_skill",
            Self::AddInventory { .. } => "add_inventory",
            Self::RemoveInventory { .. } => "remove_inventory",
            Self::SetOccupation { .. } => "set_occupation",
            Self::Invalid { action, .. } => action.as_deref().unwrap_or("unknown"),
        }
    }

    /// Whether this descriptor failed to parse.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    /// Interpret a raw descriptor.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::Invalid {
                action: None,
                reason: format!("effect must be an object, got {value}"),
            };
        };
        let Some(action) = obj.get("action").and_then(Value::as_str) else {
            return Self::Invalid {
                action: None,
                reason: "effect has no 'action'".to_string(),
            };
        };
        parse_action(action, obj).unwrap_or_else(|reason| Self::Invalid {
            action: Some(action.to_string()),
            reason,
        })
    }
}

impl From<Value> for Effect {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TakeDamage { amount }
            | Self::HealDamage { amount }
            | Self::SpendLuck { amount }
            | Self::SpendMagic { amount }
            | Self::RestoreLuck { amount }
            | Self::RestoreMagic { amount } => write!(f, "{} {amount}", self.action()),
            Self::GainSkill { skill, category } => {
                write!(f, "gain_skill {skill} ({category})")
            }
            Self::Modifier {
                skill, duration, ..
            } => write!(f, "{} {skill} x{duration}", self.action()),
            Self::SetCharacteristic {
                characteristic,
                value,
            } => write!(f, "set_characteristic {characteristic}={value}"),
            Self::SetSkill {
                skill,
                value,
                category,
            } => write!(f, "set_skill {skill} ({category})={value}"),
            Self::AddInventory { item, category } => write!(f, "add_inventory {item} ({category})"),
            Self::RemoveInventory { item, .. } => write!(f, "remove_inventory {item}"),
            Self::SetOccupation { occupation } => write!(f, "set_occupation {occupation}"),
            Self::Invalid { reason, .. } => write!(f, "invalid effect: {reason}"),
        }
    }
}

fn parse_action(action: &str, obj: &Map<String, Value>) -> Result<Effect, String> {
    let effect = match action {
        "take_damage" => Effect::TakeDamage {
            amount: amount(obj)?,
        },
        "heal_damage" => Effect::HealDamage {
            amount: amount(obj)?,
        },
        "spend_luck" => Effect::SpendLuck {
            amount: amount(obj)?,
        },
        "spend_magic" => Effect::SpendMagic {
            amount: amount(obj)?,
        },
        "restore_luck" => Effect::RestoreLuck {
            amount: restore_amount(obj)?,
        },
        "restore_magic" => Effect::RestoreMagic {
            amount: restore_amount(obj)?,
        },
        "gain_skill" => Effect::GainSkill {
            skill: required_str(obj, "skill")?,
            category: obj
                .get("skill_type")
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        },
        "apply_penalty" | "apply_bonus" => {
            let kind = if action == "apply_penalty" {
                ModifierKind::PenaltyDice
            } else {
                ModifierKind::BonusDice
            };
            let duration = match obj.get("duration") {
                None | Some(Value::Null) => 1,
                Some(v) => match integer(v) {
                    Some(d) if d >= 1 => u32::try_from(d).unwrap_or(u32::MAX),
                    _ => return Err(format!("'duration' must be a positive integer, got {v}")),
                },
            };
            Effect::Modifier {
                skill: required_str(obj, "skill")?,
                kind,
                duration,
            }
        }
        "set_characteristic" => {
            let name = required_str(obj, "characteristic")?;
            let characteristic = name
                .parse::<Characteristic>()
                .map_err(|e| e.to_string())?;
            Effect::SetCharacteristic {
                characteristic,
                value: required_int(obj, "value")?,
            }
        }
        "set_skill" => {
            let category = match obj.get("skill_type").and_then(Value::as_str) {
                Some(s) => s.parse::<SkillCategory>().map_err(|e| e.to_string())?,
                None => SkillCategory::Common,
            };
            Effect::SetSkill {
                skill: required_str(obj, "skill")?,
                value: required_int(obj, "value")?,
                category,
            }
        }
        "add_inventory" => Effect::AddInventory {
            item: required_str(obj, "item")?,
            category: obj
                .get("category")
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        },
        "remove_inventory" => Effect::RemoveInventory {
            item: required_str(obj, "item")?,
            category: obj
                .get("category")
                .and_then(Value::as_str)
                .and_then(|s| s.parse().ok()),
        },
        "set_occupation" | "set-occupation" => {
            let name = required_str(obj, "occupation")?;
            Effect::SetOccupation {
                occupation: name.parse::<Occupation>().map_err(|e| e.to_string())?,
            }
        }
        other => return Err(format!("unknown action '{other}'")),
    };
    Ok(effect)
}

/// Whole numbers, including floats with no fractional part.
fn integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 1e15)
            .map(|f| f as i64)
    })
}

fn amount(obj: &Map<String, Value>) -> Result<u32, String> {
    match obj.get("amount") {
        None | Some(Value::Null) => Ok(0),
        Some(v) => integer(v)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| format!("'amount' must be a non-negative integer, got {v}")),
    }
}

/// Restores treat negative amounts as zero.
fn restore_amount(obj: &Map<String, Value>) -> Result<u32, String> {
    match obj.get("amount") {
        None | Some(Value::Null) => Ok(0),
        Some(v) => integer(v)
            .map(|n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
            .ok_or_else(|| format!("'amount' must be an integer, got {v}")),
    }
}

fn required_str(obj: &Map<String, Value>, key: &str) -> Result<String, String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| format!("'{key}' must be a non-empty string"))
}

fn required_int(obj: &Map<String, Value>, key: &str) -> Result<i64, String> {
    obj.get(key)
        .and_then(integer)
        .ok_or_else(|| format!("'{key}' must be a number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_amount_effects() {
        let e: Effect = serde_json::from_value(json!({"action": "take_damage", "amount": 2})).unwrap();
        assert_eq!(e, Effect::TakeDamage { amount: 2 });
        let e = Effect::from_value(&json!({"action": "spend_luck"}));
        assert_eq!(e, Effect::SpendLuck { amount: 0 });
    }

    #[test]
    fn negative_spend_is_invalid_but_restore_is_zero() {
        assert!(Effect::from_value(&json!({"action": "spend_magic", "amount": -1})).is_invalid());
        assert_eq!(
            Effect::from_value(&json!({"action": "restore_luck", "amount": -4})),
            Effect::RestoreLuck { amount: 0 }
        );
    }

    #[test]
    fn modifier_duration_rules() {
        assert_eq!(
            Effect::from_value(&json!({"action": "apply_penalty", "skill": "Fighting"})),
            Effect::Modifier {
                skill: "Fighting".into(),
                kind: ModifierKind::PenaltyDice,
                duration: 1
            }
        );
        assert!(
            Effect::from_value(&json!({"action": "apply_bonus", "skill": "Stealth", "duration": 0}))
                .is_invalid()
        );
        assert!(Effect::from_value(&json!({"action": "apply_bonus", "duration": 2})).is_invalid());
    }

    #[test]
    fn inventory_category_defaults() {
        assert_eq!(
            Effect::from_value(&json!({"action": "add_inventory", "item": "Torch", "category": "junk"})),
            Effect::AddInventory {
                item: "Torch".into(),
                category: ItemCategory::Equipment
            }
        );
        assert_eq!(
            Effect::from_value(&json!({"action": "add_inventory", "item": "Baton", "category": "weapons"})),
            Effect::AddInventory {
                item: "Baton".into(),
                category: ItemCategory::Weapons
            }
        );
    }

    #[test]
    fn set_effects_need_names_and_values() {
        assert_eq!(
            Effect::from_value(&json!({"action": "set_characteristic", "characteristic": "dex", "value": 70})),
            Effect::SetCharacteristic {
                characteristic: Characteristic::Dex,
                value: 70
            }
        );
        assert!(Effect::from_value(&json!({"action": "set_characteristic", "characteristic": "LUCK", "value": 70})).is_invalid());
        assert!(Effect::from_value(&json!({"action": "set_skill", "skill": "Law"})).is_invalid());
    }

    #[test]
    fn unknown_and_malformed() {
        let e = Effect::from_value(&json!({"action": "teleport"}));
        assert_eq!(e.action(), "teleport");
        assert!(e.is_invalid());
        assert!(Effect::from_value(&json!("take_damage")).is_invalid());
        assert!(Effect::from_value(&json!({"amount": 1})).is_invalid());
    }

    #[test]
    fn occupation_effect() {
        assert_eq!(
            Effect::from_value(&json!({"action": "set_occupation", "occupation": "Nurse"})),
            Effect::SetOccupation {
                occupation: Occupation::Nurse
            }
        );
    }
}

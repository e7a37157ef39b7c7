//! Applying effects to a character.

use serde::Serialize;

use super::Effect;
use crate::error::{MechError, MechResult};
use crate::sheet::{
    Character, Characteristic, DamageReport, HealReport, ItemCategory, ModifierKind, Occupation,
    ResourceKind, Score, SkillCategory,
};

/// What a successfully applied effect changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EffectOutcome {
    /// Damage was taken.
    Damaged(DamageReport),
    /// Damage was healed.
    Healed(HealReport),
    /// A resource was spent.
    Spent {
        /// Which resource.
        resource: ResourceKind,
        /// Amount spent.
        amount: u32,
        /// Amount left.
        remaining: u32,
    },
    /// A resource was restored.
    Restored {
        /// Which resource.
        resource: ResourceKind,
        /// Amount actually restored after clamping.
        restored: u32,
        /// Current value afterwards.
        current: u32,
    },
    /// A skill was learned, or was already known.
    SkillGained {
        /// Skill name.
        skill: String,
        /// Category.
        category: SkillCategory,
        /// False when the skill already existed.
        added: bool,
    },
    /// A modifier was attached.
    ModifierAdded {
        /// Skill name.
        skill: String,
        /// Bonus or penalty.
        kind: ModifierKind,
        /// Rolls it lasts.
        duration: u32,
    },
    /// A characteristic was overwritten.
    CharacteristicSet {
        /// Which characteristic.
        characteristic: Characteristic,
        /// New score.
        score: Score,
    },
    /// A skill was overwritten.
    SkillSet {
        /// Skill name.
        skill: String,
        /// Category.
        category: SkillCategory,
        /// New score.
        score: Score,
    },
    /// An item was added.
    ItemAdded {
        /// Item name.
        item: String,
        /// Category.
        category: ItemCategory,
    },
    /// An item was removed.
    ItemRemoved {
        /// Item name.
        item: String,
        /// Category it was found in.
        category: ItemCategory,
    },
    /// An occupation was assigned.
    OccupationSet(Occupation),
}

impl std::fmt::Display for EffectOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Damaged(r) => {
                write!(f, "took {} damage ({} -> {})", r.amount, r.old_level, r.new_level)?;
                if r.died {
                    write!(f, ", no longer able to continue")?;
                }
                Ok(())
            }
            Self::Healed(r) => write!(f, "healed {} damage", r.healed),
            Self::Spent {
                resource,
                amount,
                remaining,
            } => write!(f, "spent {amount} {resource} ({remaining} left)"),
            Self::Restored {
                resource,
                restored,
                current,
            } => write!(f, "restored {restored} {resource} (now {current})"),
            Self::SkillGained {
                skill,
                added: true,
                ..
            } => write!(f, "gained skill {skill} at 60%"),
            Self::SkillGained { skill, .. } => write!(f, "already knows {skill}"),
            Self::ModifierAdded {
                skill,
                kind,
                duration,
            } => write!(f, "{kind} on {skill} for {duration} roll(s)"),
            Self::CharacteristicSet {
                characteristic,
                score,
            } => write!(f, "{characteristic} set to {score}"),
            Self::SkillSet { skill, score, .. } => write!(f, "{skill} set to {score}"),
            Self::ItemAdded { item, category } => write!(f, "added {item} to {category}"),
            Self::ItemRemoved { item, category } => write!(f, "removed {item} from {category}"),
            Self::OccupationSet(o) => write!(f, "occupation set to {o}"),
        }
    }
}

/// The result of one effect in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectResult {
    /// The effect's action tag.
    pub action: String,
    /// What happened.
    pub result: MechResult<EffectOutcome>,
}

impl EffectResult {
    /// Whether the effect applied.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl std::fmt::Display for EffectResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.result {
            Ok(outcome) => write!(f, "{outcome}"),
            Err(e) => write!(f, "{} failed: {e}", self.action),
        }
    }
}

/// Per-effect results for a batch. Every effect is attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectsReport {
    results: Vec<EffectResult>,
}

impl EffectsReport {
    /// True only if every effect applied.
    pub fn success(&self) -> bool {
        self.results.iter().all(EffectResult::is_ok)
    }

    /// Number of effects attempted.
    pub fn processed(&self) -> usize {
        self.results.len()
    }

    /// Number that applied.
    pub fn applied(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    /// Number that failed.
    pub fn failed(&self) -> usize {
        self.processed() - self.applied()
    }

    /// Results in the order the effects were given.
    pub fn results(&self) -> &[EffectResult] {
        &self.results
    }

    /// Whether the batch was empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl std::fmt::Display for EffectsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.results.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

impl Character {
    /// Apply one effect.
    ///
    /// A failed effect leaves the sheet unchanged.
    pub fn apply_effect(&mut self, effect: &Effect) -> MechResult<EffectOutcome> {
        let outcome = match effect {
            Effect::TakeDamage { amount } => EffectOutcome::Damaged(self.take_damage(*amount)),
            Effect::HealDamage { amount } => EffectOutcome::Healed(self.heal_damage(*amount)),
            Effect::SpendLuck { amount } => self.spend_outcome(ResourceKind::Luck, *amount)?,
            Effect::SpendMagic { amount } => self.spend_outcome(ResourceKind::Magic, *amount)?,
            Effect::RestoreLuck { amount } => self.restore_outcome(ResourceKind::Luck, *amount),
            Effect::RestoreMagic { amount } => self.restore_outcome(ResourceKind::Magic, *amount),
            Effect::GainSkill { skill, category } => EffectOutcome::SkillGained {
                added: self.gain_skill(skill, *category),
                skill: skill.clone(),
                category: *category,
            },
            Effect::Modifier {
                skill,
                kind,
                duration,
            } => {
                self.add_modifier(skill, *kind, *duration);
                EffectOutcome::ModifierAdded {
                    skill: skill.clone(),
                    kind: *kind,
                    duration: *duration,
                }
            }
            Effect::SetCharacteristic {
                characteristic,
                value,
            } => EffectOutcome::CharacteristicSet {
                characteristic: *characteristic,
                score: self.set_characteristic(*characteristic, *value),
            },
            Effect::SetSkill {
                skill,
                value,
                category,
            } => EffectOutcome::SkillSet {
                score: self.set_skill(skill, *category, *value),
                skill: skill.clone(),
                category: *category,
            },
            Effect::AddInventory { item, category } => {
                self.add_item(item, *category);
                EffectOutcome::ItemAdded {
                    item: item.clone(),
                    category: *category,
                }
            }
            Effect::RemoveInventory { item, category } => EffectOutcome::ItemRemoved {
                category: self.remove_item(item, *category)?,
                item: item.clone(),
            },
            Effect::SetOccupation { occupation } => {
                self.set_occupation(*occupation);
                EffectOutcome::OccupationSet(*occupation)
            }
            Effect::Invalid { action, reason } => {
                return Err(MechError::InvalidEffect {
                    action: action.clone(),
                    reason: reason.clone(),
                });
            }
        };
        tracing::debug!(action = effect.action(), %outcome, "effect applied");
        Ok(outcome)
    }

    /// Apply every effect in order, isolating failures.
    pub fn apply_effects(&mut self, effects: &[Effect]) -> EffectsReport {
        let results = effects
            .iter()
            .map(|effect| {
                let result = self.apply_effect(effect);
                if let Err(e) = &result {
                    tracing::warn!(action = effect.action(), error = %e, "effect failed");
                }
                EffectResult {
                    action: effect.action().to_string(),
                    result,
                }
            })
            .collect();
        EffectsReport { results }
    }

    fn spend_outcome(&mut self, resource: ResourceKind, amount: u32) -> MechResult<EffectOutcome> {
        let remaining = self.spend(resource, amount)?;
        Ok(EffectOutcome::Spent {
            resource,
            amount,
            remaining,
        })
    }

    fn restore_outcome(&mut self, resource: ResourceKind, amount: u32) -> EffectOutcome {
        let restored = self.restore(resource, amount);
        let current = match resource {
            ResourceKind::Luck => self.luck().current(),
            ResourceKind::Magic => self.magic().current(),
        };
        EffectOutcome::Restored {
            resource,
            restored,
            current,
        }
    }
}

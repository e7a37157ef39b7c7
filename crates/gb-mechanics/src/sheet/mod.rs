//! The character sheet.
//!
//! A [`Character`] owns every piece of mutable player state. All changes go
//! through its methods so that derived values (half scores, resource
//! clamping, damage labels) stay consistent with each mutation.

pub mod health;
pub mod history;
pub mod inventory;
pub mod modifier;
pub mod occupation;
pub mod resource;
pub mod score;

pub use health::{DamageLevel, DamageReport, HealReport, Health};
pub use history::{DEFAULT_HISTORY_LIMIT, History, HistoryEntry, excerpt};
pub use inventory::{Inventory, ItemCategory};
pub use modifier::{ActiveModifiers, Modifier, ModifierKind, Modifiers};
pub use occupation::{Occupation, Preset};
pub use resource::{Resource, ResourceKind};
pub use score::{Characteristic, Score, SkillCategory};

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dice::PercentileDice;
use crate::error::{MechError, MechResult};

/// Default starting value of a gained skill.
pub const GAINED_SKILL: u32 = 60;

/// A player character.
#[derive(Debug, Clone, Serialize)]
pub struct Character {
    name: String,
    occupation: Option<Occupation>,
    age: u32,
    backstory: String,
    characteristics: BTreeMap<Characteristic, Score>,
    skills: BTreeMap<SkillCategory, BTreeMap<String, Score>>,
    luck: Resource,
    magic: Resource,
    health: Health,
    modifiers: Modifiers,
    inventory: Inventory,
    history: History,
}

impl Character {
    /// Create a character with the preset for `occupation`.
    ///
    /// Starting luck is 2d10+50 drawn from `dice`; magic points equal POW.
    pub fn new<D: PercentileDice + ?Sized>(
        name: impl Into<String>,
        occupation: Option<Occupation>,
        age: u32,
        dice: &mut D,
    ) -> Self {
        let luck = dice.roll_units() + dice.roll_units() + 50;

        let mut skills: BTreeMap<SkillCategory, BTreeMap<String, Score>> = SkillCategory::ALL
            .into_iter()
            .map(|c| (c, BTreeMap::new()))
            .collect();
        for &(category, skill) in occupation::BASE_SKILLS {
            skills
                .entry(category)
                .or_default()
                .insert(skill.to_string(), Score::new(occupation::BASE_SKILL));
        }

        let mut character = Self {
            name: name.into(),
            occupation: None,
            age,
            backstory: String::new(),
            characteristics: BTreeMap::new(),
            skills,
            luck: Resource::new(ResourceKind::Luck, luck),
            magic: Resource::new(ResourceKind::Magic, 0),
            health: Health::default(),
            modifiers: Modifiers::default(),
            inventory: Inventory::default(),
            history: History::default(),
        };
        character.apply_preset(occupation);
        character
    }

    /// Attach a backstory.
    pub fn with_backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    /// Keep at most `limit` history entries.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = History::with_limit(limit);
        self
    }

    /// Set the occupation and apply its preset characteristics and skills.
    ///
    /// Magic points are reset to the new POW. Damage, luck, inventory,
    /// modifiers and history are kept.
    pub fn set_occupation(&mut self, occupation: Occupation) {
        self.apply_preset(Some(occupation));
    }

    fn apply_preset(&mut self, occupation: Option<Occupation>) {
        let preset = occupation.map_or(&occupation::GENERIC, Occupation::preset);
        self.occupation = occupation;
        for &(characteristic, value) in &preset.characteristics {
            self.characteristics.insert(characteristic, Score::new(value));
        }
        for &(category, skill, value) in preset.skills {
            self.skills
                .entry(category)
                .or_default()
                .insert(skill.to_string(), Score::new(value));
        }
        self.magic.reset(preset.pow());
    }

    // -- identity --------------------------------------------------------

    /// Character name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current occupation, if one has been assigned.
    pub fn occupation(&self) -> Option<Occupation> {
        self.occupation
    }

    /// Age in years.
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Free-form backstory.
    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    // -- scores ----------------------------------------------------------

    /// A characteristic score.
    pub fn characteristic(&self, characteristic: Characteristic) -> Score {
        self.characteristics
            .get(&characteristic)
            .copied()
            .unwrap_or_else(|| Score::new(0))
    }

    /// A skill in one category.
    pub fn skill(&self, name: &str, category: SkillCategory) -> Option<Score> {
        self.skills.get(&category)?.get(name).copied()
    }

    /// A skill from the first category (common, combat, expert) that has it.
    pub fn find_skill(&self, name: &str) -> Option<(SkillCategory, Score)> {
        SkillCategory::ALL
            .into_iter()
            .find_map(|c| self.skill(name, c).map(|s| (c, s)))
    }

    /// All skills in one category, sorted by name.
    pub fn skills(&self, category: SkillCategory) -> impl Iterator<Item = (&str, Score)> {
        self.skills
            .get(&category)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), *v)))
    }

    /// Overwrite a characteristic, clamped into 1..=100.
    pub fn set_characteristic(&mut self, characteristic: Characteristic, value: i64) -> Score {
        let score = Score::new(value.clamp(1, 100) as u32);
        self.characteristics.insert(characteristic, score);
        score
    }

    /// Overwrite or create a skill, clamped into 0..=100.
    pub fn set_skill(&mut self, name: &str, category: SkillCategory, value: i64) -> Score {
        let score = Score::new(value.clamp(0, 100) as u32);
        self.skills
            .entry(category)
            .or_default()
            .insert(name.to_string(), score);
        score
    }

    /// Learn a skill at the default value. Returns false if it was known.
    pub fn gain_skill(&mut self, name: &str, category: SkillCategory) -> bool {
        let skills = self.skills.entry(category).or_default();
        if skills.contains_key(name) {
            return false;
        }
        skills.insert(name.to_string(), Score::new(GAINED_SKILL));
        true
    }

    // -- resources -------------------------------------------------------

    /// Luck.
    pub fn luck(&self) -> &Resource {
        &self.luck
    }

    /// Magic points.
    pub fn magic(&self) -> &Resource {
        &self.magic
    }

    fn resource_mut(&mut self, kind: ResourceKind) -> &mut Resource {
        match kind {
            ResourceKind::Luck => &mut self.luck,
            ResourceKind::Magic => &mut self.magic,
        }
    }

    /// Spend from a resource; fails without mutation if it would overdraw.
    pub fn spend(&mut self, kind: ResourceKind, amount: u32) -> MechResult<u32> {
        self.resource_mut(kind).spend(amount)
    }

    /// Restore a resource, clamped at its starting value.
    pub fn restore(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        self.resource_mut(kind).restore(amount)
    }

    // -- health ----------------------------------------------------------

    /// Total damage taken.
    pub fn damage_taken(&self) -> u32 {
        self.health.damage_taken()
    }

    /// The current damage label.
    pub fn damage_level(&self) -> DamageLevel {
        self.health.level()
    }

    /// Whether the character is still in the story.
    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    /// Add damage.
    pub fn take_damage(&mut self, amount: u32) -> DamageReport {
        let report = self.health.take(amount);
        if report.died {
            tracing::info!(character = %self.name, "character is impaired");
        }
        report
    }

    /// Remove damage, floored at zero.
    pub fn heal_damage(&mut self, amount: u32) -> HealReport {
        self.health.heal(amount)
    }

    // -- modifiers -------------------------------------------------------

    /// Active modifiers.
    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    /// Attach a bonus or penalty die to a skill for `duration` rolls.
    pub fn add_modifier(&mut self, skill: &str, kind: ModifierKind, duration: u32) {
        self.modifiers.add(skill, kind, duration);
    }

    /// Use up one roll of a specific modifier.
    pub fn reduce_modifier(&mut self, skill: &str, kind: ModifierKind) -> Option<u32> {
        self.modifiers.reduce(skill, kind)
    }

    /// Remove modifiers on one skill, or all of them.
    pub fn clear_modifiers(&mut self, skill: Option<&str>) -> usize {
        self.modifiers.clear(skill)
    }

    pub(crate) fn consume_modifiers(&mut self, skill: &str) -> ActiveModifiers {
        self.modifiers.consume(skill)
    }

    // -- inventory -------------------------------------------------------

    /// Carried items.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Carry an item.
    pub fn add_item(&mut self, item: &str, category: ItemCategory) {
        self.inventory.add(item, category);
    }

    /// Drop an item by exact name.
    pub fn remove_item(&mut self, item: &str, category: Option<ItemCategory>) -> MechResult<ItemCategory> {
        self.inventory
            .remove(item, category)
            .ok_or_else(|| MechError::ItemNotFound {
                item: item.to_string(),
                category,
            })
    }

    /// Whether an item is carried.
    pub fn has_item(&self, item: &str, category: Option<ItemCategory>) -> bool {
        self.inventory.has_item(item, category)
    }

    // -- history ---------------------------------------------------------

    /// Recent decisions.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Record a decision.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// One-line status: name, occupation, health, luck, magic.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) | {} | Luck {}/{} | Magic {}/{}",
            self.name,
            self.occupation.map_or("no occupation", Occupation::name),
            self.damage_level(),
            self.luck.current(),
            self.luck.starting(),
            self.magic.current(),
            self.magic.starting(),
        )
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

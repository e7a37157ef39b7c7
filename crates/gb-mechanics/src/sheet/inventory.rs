//! Equipment and weapons.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MechError;

/// The two inventory lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    /// General gear.
    #[default]
    Equipment,
    /// Anything used to fight.
    Weapons,
}

impl ItemCategory {
    /// Both categories, in search order.
    pub const ALL: [ItemCategory; 2] = [Self::Equipment, Self::Weapons];
}

impl FromStr for ItemCategory {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equipment" => Ok(Self::Equipment),
            "weapons" | "weapon" => Ok(Self::Weapons),
            _ => Err(MechError::UnknownItemCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equipment => write!(f, "equipment"),
            Self::Weapons => write!(f, "weapons"),
        }
    }
}

/// Carried items. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    equipment: Vec<String>,
    weapons: Vec<String>,
}

impl Inventory {
    /// Items in one category, in the order they were added.
    pub fn items(&self, category: ItemCategory) -> &[String] {
        match category {
            ItemCategory::Equipment => &self.equipment,
            ItemCategory::Weapons => &self.weapons,
        }
    }

    fn items_mut(&mut self, category: ItemCategory) -> &mut Vec<String> {
        match category {
            ItemCategory::Equipment => &mut self.equipment,
            ItemCategory::Weapons => &mut self.weapons,
        }
    }

    /// Append an item.
    pub fn add(&mut self, item: impl Into<String>, category: ItemCategory) {
        self.items_mut(category).push(item.into());
    }

    /// Remove the first exact match, searching one category or both.
    /// Returns the category it was removed from.
    pub fn remove(&mut self, item: &str, category: Option<ItemCategory>) -> Option<ItemCategory> {
        let categories: &[ItemCategory] = match &category {
            Some(c) => std::slice::from_ref(c),
            None => &ItemCategory::ALL,
        };
        for &cat in categories {
            let list = self.items_mut(cat);
            if let Some(pos) = list.iter().position(|i| i == item) {
                list.remove(pos);
                return Some(cat);
            }
        }
        None
    }

    /// Whether an item is carried, in one category or either.
    pub fn has_item(&self, item: &str, category: Option<ItemCategory>) -> bool {
        match category {
            Some(cat) => self.items(cat).iter().any(|i| i == item),
            None => ItemCategory::ALL
                .iter()
                .any(|&cat| self.items(cat).iter().any(|i| i == item)),
        }
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.equipment.len() + self.weapons.len()
    }

    /// Whether nothing is carried.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

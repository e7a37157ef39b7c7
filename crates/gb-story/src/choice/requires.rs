//! Requirement predicates on choices.

use serde_json::Value;

use gb_mechanics::{Character, Occupation};

use crate::error::{IssueKind, Notes};

/// Inclusive bounds on damage taken. A missing max is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageRange {
    /// Lowest allowed value.
    pub min: u32,
    /// Highest allowed value, if any.
    pub max: Option<u32>,
}

impl DamageRange {
    /// Whether `damage` lies in the range.
    pub fn contains(&self, damage: u32) -> bool {
        damage >= self.min && self.max.is_none_or(|max| damage <= max)
    }
}

/// Conditions a character must meet for a choice to apply.
///
/// Keys that are not understood are kept in `unknown` and treated as
/// satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Requires {
    /// Exact occupation name.
    pub occupation: Option<String>,
    /// Damage taken bounds.
    pub damage_taken: Option<DamageRange>,
    /// Keys that are not evaluated.
    pub unknown: Vec<String>,
}

impl Requires {
    pub(crate) fn parse(value: &Value, notes: &mut Notes) -> Self {
        let mut requires = Self::default();
        let obj = match value {
            Value::Object(obj) => obj,
            Value::Array(items) => {
                for item in items {
                    let key = item.as_str().map_or_else(|| item.to_string(), str::to_string);
                    notes.push(IssueKind::UnknownRequires, format!("'{key}' is not evaluated"));
                    requires.unknown.push(key);
                }
                return requires;
            }
            other => {
                notes.push(IssueKind::Ignored, format!("requires must be an object, got {other}"));
                return requires;
            }
        };

        for (key, v) in obj {
            match key.as_str() {
                "occupation" => match v.as_str() {
                    Some(s) => requires.occupation = Some(s.to_string()),
                    None => notes.push(IssueKind::Ignored, format!("requires.occupation must be a string, got {v}")),
                },
                "damage_taken" => match parse_range(v) {
                    Some(range) => requires.damage_taken = Some(range),
                    None => notes.push(IssueKind::Ignored, format!("requires.damage_taken is not a range: {v}")),
                },
                other => {
                    notes.push(IssueKind::UnknownRequires, format!("'{other}' is not evaluated"));
                    requires.unknown.push(other.to_string());
                }
            }
        }
        requires
    }

    /// Evaluate against a character.
    pub fn is_satisfied(&self, character: &Character) -> bool {
        for key in &self.unknown {
            tracing::warn!(key = %key, "ignoring unknown requires key");
        }
        let occupation_ok = self
            .occupation
            .as_deref()
            .is_none_or(|wanted| character.occupation().map(Occupation::name) == Some(wanted));
        let damage_ok = self
            .damage_taken
            .is_none_or(|range| range.contains(character.damage_taken()));
        occupation_ok && damage_ok
    }

    /// Human-readable reason the character fails, if it does.
    pub fn explain_failure(&self, character: &Character) -> Option<String> {
        if self.is_satisfied(character) {
            return None;
        }
        let current = character.occupation().map(Occupation::name);
        let occupation = current.unwrap_or("none");
        Some(match &self.occupation {
            Some(wanted) if Some(wanted.as_str()) != current => {
                format!("requires occupation {wanted}, current is {occupation}")
            }
            _ => format!(
                "requires a different damage level (damage taken {})",
                character.damage_taken()
            ),
        })
    }
}

fn parse_range(value: &Value) -> Option<DamageRange> {
    if let Some(n) = value.as_u64() {
        let n = u32::try_from(n).ok()?;
        return Some(DamageRange { min: n, max: Some(n) });
    }
    let obj = value.as_object()?;
    let bound = |key: &str| -> Option<Option<u32>> {
        match obj.get(key) {
            None | Some(Value::Null) => Some(None),
            Some(v) => v.as_u64().and_then(|n| u32::try_from(n).ok()).map(Some),
        }
    };
    Some(DamageRange {
        min: bound("min")?.unwrap_or(0),
        max: bound("max")?,
    })
}

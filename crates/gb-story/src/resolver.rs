//! Choice resolution.
//!
//! Turns a page's choices and the character's state into exactly one
//! concrete choice. Rules per choice, in list order:
//!
//! 1. Occupation-conditional choices resolve to the path for the current
//!    occupation, else `default`, else are skipped. The resolved path is
//!    checked again from rule 1, up to [`MAX_CONDITIONAL_DEPTH`] levels.
//! 2. A failed `requires` skips the choice.
//! 3. `set_occupation` applies only if it names the current occupation.
//! 4. Otherwise the choice applies if it has a goto or a roll.
//!
//! A conditional that resolves to an applicable path wins immediately.
//! Otherwise the first applicable choice wins. If nothing applies, the
//! first choice with a goto or roll is taken regardless of requirements,
//! and failing that a safe jump back to page 1.

use gb_mechanics::{Character, Occupation};

use crate::choice::{Action, Choice, MAX_CONDITIONAL_DEPTH, PageId};

/// The page the safe fallback jumps to.
pub const SAFE_FALLBACK_PAGE: PageId = 1;

/// How the resolver arrived at its choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// An occupation-conditional path.
    Conditional,
    /// The first applicable choice.
    Applicable,
    /// Nothing applied; first choice with an action.
    LastResort,
    /// Nothing had an action.
    SafeFallback,
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Conditional => "occupation path",
            Self::Applicable => "first applicable choice",
            Self::LastResort => "last resort",
            Self::SafeFallback => "safe fallback",
        };
        f.write_str(label)
    }
}

/// The resolver's pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The concrete choice to execute.
    pub choice: Choice,
    /// 1-based position of the originating choice, none for the fallback.
    pub index: Option<usize>,
    /// Which rule produced it.
    pub source: ResolutionSource,
}

/// Why a picked choice cannot be taken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PickRejection(pub String);

/// The no-op jump used when nothing else can be executed.
pub fn safe_fallback() -> Choice {
    Choice::goto("Fallback: return to the start", SAFE_FALLBACK_PAGE)
}

/// Resolve a page's choices to one concrete choice.
pub fn resolve_choices(choices: &[Choice], character: &Character) -> Resolution {
    let mut first_applicable: Option<(usize, &Choice)> = None;

    for (i, choice) in choices.iter().enumerate() {
        let index = i + 1;
        if choice.is_conditional() {
            match concrete(choice, character, 0) {
                Ok(resolved) => {
                    tracing::debug!(index, "resolved occupation path");
                    return Resolution {
                        choice: resolved,
                        index: Some(index),
                        source: ResolutionSource::Conditional,
                    };
                }
                Err(reason) => tracing::debug!(index, %reason, "skipping conditional choice"),
            }
            continue;
        }
        if first_applicable.is_none() {
            match check_applicable(choice, character) {
                Ok(()) => first_applicable = Some((index, choice)),
                Err(reason) => tracing::debug!(index, %reason, "choice not applicable"),
            }
        }
    }

    if let Some((index, choice)) = first_applicable {
        return Resolution {
            choice: choice.clone(),
            index: Some(index),
            source: ResolutionSource::Applicable,
        };
    }

    if let Some((i, choice)) = choices.iter().enumerate().find(|(_, c)| c.is_actionable()) {
        tracing::warn!(index = i + 1, "no applicable choice, using last resort");
        return Resolution {
            choice: choice.clone(),
            index: Some(i + 1),
            source: ResolutionSource::LastResort,
        };
    }

    tracing::warn!("no actionable choice, using safe fallback");
    Resolution {
        choice: safe_fallback(),
        index: None,
        source: ResolutionSource::SafeFallback,
    }
}

/// Check a choice picked by a decision adapter.
///
/// Applies the same rules as the resolver, except that a character without
/// an occupation may pick any `set_occupation` choice whose requirements
/// hold: that assigns the first occupation rather than changing one. On
/// success returns the concrete choice to execute, with occupation paths
/// resolved.
pub fn validate_pick(choice: &Choice, character: &Character) -> Result<Choice, PickRejection> {
    if choice.is_conditional() {
        return concrete(choice, character, 0).map_err(PickRejection);
    }
    match check_applicable(choice, character) {
        Ok(()) => Ok(choice.clone()),
        // A choice that only applies effects is still a legal pick.
        Err(_) if matches!(choice.action, Action::None) && !choice.effects.is_empty() => {
            Ok(choice.clone())
        }
        Err(_) if assigns_first_occupation(choice, character) => Ok(choice.clone()),
        Err(reason) => Err(PickRejection(reason)),
    }
}

fn assigns_first_occupation(choice: &Choice, character: &Character) -> bool {
    matches!(choice.action, Action::SetOccupation { .. })
        && character.occupation().is_none()
        && choice
            .requires
            .as_ref()
            .and_then(|r| r.explain_failure(character))
            .is_none()
}

/// Resolve conditionals down to an applicable concrete choice.
fn concrete(choice: &Choice, character: &Character, depth: usize) -> Result<Choice, String> {
    let Action::ConditionalOnOccupation(paths) = &choice.action else {
        check_applicable(choice, character)?;
        return Ok(choice.clone());
    };
    if depth >= MAX_CONDITIONAL_DEPTH {
        return Err(format!("conditional nesting deeper than {MAX_CONDITIONAL_DEPTH}"));
    }
    let occupation = character.occupation().map(Occupation::name);
    let path = paths.resolve(occupation).ok_or_else(|| {
        format!(
            "choice requires a specific occupation; current is {}",
            occupation.unwrap_or("none")
        )
    })?;
    concrete(path, character, depth + 1)
}

/// Rules 2 to 4 for a non-conditional choice.
fn check_applicable(choice: &Choice, character: &Character) -> Result<(), String> {
    if let Some(reason) = choice
        .requires
        .as_ref()
        .and_then(|r| r.explain_failure(character))
    {
        return Err(reason);
    }
    if let Action::SetOccupation { occupation, .. } = &choice.action {
        let current = character.occupation().map(Occupation::name);
        return if current == Some(occupation.as_str()) {
            Ok(())
        } else {
            Err(format!(
                "confirms occupation {occupation}, current is {}",
                current.unwrap_or("none")
            ))
        };
    }
    if choice.is_actionable() {
        Ok(())
    } else {
        Err("choice has no goto or roll".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::Destination;
    use gb_mechanics::ScriptedDice;
    use serde_json::{Value, json};

    fn character(occupation: Option<Occupation>) -> Character {
        let mut dice = ScriptedDice::from_faces(vec![5, 5]);
        Character::new("Test", occupation, 30, &mut dice)
    }

    fn choices(value: Value) -> Vec<Choice> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| Choice::from_value(v).unwrap())
            .collect()
    }

    fn conditional() -> Value {
        json!({
            "conditional_on": "occupation",
            "paths": {
                "Police Officer": {"goto": 18},
                "default": {"roll": "POW", "results": {"2": {"goto": 27}, "3": {"goto": 22}}}
            }
        })
    }

    #[test]
    fn officer_takes_officer_path() {
        let r = resolve_choices(&choices(json!([conditional()])), &character(Some(Occupation::PoliceOfficer)));
        assert_eq!(r.source, ResolutionSource::Conditional);
        assert_eq!(r.choice.action, Action::Goto(Destination::Page(18)));
        assert_eq!(r.index, Some(1));
    }

    #[test]
    fn other_occupation_takes_default() {
        let r = resolve_choices(&choices(json!([conditional()])), &character(Some(Occupation::Nurse)));
        assert!(matches!(r.choice.action, Action::CharacteristicRoll(_)));
    }

    #[test]
    fn conditional_without_default_is_skipped() {
        let list = choices(json!([
            {"conditional_on": "occupation", "paths": {"Police Officer": {"goto": 18}}},
            {"text": "Walk away", "goto": 5}
        ]));
        let r = resolve_choices(&list, &character(Some(Occupation::SocialWorker)));
        assert_eq!(r.source, ResolutionSource::Applicable);
        assert_eq!(r.index, Some(2));
    }

    #[test]
    fn conditional_beats_earlier_applicable_choice() {
        let list = choices(json!([{"goto": 5}, conditional()]));
        let r = resolve_choices(&list, &character(Some(Occupation::PoliceOfficer)));
        assert_eq!(r.source, ResolutionSource::Conditional);
        assert_eq!(r.index, Some(2));
    }

    #[test]
    fn first_applicable_wins() {
        let list = choices(json!([
            {"requires": {"occupation": "Nurse"}, "goto": 3},
            {"goto": 4},
            {"goto": 5}
        ]));
        let r = resolve_choices(&list, &character(Some(Occupation::PoliceOfficer)));
        assert_eq!(r.choice.action, Action::Goto(Destination::Page(4)));
    }

    #[test]
    fn set_occupation_must_match() {
        let list = choices(json!([
            {"set_occupation": "Nurse", "goto": 40},
            {"set_occupation": "Police Officer", "goto": 41}
        ]));
        let r = resolve_choices(&list, &character(Some(Occupation::PoliceOfficer)));
        assert_eq!(r.index, Some(2));
    }

    #[test]
    fn last_resort_ignores_requirements() {
        let list = choices(json!([
            {"text": "Nothing"},
            {"requires": {"occupation": "Nurse"}, "goto": 3}
        ]));
        let r = resolve_choices(&list, &character(None));
        assert_eq!(r.source, ResolutionSource::LastResort);
        assert_eq!(r.index, Some(2));
    }

    #[test]
    fn safe_fallback_when_nothing_acts() {
        let list = choices(json!([{"text": "Stare"}]));
        let r = resolve_choices(&list, &character(None));
        assert_eq!(r.source, ResolutionSource::SafeFallback);
        assert_eq!(r.choice.action, Action::Goto(Destination::Page(SAFE_FALLBACK_PAGE)));
        assert_eq!(r.index, None);
    }

    #[test]
    fn validate_rejects_wrong_occupation() {
        let list = choices(json!([
            {"conditional_on": "occupation", "paths": {"Police Officer": {"goto": 18}}},
            {"requires": {"occupation": "Nurse"}, "goto": 3},
            {"effects": [{"action": "spend_luck", "amount": 1}]}
        ]));
        let c = character(Some(Occupation::SocialWorker));
        assert!(validate_pick(&list[0], &c).is_err());
        assert!(validate_pick(&list[1], &c).is_err());
        assert!(validate_pick(&list[2], &c).is_ok());
    }

    #[test]
    fn validate_accepts_first_occupation() {
        let list = choices(json!([
            {"set_occupation": "Police Officer", "goto": 2},
            {"set_occupation": "Nurse", "goto": 2},
            {"requires": {"damage_taken": {"min": 2}}, "set_occupation": "Social Worker", "goto": 2}
        ]));
        let unassigned = character(None);
        assert_eq!(validate_pick(&list[1], &unassigned).unwrap(), list[1]);
        assert!(validate_pick(&list[0], &unassigned).is_ok());
        // Requirements still apply.
        assert!(validate_pick(&list[2], &unassigned).is_err());

        // Once set, only the current occupation confirms.
        let nurse = character(Some(Occupation::Nurse));
        assert!(validate_pick(&list[0], &nurse).is_err());
        assert!(validate_pick(&list[1], &nurse).is_ok());
    }

    #[test]
    fn resolver_takes_first_occupation_as_last_resort() {
        let list = choices(json!([
            {"set_occupation": "Nurse", "goto": 40},
            {"set_occupation": "Police Officer", "goto": 41}
        ]));
        let r = resolve_choices(&list, &character(None));
        assert_eq!(r.source, ResolutionSource::LastResort);
        assert_eq!(r.index, Some(1));
    }

    #[test]
    fn resolved_path_drops_outer_requires_and_effects() {
        let list = choices(json!([{
            "conditional_on": "occupation",
            "requires": {"occupation": "Nurse"},
            "effects": [{"action": "spend_luck", "amount": 5}],
            "paths": {"default": {"text": "Go on", "goto": 7}}
        }]));
        let officer = character(Some(Occupation::PoliceOfficer));
        let r = resolve_choices(&list, &officer);
        assert_eq!(r.source, ResolutionSource::Conditional);
        assert_eq!(r.choice.action, Action::Goto(Destination::Page(7)));
        assert!(r.choice.requires.is_none());
        assert!(r.choice.effects.is_empty());
        assert_eq!(validate_pick(&list[0], &officer).unwrap(), r.choice);
    }

    #[test]
    fn validate_resolves_paths() {
        let list = choices(json!([conditional()]));
        let picked = validate_pick(&list[0], &character(Some(Occupation::PoliceOfficer))).unwrap();
        assert_eq!(picked.action, Action::Goto(Destination::Page(18)));
    }
}

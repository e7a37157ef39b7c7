//! Choices and their actions.
//!
//! Raw choice objects from page content are converted once into [`Choice`],
//! a closed set of action variants plus optional `requires` and `effects`.
//! Conversion never panics: malformed parts are reported as content issues
//! and either dropped or kept in a form that fails visibly when executed.

mod outcome;
mod requires;

pub use outcome::{OpposedOutcomes, OutcomeBucket, OutcomeResult};
pub use requires::{DamageRange, Requires};

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use gb_mechanics::{Difficulty, Effect, Target};

use crate::error::{IssueKind, Notes};

/// Page numbers.
pub type PageId = u32;

/// The page number that ends the story.
pub const END_PAGE: PageId = 0;

/// How deeply occupation-conditional choices may nest.
pub const MAX_CONDITIONAL_DEPTH: usize = 8;

/// Where a `goto` leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A page.
    Page(PageId),
    /// Page 0: the story ends.
    End,
    /// Anything else; executing it stays on the current page.
    Invalid(String),
}

impl Destination {
    /// Interpret a raw `goto` value.
    pub fn from_value(value: &Value) -> Self {
        let number = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match number {
            Some(0) => Self::End,
            Some(n) if n > 0 => PageId::try_from(n).map_or_else(|_| Self::Invalid(n.to_string()), Self::Page),
            _ => Self::Invalid(value.to_string()),
        }
    }

    /// The page id this destination moves to, with 0 for the end.
    pub fn page_id(&self) -> Option<PageId> {
        match self {
            Self::Page(id) => Some(*id),
            Self::End => Some(END_PAGE),
            Self::Invalid(_) => None,
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Page(id) => write!(f, "page {id}"),
            Self::End => write!(f, "the end"),
            Self::Invalid(raw) => write!(f, "invalid page {raw}"),
        }
    }
}

/// A skill or characteristic roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollAction {
    /// Skill or characteristic name.
    pub target: String,
    /// Regular or hard.
    pub difficulty: Difficulty,
    /// Extra tens die, keep the lower.
    pub bonus_dice: bool,
    /// Extra tens die, keep the higher.
    pub penalty_dice: bool,
    /// Results by tier.
    pub results: OutcomeBucket,
}

/// Occupation-specific alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OccupationPaths {
    /// Choices keyed by occupation name.
    pub paths: BTreeMap<String, Choice>,
    /// Choice for any other occupation.
    pub default: Option<Box<Choice>>,
}

impl OccupationPaths {
    /// The path for an occupation, falling back to the default.
    pub fn resolve(&self, occupation: Option<&str>) -> Option<&Choice> {
        occupation
            .and_then(|o| self.paths.get(o))
            .or(self.default.as_deref())
    }
}

/// What a choice does when taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Jump to a page.
    Goto(Destination),
    /// Roll against a skill.
    SkillRoll(RollAction),
    /// Roll against a characteristic.
    CharacteristicRoll(RollAction),
    /// Roll against current luck.
    LuckRoll {
        /// Results by tier; missing tiers fall back to lower ones.
        results: OutcomeBucket,
    },
    /// Roll a skill against an opponent.
    OpposedRoll {
        /// The character's skill.
        skill: String,
        /// Opponent thresholds.
        opponent: Target,
        /// Results by winner.
        outcomes: OpposedOutcomes,
    },
    /// Pick a nested choice by occupation.
    ConditionalOnOccupation(OccupationPaths),
    /// Confirm an occupation, optionally moving on.
    SetOccupation {
        /// Occupation name.
        occupation: String,
        /// Where to go afterwards.
        goto: Option<Destination>,
    },
    /// No recognized action.
    None,
}

/// One option on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Display text.
    pub text: Option<String>,
    /// What happens.
    pub action: Action,
    /// Conditions for the choice to apply.
    pub requires: Option<Requires>,
    /// Effects applied on selection, before any roll.
    pub effects: Vec<Effect>,
}

impl Choice {
    /// A plain jump.
    pub fn goto(text: impl Into<String>, page: PageId) -> Self {
        let destination = if page == END_PAGE {
            Destination::End
        } else {
            Destination::Page(page)
        };
        Self {
            text: Some(text.into()),
            action: Action::Goto(destination),
            requires: None,
            effects: Vec::new(),
        }
    }

    /// Parse a raw choice, discarding any content notes.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        Self::parse(value, 0, &mut Notes::default())
    }

    pub(crate) fn parse(value: &Value, depth: usize, notes: &mut Notes) -> Result<Self, String> {
        let obj = value
            .as_object()
            .ok_or_else(|| format!("choice must be an object, got {value}"))?;
        let action = parse_action(obj, depth, notes)?;
        Ok(Self {
            text: obj.get("text").and_then(Value::as_str).map(str::to_string),
            action,
            requires: obj.get("requires").map(|v| Requires::parse(v, notes)),
            effects: obj
                .get("effects")
                .map(|v| parse_effects(v, notes))
                .unwrap_or_default(),
        })
    }

    /// Text to show for this choice.
    pub fn label(&self) -> String {
        if let Some(text) = &self.text {
            return text.clone();
        }
        match &self.action {
            Action::Goto(dest) => format!("Go to {dest}"),
            Action::SkillRoll(r) | Action::CharacteristicRoll(r) => match r.difficulty {
                Difficulty::Hard => format!("Roll {} (hard)", r.target),
                Difficulty::Regular => format!("Roll {}", r.target),
            },
            Action::LuckRoll { .. } => "Luck roll".to_string(),
            Action::OpposedRoll { skill, opponent, .. } => {
                format!("Opposed {skill} roll against {opponent}")
            }
            Action::ConditionalOnOccupation(_) => "Depends on occupation".to_string(),
            Action::SetOccupation { occupation, .. } => format!("Continue as {occupation}"),
            Action::None if !self.effects.is_empty() => "Apply effects".to_string(),
            Action::None => "(no action)".to_string(),
        }
    }

    /// Whether the choice carries a goto or roll.
    ///
    /// Conditionals do not count: they only select another choice.
    pub fn is_actionable(&self) -> bool {
        match &self.action {
            Action::Goto(_)
            | Action::SkillRoll(_)
            | Action::CharacteristicRoll(_)
            | Action::LuckRoll { .. }
            | Action::OpposedRoll { .. } => true,
            Action::SetOccupation { goto, .. } => goto.is_some(),
            Action::ConditionalOnOccupation(_) | Action::None => false,
        }
    }

    /// Whether this is an occupation-conditional choice.
    pub fn is_conditional(&self) -> bool {
        matches!(self.action, Action::ConditionalOnOccupation(_))
    }

    /// Every page id this choice can lead to, nested paths included.
    pub fn destinations(&self) -> Vec<PageId> {
        let mut out = Vec::new();
        self.collect_destinations(&mut out);
        out
    }

    fn collect_destinations(&self, out: &mut Vec<PageId>) {
        fn push(out: &mut Vec<PageId>, dest: Option<&Destination>) {
            if let Some(Destination::Page(id)) = dest {
                out.push(*id);
            }
        }
        match &self.action {
            Action::Goto(dest) => push(out, Some(dest)),
            Action::SkillRoll(r) | Action::CharacteristicRoll(r) => {
                for (_, res) in r.results.iter() {
                    push(out, res.destination());
                }
            }
            Action::LuckRoll { results } => {
                for (_, res) in results.iter() {
                    push(out, res.destination());
                }
            }
            Action::OpposedRoll { outcomes, .. } => {
                for res in outcomes.iter() {
                    push(out, res.destination());
                }
            }
            Action::SetOccupation { goto, .. } => push(out, goto.as_ref()),
            Action::ConditionalOnOccupation(paths) => {
                for choice in paths.paths.values().chain(paths.default.as_deref()) {
                    choice.collect_destinations(out);
                }
            }
            Action::None => {}
        }
    }
}

pub(crate) fn parse_effects(value: &Value, notes: &mut Notes) -> Vec<Effect> {
    let Some(items) = value.as_array() else {
        notes.push(IssueKind::Ignored, format!("effects must be a list, got {value}"));
        return Vec::new();
    };
    items
        .iter()
        .map(|item| {
            let effect = Effect::from_value(item);
            if let Effect::Invalid { reason, .. } = &effect {
                notes.push(IssueKind::InvalidEffect, reason.clone());
            }
            effect
        })
        .collect()
}

fn parse_action(obj: &Map<String, Value>, depth: usize, notes: &mut Notes) -> Result<Action, String> {
    if let Some(cond) = obj.get("conditional_on") {
        return parse_conditional(cond, obj, depth, notes);
    }

    if let Some(occ) = obj.get("set_occupation").or_else(|| obj.get("set-occupation")) {
        let occupation = occ
            .as_str()
            .ok_or_else(|| format!("set_occupation must be a string, got {occ}"))?;
        return Ok(Action::SetOccupation {
            occupation: occupation.to_string(),
            goto: obj.get("goto").map(Destination::from_value),
        });
    }

    if let Some(roll) = obj.get("roll") {
        return parse_roll(roll, obj, notes);
    }

    if obj.get("luck_roll").is_some_and(|v| v.as_bool().unwrap_or(false)) {
        return Ok(Action::LuckRoll {
            results: OutcomeBucket::parse(obj.get("results"), notes),
        });
    }

    if let Some(opposed) = obj.get("opposed_roll") {
        return parse_opposed(opposed, obj, notes);
    }

    if let Some(goto) = obj.get("goto") {
        let dest = Destination::from_value(goto);
        if let Destination::Invalid(raw) = &dest {
            notes.push(IssueKind::Ignored, format!("goto {raw} is not a page"));
        }
        return Ok(Action::Goto(dest));
    }

    Ok(Action::None)
}

fn parse_conditional(
    cond: &Value,
    obj: &Map<String, Value>,
    depth: usize,
    notes: &mut Notes,
) -> Result<Action, String> {
    if cond.as_str() != Some("occupation") {
        return Err(format!("unsupported conditional_on {cond}"));
    }
    if depth >= MAX_CONDITIONAL_DEPTH {
        return Err(format!("conditional nesting deeper than {MAX_CONDITIONAL_DEPTH}"));
    }
    let raw_paths = obj
        .get("paths")
        .and_then(Value::as_object)
        .ok_or("conditional choice has no paths object")?;
    let parent_text = obj.get("text").and_then(Value::as_str);

    let mut paths = OccupationPaths::default();
    for (key, value) in raw_paths {
        let mut choice = match Choice::parse(value, depth + 1, notes) {
            Ok(choice) => choice,
            Err(e) => {
                notes.push(IssueKind::SkippedChoice, format!("path '{key}': {e}"));
                continue;
            }
        };
        if choice.text.is_none() {
            choice.text = parent_text.map(str::to_string);
        }
        if key == "default" {
            paths.default = Some(Box::new(choice));
        } else {
            paths.paths.insert(key.clone(), choice);
        }
    }
    Ok(Action::ConditionalOnOccupation(paths))
}

fn parse_roll(roll: &Value, obj: &Map<String, Value>, notes: &mut Notes) -> Result<Action, String> {
    let (target, inner) = match roll {
        Value::String(s) => (s.clone(), None),
        Value::Object(inner) => {
            let skill = inner
                .get("skill")
                .and_then(Value::as_str)
                .ok_or("roll object has no skill")?;
            (skill.to_string(), Some(inner))
        }
        other => return Err(format!("roll must be a name or an object, got {other}")),
    };
    let lookup = |key: &str| inner.and_then(|m| m.get(key)).or_else(|| obj.get(key));
    let flag = |key: &str| lookup(key).and_then(Value::as_bool).unwrap_or(false);

    let difficulty = match lookup("difficulty").and_then(Value::as_str) {
        Some(s) => s.parse::<Difficulty>().unwrap_or_else(|e| {
            notes.push(IssueKind::Ignored, format!("{e}; rolling at regular difficulty"));
            Difficulty::Regular
        }),
        None => Difficulty::Regular,
    };

    let action = RollAction {
        difficulty,
        bonus_dice: flag("bonus_dice"),
        penalty_dice: flag("penalty_dice"),
        results: OutcomeBucket::parse(lookup("results"), notes),
        target,
    };
    if action.target.parse::<gb_mechanics::Characteristic>().is_ok() {
        Ok(Action::CharacteristicRoll(action))
    } else {
        Ok(Action::SkillRoll(action))
    }
}

fn parse_opposed(
    opposed: &Value,
    obj: &Map<String, Value>,
    notes: &mut Notes,
) -> Result<Action, String> {
    let (skill, inner) = match opposed {
        Value::String(s) => (s.clone(), None),
        Value::Object(inner) => {
            let skill = inner
                .get("skill")
                .and_then(Value::as_str)
                .ok_or("opposed_roll object has no skill")?;
            (skill.to_string(), Some(inner))
        }
        other => return Err(format!("opposed_roll must be a skill name, got {other}")),
    };
    let lookup = |key: &str| inner.and_then(|m| m.get(key)).or_else(|| obj.get(key));

    let opponent = lookup("opponent_skill")
        .and_then(parse_target)
        .ok_or("opposed roll needs opponent_skill {full, half}")?;
    Ok(Action::OpposedRoll {
        skill,
        opponent,
        outcomes: OpposedOutcomes::parse(lookup("outcomes"), notes),
    })
}

fn parse_target(value: &Value) -> Option<Target> {
    if let Some(full) = value.as_u64() {
        return Some(Target::new(u32::try_from(full).ok()?));
    }
    let obj = value.as_object()?;
    let full = u32::try_from(obj.get("full")?.as_u64()?).ok()?;
    let half = match obj.get("half").and_then(Value::as_u64) {
        Some(h) => u32::try_from(h).ok()?,
        None => full / 2,
    };
    Some(Target { full, half })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_mechanics::SuccessTier;
    use serde_json::json;

    fn parse(value: Value) -> Choice {
        Choice::from_value(&value).unwrap()
    }

    #[test]
    fn goto_destinations() {
        assert_eq!(parse(json!({"goto": 5})).action, Action::Goto(Destination::Page(5)));
        assert_eq!(parse(json!({"goto": 0})).action, Action::Goto(Destination::End));
        assert_eq!(
            parse(json!({"goto": -3})).action,
            Action::Goto(Destination::Invalid("-3".into()))
        );
    }

    #[test]
    fn roll_as_string_with_outer_keys() {
        let c = parse(json!({
            "roll": "DEX", "difficulty": "hard", "bonus_dice": true,
            "results": {"4": {"goto": 58}, "2": 60}
        }));
        match c.action {
            Action::CharacteristicRoll(r) => {
                assert_eq!(r.target, "DEX");
                assert_eq!(r.difficulty, Difficulty::Hard);
                assert!(r.bonus_dice);
                assert!(!r.penalty_dice);
                assert!(r.results.get(SuccessTier::Hard).is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn roll_as_object() {
        let c = parse(json!({"roll": {"skill": "Stealth", "results": {"3": 12}}}));
        assert!(matches!(c.action, Action::SkillRoll(ref r) if r.target == "Stealth"));
        assert!(Choice::from_value(&json!({"roll": {"difficulty": "hard"}})).is_err());
    }

    #[test]
    fn opposed_roll_shape() {
        let c = parse(json!({
            "opposed_roll": "Fighting",
            "opponent_skill": {"full": 40, "half": 20},
            "outcomes": {"win": {"goto": 8}, "lose": {"goto": 12}, "draw": {"goto": 28}}
        }));
        match c.action {
            Action::OpposedRoll { skill, opponent, .. } => {
                assert_eq!(skill, "Fighting");
                assert_eq!(opponent, Target { full: 40, half: 20 });
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(Choice::from_value(&json!({"opposed_roll": "Fighting"})).is_err());
    }

    #[test]
    fn conditional_paths_inherit_text() {
        let c = parse(json!({
            "text": "Confront the spirit",
            "conditional_on": "occupation",
            "paths": {
                "Police Officer": {"goto": 18},
                "default": {"text": "Use willpower", "roll": "POW", "results": {"2": {"goto": 27}}}
            }
        }));
        let Action::ConditionalOnOccupation(paths) = &c.action else {
            panic!("not conditional");
        };
        let officer = paths.resolve(Some("Police Officer")).unwrap();
        assert_eq!(officer.text.as_deref(), Some("Confront the spirit"));
        let other = paths.resolve(Some("Nurse")).unwrap();
        assert_eq!(other.text.as_deref(), Some("Use willpower"));
        assert_eq!(c.destinations(), vec![18, 27]);
    }

    #[test]
    fn conditional_depth_is_bounded() {
        let mut value = json!({"goto": 1});
        for _ in 0..=MAX_CONDITIONAL_DEPTH {
            value = json!({"conditional_on": "occupation", "paths": {"default": value}});
        }
        let mut notes = Notes::default();
        let choice = Choice::parse(&value, 0, &mut notes).unwrap();
        assert!(notes.items.iter().any(|(k, _)| *k == IssueKind::SkippedChoice));
        assert!(choice.is_conditional());
    }

    #[test]
    fn set_occupation_both_spellings() {
        for key in ["set_occupation", "set-occupation"] {
            let c = parse(json!({key: "Nurse", "goto": 3}));
            assert_eq!(
                c.action,
                Action::SetOccupation {
                    occupation: "Nurse".into(),
                    goto: Some(Destination::Page(3))
                }
            );
        }
    }

    #[test]
    fn luck_roll_false_is_not_a_roll() {
        let c = parse(json!({"luck_roll": false, "goto": 4}));
        assert_eq!(c.action, Action::Goto(Destination::Page(4)));
    }

    #[test]
    fn labels() {
        assert_eq!(parse(json!({"goto": 3})).label(), "Go to page 3");
        assert_eq!(parse(json!({"text": "Run", "goto": 3})).label(), "Run");
        assert_eq!(parse(json!({"luck_roll": true})).label(), "Luck roll");
        assert_eq!(parse(json!({})).label(), "(no action)");
    }

    #[test]
    fn invalid_effects_are_kept() {
        let mut notes = Notes::default();
        let c = Choice::parse(
            &json!({"goto": 2, "effects": [{"action": "fly"}, {"action": "take_damage", "amount": 1}]}),
            0,
            &mut notes,
        )
        .unwrap();
        assert_eq!(c.effects.len(), 2);
        assert!(c.effects[0].is_invalid());
        assert_eq!(notes.items[0].0, IssueKind::InvalidEffect);
    }
}

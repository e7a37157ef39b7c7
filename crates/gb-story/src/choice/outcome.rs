//! Outcome buckets for roll-bearing choices.

use std::collections::BTreeMap;

use serde_json::Value;

use gb_mechanics::{Effect, OpposedOutcome, SuccessTier};

use super::{Destination, parse_effects};
use crate::error::{IssueKind, Notes};

/// What happens for one roll result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeResult {
    /// A bare page number.
    Page(Destination),
    /// Text, effects and an optional page.
    Detailed {
        /// Narrative shown for this outcome.
        text: Option<String>,
        /// Effects applied when this outcome is reached.
        effects: Vec<Effect>,
        /// Where to go; none stays on the current page.
        goto: Option<Destination>,
    },
}

impl OutcomeResult {
    pub(crate) fn parse(value: &Value, notes: &mut Notes) -> Option<Self> {
        match value {
            Value::Object(obj) => Some(Self::Detailed {
                text: ["outcome_text", "outcome", "text"]
                    .iter()
                    .find_map(|k| obj.get(*k).and_then(Value::as_str))
                    .map(str::to_string),
                effects: obj
                    .get("effects")
                    .map(|v| parse_effects(v, notes))
                    .unwrap_or_default(),
                goto: obj.get("goto").map(Destination::from_value),
            }),
            Value::Number(_) | Value::String(_) => Some(Self::Page(Destination::from_value(value))),
            other => {
                notes.push(IssueKind::Ignored, format!("outcome must be a page or an object, got {other}"));
                None
            }
        }
    }

    /// The destination, if this result names one.
    pub fn destination(&self) -> Option<&Destination> {
        match self {
            Self::Page(dest) => Some(dest),
            Self::Detailed { goto, .. } => goto.as_ref(),
        }
    }
}

/// Results keyed by success tier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutcomeBucket {
    entries: BTreeMap<SuccessTier, OutcomeResult>,
}

impl OutcomeBucket {
    pub(crate) fn parse(value: Option<&Value>, notes: &mut Notes) -> Self {
        let mut bucket = Self::default();
        let Some(value) = value else {
            return bucket;
        };
        let Some(obj) = value.as_object() else {
            notes.push(IssueKind::Ignored, format!("results must be an object, got {value}"));
            return bucket;
        };
        for (key, v) in obj {
            let tier = key.trim().parse::<u8>().ok().and_then(SuccessTier::from_level);
            let Some(tier) = tier else {
                notes.push(IssueKind::Ignored, format!("'{key}' is not a tier between 1 and 5"));
                continue;
            };
            if let Some(result) = OutcomeResult::parse(v, notes) {
                bucket.entries.insert(tier, result);
            }
        }
        bucket
    }

    /// The entry for exactly this tier.
    pub fn get(&self, tier: SuccessTier) -> Option<&OutcomeResult> {
        self.entries.get(&tier)
    }

    /// The entry for this tier, or the nearest lower tier that has one.
    pub fn get_or_lower(&self, tier: SuccessTier) -> Option<(SuccessTier, &OutcomeResult)> {
        std::iter::once(tier)
            .chain(tier.lower())
            .find_map(|t| self.entries.get(&t).map(|r| (t, r)))
    }

    /// Insert an entry.
    pub fn insert(&mut self, tier: SuccessTier, result: OutcomeResult) {
        self.entries.insert(tier, result);
    }

    /// All entries, worst tier first.
    pub fn iter(&self) -> impl Iterator<Item = (SuccessTier, &OutcomeResult)> {
        self.entries.iter().map(|(t, r)| (*t, r))
    }

    /// Whether any entry exists.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Results of an opposed roll.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpposedOutcomes {
    /// The character won.
    pub win: Option<OutcomeResult>,
    /// The opponent won.
    pub lose: Option<OutcomeResult>,
    /// A draw.
    pub draw: Option<OutcomeResult>,
}

impl OpposedOutcomes {
    pub(crate) fn parse(value: Option<&Value>, notes: &mut Notes) -> Self {
        let mut outcomes = Self::default();
        let Some(obj) = value.and_then(Value::as_object) else {
            notes.push(IssueKind::Ignored, "opposed roll has no outcomes object");
            return outcomes;
        };
        for (key, v) in obj {
            let slot = match key.as_str() {
                "win" => &mut outcomes.win,
                "lose" => &mut outcomes.lose,
                "draw" => &mut outcomes.draw,
                other => {
                    notes.push(IssueKind::Ignored, format!("'{other}' is not win, lose or draw"));
                    continue;
                }
            };
            *slot = OutcomeResult::parse(v, notes);
        }
        outcomes
    }

    /// The result for an outcome.
    pub fn get(&self, outcome: OpposedOutcome) -> Option<&OutcomeResult> {
        match outcome {
            OpposedOutcome::Win => self.win.as_ref(),
            OpposedOutcome::Lose => self.lose.as_ref(),
            OpposedOutcome::Draw => self.draw.as_ref(),
        }
    }

    /// All present results.
    pub fn iter(&self) -> impl Iterator<Item = &OutcomeResult> {
        [&self.win, &self.lose, &self.draw].into_iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bucket(value: Value) -> OutcomeBucket {
        OutcomeBucket::parse(Some(&value), &mut Notes::default())
    }

    #[test]
    fn bare_and_detailed_entries() {
        let b = bucket(json!({
            "2": 27,
            "3": {"goto": 22, "outcome_text": "You hold firm.", "effects": [{"action": "spend_luck", "amount": 1}]}
        }));
        assert_eq!(
            b.get(SuccessTier::Failure),
            Some(&OutcomeResult::Page(Destination::Page(27)))
        );
        match b.get(SuccessTier::Success).unwrap() {
            OutcomeResult::Detailed { text, effects, goto } => {
                assert_eq!(text.as_deref(), Some("You hold firm."));
                assert_eq!(effects.len(), 1);
                assert_eq!(goto, &Some(Destination::Page(22)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_keys_are_noted() {
        let mut notes = Notes::default();
        let b = OutcomeBucket::parse(Some(&json!({"7": 3, "three": 4, "1": 9})), &mut notes);
        assert_eq!(notes.items.len(), 2);
        assert!(b.get(SuccessTier::Fumble).is_some());
    }

    #[test]
    fn lower_tier_fallback() {
        let b = bucket(json!({"3": {"goto": 25}, "2": {"goto": 36}}));
        let (tier, result) = b.get_or_lower(SuccessTier::Hard).unwrap();
        assert_eq!(tier, SuccessTier::Success);
        assert_eq!(result.destination(), Some(&Destination::Page(25)));
        assert!(b.get_or_lower(SuccessTier::Fumble).is_none());
    }

    #[test]
    fn opposed_outcome_keys() {
        let mut notes = Notes::default();
        let o = OpposedOutcomes::parse(
            Some(&json!({"win": {"goto": 8}, "lose": {"goto": 12}, "draw": {"goto": 28}})),
            &mut notes,
        );
        assert!(notes.items.is_empty());
        assert_eq!(
            o.get(OpposedOutcome::Draw).and_then(OutcomeResult::destination),
            Some(&Destination::Page(28))
        );
        assert_eq!(o.iter().count(), 3);
    }
}
